use crate::error::{ClientError, Result};
use std::path::Path;
use tracing::debug;

/// Environment variable naming the in-cluster API server host.
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";

/// Environment variable naming the in-cluster API server port.
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Mounted service account token, present inside cluster pods.
pub const TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Local fallback, the address a `kubectl proxy` listens on.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

/// Connection settings for the cluster API server, loaded once at
/// startup. The process is stateless across restarts; nothing here is
/// persisted.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Base URL of the API server (no trailing slash)
    pub base_url: String,
    /// Bearer token, present when running in-cluster
    pub bearer_token: Option<String>,
}

impl ClusterConfig {
    /// Configuration for an explicit API server address, without auth.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Load in-cluster configuration from the pod environment: service
    /// host/port env vars plus the mounted service account token.
    pub fn in_cluster() -> Result<Self> {
        let host = std::env::var(SERVICE_HOST_ENV)
            .map_err(|_| ClientError::config(format!("{} is not set", SERVICE_HOST_ENV)))?;
        let port = std::env::var(SERVICE_PORT_ENV)
            .map_err(|_| ClientError::config(format!("{} is not set", SERVICE_PORT_ENV)))?;

        let token = read_token(Path::new(TOKEN_PATH))?;

        Ok(Self {
            base_url: format!("https://{}:{}", host, port),
            bearer_token: Some(token),
        })
    }

    /// In-cluster configuration when the pod environment is present,
    /// otherwise the local proxy fallback.
    pub fn from_env() -> Self {
        match Self::in_cluster() {
            Ok(config) => config,
            Err(e) => {
                debug!("No in-cluster environment ({}), using {}", e, DEFAULT_BASE_URL);
                Self::new(DEFAULT_BASE_URL)
            }
        }
    }
}

fn read_token(path: &Path) -> Result<String> {
    let token = std::fs::read_to_string(path)
        .map_err(|e| ClientError::config(format!("failed to read token at {:?}: {}", path, e)))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(ClientError::config("service account token is empty"));
    }
    Ok(token)
}
