use crate::api::{BindingAck, ClusterApi, PodEventStream};
use crate::config::ClusterConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use k8s_openapi::api::core::v1::{Binding, Node, ObjectReference, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use proxima_core::WatchEvent;
use reqwest::Client;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

/// HTTP client for the cluster API server
pub struct HttpClusterClient {
    base_url: String,
    bearer_token: Option<String>,
    client: Client,
}

impl HttpClusterClient {
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            base_url: config.base_url,
            bearer_token: config.bearer_token,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl ClusterApi for HttpClusterClient {
    /// GET /api/v1/nodes
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let url = format!("{}/api/v1/nodes", self.base_url);
        debug!("GET {}", url);

        let resp = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ClientError::request(format!("HTTP request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::api(
                status.as_u16(),
                format!("list nodes failed: {}", body),
            ));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClientError::decode(format!("failed to parse node list: {}", e)))?;

        let items = body["items"].as_array().cloned().unwrap_or_default();

        let mut nodes = Vec::new();
        for item in items {
            match serde_json::from_value::<Node>(item) {
                Ok(node) => nodes.push(node),
                Err(e) => {
                    warn!("Failed to parse node from list: {}", e);
                }
            }
        }

        Ok(nodes)
    }

    /// GET /api/v1/pods?watch=true&labelSelector=...&timeoutSeconds=N
    async fn watch_pods(&self, label_selector: &str, timeout: Duration) -> Result<PodEventStream> {
        let url = format!("{}/api/v1/pods", self.base_url);
        debug!(
            "GET {} (watch, selector: {}, timeout: {:?})",
            url, label_selector, timeout
        );

        let resp = self
            .authorize(self.client.get(&url).query(&[
                ("watch", "true"),
                ("labelSelector", label_selector),
                ("timeoutSeconds", &timeout.as_secs().to_string()),
            ]))
            .send()
            .await
            .map_err(|e| ClientError::request(format!("failed to open watch: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::api(
                status.as_u16(),
                format!("watch pods failed: {}", body),
            ));
        }

        let bytes = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));
        let lines = LinesStream::new(StreamReader::new(bytes).lines());

        let events = lines.filter_map(|line| async move {
            match line {
                Ok(line) => parse_watch_line(&line),
                Err(e) => Some(Err(ClientError::stream(format!(
                    "watch stream read failed: {}",
                    e
                )))),
            }
        });

        Ok(Box::pin(events))
    }

    /// POST /api/v1/namespaces/{namespace}/pods/{name}/binding
    async fn create_binding(
        &self,
        namespace: &str,
        pod_name: &str,
        node_name: &str,
    ) -> Result<BindingAck> {
        let url = format!(
            "{}/api/v1/namespaces/{}/pods/{}/binding",
            self.base_url, namespace, pod_name
        );
        debug!("POST {}", url);

        let body = binding_body(pod_name, node_name);

        let resp = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| ClientError::request(format!("HTTP request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::api(
                status.as_u16(),
                format!("create binding failed: {}", body),
            ));
        }

        resp.json::<BindingAck>()
            .await
            .map_err(|e| ClientError::decode(format!("failed to parse binding ack: {}", e)))
    }
}

/// Build the binding body: a Node object reference plus the pod's
/// identity in the metadata, submitted as one atomic creation call.
pub fn binding_body(pod_name: &str, node_name: &str) -> Binding {
    Binding {
        metadata: ObjectMeta {
            name: Some(pod_name.to_string()),
            ..Default::default()
        },
        target: ObjectReference {
            kind: Some("Node".to_string()),
            api_version: Some("v1".to_string()),
            name: Some(node_name.to_string()),
            ..Default::default()
        },
    }
}

/// Decode one line of the watch wire format. Accepts both SSE framing
/// ("data: {...}") and plain newline-delimited JSON; keep-alive and
/// blank lines yield nothing.
fn parse_watch_line(line: &str) -> Option<std::result::Result<WatchEvent<Pod>, ClientError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = line.strip_prefix("data:").unwrap_or(line).trim_start();

    match serde_json::from_str::<WatchEvent<Pod>>(payload) {
        Ok(event) => Some(Ok(event)),
        Err(e) => Some(Err(ClientError::decode(format!(
            "failed to parse watch event: {}",
            e
        )))),
    }
}
