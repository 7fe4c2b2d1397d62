use rand::seq::IteratorRandom;
use std::collections::BTreeSet;

/// Pick one node uniformly at random from the eligible set, or nothing
/// when the set is empty. No weighting, no affinity, no history: every
/// decision cycle is independent and memoryless.
pub fn select_node(eligible: &BTreeSet<String>) -> Option<String> {
    eligible.iter().choose(&mut rand::thread_rng()).cloned()
}
