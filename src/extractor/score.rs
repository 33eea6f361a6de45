//! Gravity score bookkeeping.
//!
//! Scores live in a side table keyed by node identity instead of being
//! written into DOM attributes, so scoring never dirties the markup and
//! serialized output stays clean. Keys carry the owning tree's address
//! because candidate roots may be cloned into separate documents.

use std::collections::{HashMap, HashSet};

use dom_query::NodeRef;

use crate::dom::{node_key, NodeKey};

/// Accumulated gravity scores and candidate-node counts.
///
/// `record` preserves first-encounter order of scored parents; the winner
/// selection depends on that order for tie handling.
#[derive(Debug, Default)]
pub struct ScoreBoard<'a> {
    scores: HashMap<NodeKey, i64>,
    counts: HashMap<NodeKey, u32>,
    recorded: Vec<NodeRef<'a>>,
    seen: HashSet<NodeKey>,
}

impl<'a> ScoreBoard<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a node's gravity score.
    pub fn add_score(&mut self, node: &NodeRef<'a>, delta: i64) {
        *self.scores.entry(node_key(node)).or_insert(0) += delta;
    }

    /// Add to a node's count of contributing candidates.
    pub fn add_count(&mut self, node: &NodeRef<'a>, delta: u32) {
        *self.counts.entry(node_key(node)).or_insert(0) += delta;
    }

    /// Remember a scored parent, once, in encounter order.
    pub fn record(&mut self, node: &NodeRef<'a>) {
        if self.seen.insert(node_key(node)) {
            self.recorded.push(*node);
        }
    }

    /// Current score of a node; unscored nodes read as zero.
    #[must_use]
    pub fn score(&self, node: &NodeRef) -> i64 {
        self.scores.get(&node_key(node)).copied().unwrap_or(0)
    }

    /// Whether the node ever received a score.
    #[must_use]
    pub fn has_score(&self, node: &NodeRef) -> bool {
        self.scores.contains_key(&node_key(node))
    }

    /// How many candidates contributed to a node.
    #[must_use]
    pub fn count(&self, node: &NodeRef) -> u32 {
        self.counts.get(&node_key(node)).copied().unwrap_or(0)
    }

    /// Scored parents in first-encounter order.
    #[must_use]
    pub fn scored_parents(&self) -> &[NodeRef<'a>] {
        &self.recorded
    }
}
