//! Dependency closure over one feature collection.

use crate::registry::FeatureSet;
use std::collections::BTreeSet;

impl FeatureSet {
    /// Mark `id` and its transitive dependencies as used.
    ///
    /// Returns the ids that flipped from unused to used, in visit order.
    /// Nodes that are already used are not re-visited, so a repeat call is a
    /// no-op. The caller guarantees that `id` exists.
    pub fn mark_used(&mut self, id: &str) -> Vec<&'static str> {
        let mut marked = Vec::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<&str> = vec![id];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            if node.used {
                continue;
            }
            node.used = true;
            marked.push(node.id);
            // Reverse so dependencies are visited in declaration order.
            stack.extend(node.dependencies.iter().rev().copied());
        }

        if !marked.is_empty() {
            tracing::debug!(kind = %self.kind(), root = id, marked = ?marked, "resolved feature closure");
        }
        marked
    }
}
