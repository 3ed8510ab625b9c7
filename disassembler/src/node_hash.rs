//! A chained hash set of search nodes with the original's deterministic
//! rehash growth policy.
//!
//! Grounded on `nodeHash` in `disassembler_0.cpp`: a bucket array sized 11
//! at construction, growing to `size * 4 + 1` whenever the entry count
//! exceeds the bucket count. `std::collections::HashSet` isn't used here
//! on purpose — the three-front BFS in [`crate::disassembler`] depends on
//! being able to `clear()` and discard a whole front's nodes (dropping
//! their `Rc` refcounts) without disturbing the other two fronts' tables,
//! and on the rehash cadence being predictable for the size the original
//! tunes its memory budget around.
use std::rc::Rc;

use crate::search_node::SearchNode;

const INITIAL_BUCKETS: usize = 11;

pub struct NodeHash {
    buckets: Vec<Vec<Rc<SearchNode>>>,
    entries: usize,
}

impl NodeHash {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: (0..INITIAL_BUCKETS).map(|_| Vec::new()).collect(),
            entries: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    fn bucket_of(&self, node: &SearchNode, bucket_count: usize) -> usize {
        (node.canonical_hash() as usize) % bucket_count
    }

    #[must_use]
    pub fn contains(&self, node: &SearchNode) -> bool {
        let idx = self.bucket_of(node, self.buckets.len());
        self.buckets[idx].iter().any(|existing| existing.as_ref() == node)
    }

    /// Inserts `node` unless an equal node is already present. Returns
    /// `true` if it was already present (a duplicate, and the caller
    /// should drop its `Rc` rather than keep searching from it).
    pub fn insert(&mut self, node: Rc<SearchNode>) -> bool {
        if self.contains(&node) {
            return true;
        }
        let idx = self.bucket_of(&node, self.buckets.len());
        self.buckets[idx].push(node);
        self.entries += 1;
        if self.entries > self.buckets.len() {
            self.rehash(self.buckets.len() * 4 + 1);
        }
        false
    }

    fn rehash(&mut self, new_size: usize) {
        let old = std::mem::replace(&mut self.buckets, (0..new_size).map(|_| Vec::new()).collect());
        for bucket in old {
            for node in bucket {
                let idx = self.bucket_of(&node, new_size);
                self.buckets[idx].push(node);
            }
        }
    }

    /// Drops every node, releasing the `Rc`s this table held (and, via
    /// [`SearchNode`]'s iterative `Drop`, cascading into their
    /// `comefrom` chains once no other front still references them).
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.entries = 0;
    }
}

impl Default for NodeHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_node::root_node;
    use crate::types::Position;
    use geometry::Orientation;

    fn node(x: i32) -> Rc<SearchNode> {
        root_node(vec![Position::new(x, 0, 0), Position::new(x + 1, 0, 0)], vec![Orientation::identity(); 2])
    }

    #[test]
    fn insert_reports_duplicates_by_translation_invariant_equality() {
        let mut table = NodeHash::new();
        assert!(!table.insert(node(0)));
        assert!(table.insert(node(5))); // same relative state, translated
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn grows_by_times_four_plus_one_when_over_capacity() {
        let mut table = NodeHash::new();
        for i in 0..12 {
            table.insert(node(i * 100));
        }
        assert_eq!(table.buckets.len(), 11 * 4 + 1);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut table = NodeHash::new();
        table.insert(node(0));
        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains(&node(0)));
    }
}
