//! Shape-equivalence group accounting used to short-circuit recursive
//! sub-problems that are identical to one already solved.
//!
//! Grounded on the `grouping_c` / `subProbGroup` machinery referenced from
//! `disassembler_0_c::checkSubproblem`: the puzzle's author can declare
//! that, say, "any 2 of these 3 interchangeable shapes" forms a group
//! that is already known solvable on its own, so a recursive split that
//! produces exactly that multiset doesn't need to be solved again.
use std::collections::HashSet;

use crate::types::ShapeId;

struct GroupDef {
    group_id: u32,
    members: HashSet<ShapeId>,
    capacity: usize,
}

/// Tracks, for one top-level disassembly run, which shape-equivalence
/// groups still have room to accept pieces during a single accounting
/// pass (one pass per candidate sub-problem).
pub struct Grouping {
    groups: Vec<GroupDef>,
    remaining: Vec<usize>,
}

impl Grouping {
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            remaining: Vec::new(),
        }
    }

    /// Registers that `shape` is a member of group `group_id`, requiring
    /// `capacity` total pieces (possibly of other member shapes) to
    /// satisfy the group. Called once per `(shape, group)` membership
    /// while building the puzzle's static data, mirroring
    /// `puzzle_c::probGetShapeGroup` being walked for every shape.
    pub fn register(&mut self, group_id: u32, shape: ShapeId, capacity: usize) {
        if let Some(existing) = self.groups.iter_mut().find(|g| g.capacity == capacity && g.group_id == group_id) {
            existing.members.insert(shape);
            return;
        }
        self.groups.push(GroupDef {
            group_id,
            members: std::iter::once(shape).collect(),
            capacity,
        });
    }

    /// Starts a fresh accounting pass: every registered group's capacity
    /// is available again. Grounded on `newSet`.
    pub fn new_set(&mut self) {
        self.remaining = self.groups.iter().map(|g| g.capacity).collect();
    }

    /// Credits one piece of `shape` against any group with room left that
    /// accepts it. Returns `false` if no such group exists, meaning the
    /// piece set being tested does not correspond to any known
    /// equivalence class. Grounded on `addPieceToSet`.
    pub fn add_piece_to_set(&mut self, shape: ShapeId) -> bool {
        for (group, remaining) in self.groups.iter().zip(self.remaining.iter_mut()) {
            if *remaining > 0 && group.members.contains(&shape) {
                *remaining -= 1;
                return true;
            }
        }
        false
    }
}

impl Default for Grouping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_piece_outside_every_group_is_rejected() {
        let mut g = Grouping::new();
        g.register(1, ShapeId(0), 2);
        g.new_set();
        assert!(!g.add_piece_to_set(ShapeId(5)));
    }

    #[test]
    fn group_capacity_is_exhausted_after_use() {
        let mut g = Grouping::new();
        g.register(1, ShapeId(0), 1);
        g.new_set();
        assert!(g.add_piece_to_set(ShapeId(0)));
        assert!(!g.add_piece_to_set(ShapeId(0)));
    }

    #[test]
    fn new_set_refills_capacity() {
        let mut g = Grouping::new();
        g.register(1, ShapeId(0), 1);
        g.new_set();
        assert!(g.add_piece_to_set(ShapeId(0)));
        g.new_set();
        assert!(g.add_piece_to_set(ShapeId(0)));
    }

    #[test]
    fn interchangeable_shapes_share_one_groups_capacity() {
        let mut g = Grouping::new();
        g.register(1, ShapeId(0), 2);
        g.register(1, ShapeId(1), 2);
        g.new_set();
        assert!(g.add_piece_to_set(ShapeId(0)));
        assert!(g.add_piece_to_set(ShapeId(1)));
        assert!(!g.add_piece_to_set(ShapeId(0)));
    }
}
