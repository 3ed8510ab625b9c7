//! Enumerates the legal next moves from a search node.
//!
//! Grounded on `disassembler_0_c::find` / `checkmovement` / `newNode` /
//! `newNodeMerge`. The original expresses this as a resumable iterator
//! walking an explicit `nextstate` state machine across four phases:
//! remove one piece (0), remove a rigid group (1), slide a group that
//! doesn't yet separate, growing by `nextstep` (2), and merge two
//! already-found single-direction moves into one simultaneous move (99).
//!
//! The first three phases differ only in how large the piece's moving
//! set starts and how far it is allowed to grow before a slide is
//! accepted — the same "start at one piece, pull in anything touching it,
//! stop once there's daylight" loop — so here they are one function,
//! [`MoveFinder::slide_successors`], returning every successor in one
//! call instead of resuming phase-by-phase. `max_moving` is what tells
//! the three phases apart: callers run this with a cap of one piece for
//! "remove a single piece", then again with a cap of half the assembly
//! for "remove a rigid group"/"slide a group", matching
//! `checkmovement(1, …)` then `checkmovement(next_pn / 2, …)` in the
//! original's `find`. Without that cap shrinking back down for the
//! single-piece phase, the pathological "move everything at once" is
//! never rejected. This is a pure idiom substitution: an iterator object
//! mutated call-by-call is the natural shape in C++, a `Vec`-returning
//! function is the natural shape here.
//!
//! `slide_successors` returns one successor per legal step amount, not
//! just the largest: the original's `find` calls `checkmovement` once
//! per `nextstep` and fires a `newNode` at every step that doesn't
//! collide before the next larger step is tried, so steps 1, 2, 3, … up
//! to the full clearance are all separately reachable states. The merge
//! phase stays a separate pass, [`MoveFinder::merge_successors`], since
//! it genuinely depends on the full set of single moves already found.
use std::rc::Rc;

use geometry::AXES;

use crate::movement_matrix::MovementMatrix;
use crate::search_node::{SearchNode, SearchNodeBuilder};
use crate::types::Weight;

/// One of the six axis-aligned sliding directions: `0` = `+X`, `1` = `-X`,
/// `2` = `+Y`, `3` = `-Y`, `4` = `+Z`, `5` = `-Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction(pub u8);

pub const DIRECTION_COUNT: u8 = 6;

impl Direction {
    #[must_use]
    pub fn axis(self) -> geometry::Axis {
        AXES[usize::from(self.0 / 2)]
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 % 2 == 0
    }

    #[must_use]
    pub fn sign(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }
}

/// A single found slide: which pieces move, which way, and by how much.
struct Slide {
    moving: Vec<bool>,
    direction: Direction,
    amount: i32,
}

pub struct MoveFinder<'a> {
    weights: &'a [Weight],
    matrix: &'a MovementMatrix,
    max_moving: usize,
}

impl<'a> MoveFinder<'a> {
    #[must_use]
    pub fn new(weights: &'a [Weight], matrix: &'a MovementMatrix, max_moving: usize) -> Self {
        Self {
            weights,
            matrix,
            max_moving,
        }
    }

    fn gap_between(&self, direction: Direction, moving: usize, fixed: usize) -> i32 {
        if direction.is_positive() {
            self.matrix.gap(direction.axis(), moving, fixed)
        } else {
            self.matrix.gap(direction.axis(), fixed, moving)
        }
    }

    /// Grows a moving set from `start` along `direction`, pulling in any
    /// piece with zero clearance, until either daylight opens up or growth
    /// stalls or exceeds `max_moving` (no move in this direction from this
    /// start). Once daylight opens at some clearance `candidate`, every
    /// step from 1 up to `candidate` is its own legal, distinct successor
    /// — not just the largest one — mirroring `checkmovement` being
    /// called once per `nextstep` and `newNode` firing at every step that
    /// doesn't collide. The moving set itself is treated as fixed once
    /// growth stabilises: sliding a shorter distance can only be less
    /// constrained than sliding the full clearance, so there's no need to
    /// re-derive which pieces join at each smaller step. Grounded on
    /// `checkmovement`.
    fn grow_moving_set(&self, node: &SearchNode, direction: Direction, start: usize) -> Option<(Vec<bool>, Vec<i32>)> {
        let n = node.piece_count();
        let active = (0..n).filter(|&i| !node.is_piece_removed(i)).count();
        let mut moving = vec![false; n];
        moving[start] = true;
        let mut moving_count = 1usize;

        loop {
            // Once every piece still in play is already in the moving set
            // there's no complement left to measure clearance against: the
            // pair of loops below would simply never run, which must not
            // be mistaken for an unconstrained (infinite) gap.
            if moving_count >= active {
                return None;
            }

            let mut candidate = crate::constants::INFINITY;
            for i in 0..n {
                if !moving[i] || node.is_piece_removed(i) {
                    continue;
                }
                for j in 0..n {
                    if moving[j] || node.is_piece_removed(j) {
                        continue;
                    }
                    candidate = candidate.min(self.gap_between(direction, i, j));
                }
            }

            if candidate > 0 {
                let steps = if candidate >= crate::constants::INFINITY {
                    vec![crate::constants::INFINITY]
                } else {
                    (1..=candidate).collect()
                };
                return Some((moving, steps));
            }

            let mut grew = false;
            for i in 0..n {
                if !moving[i] || node.is_piece_removed(i) {
                    continue;
                }
                for j in 0..n {
                    if moving[j] || node.is_piece_removed(j) {
                        continue;
                    }
                    if self.gap_between(direction, i, j) <= 0 {
                        moving[j] = true;
                        moving_count += 1;
                        grew = true;
                    }
                }
            }

            if !grew || moving_count > self.max_moving {
                return None;
            }
        }
    }

    fn group_weight(&self, shapes_of_piece: &[crate::types::ShapeId], moving: &[bool]) -> u64 {
        moving
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| u64::from(self.weights[shapes_of_piece[i].0 as usize].0))
            .sum()
    }

    fn apply_translation(
        &self,
        builder: &mut SearchNodeBuilder,
        node: &SearchNode,
        moving: &[bool],
        direction: Direction,
        amount: i32,
        invert: bool,
    ) {
        let signed = if invert {
            -direction.sign() * amount
        } else {
            direction.sign() * amount
        };
        for (piece, &is_moving) in moving.iter().enumerate() {
            if !is_moving {
                continue;
            }
            let pos = node.position(piece).translated(direction.axis(), signed);
            builder.set(piece, pos, node.orientation(piece));
        }
    }

    fn build_slide(
        &self,
        node: &Rc<SearchNode>,
        shapes_of_piece: &[crate::types::ShapeId],
        slide: &Slide,
    ) -> Rc<SearchNode> {
        let n = node.piece_count();
        let complement: Vec<bool> = slide.moving.iter().map(|m| !m).collect();
        let moving_weight = self.group_weight(shapes_of_piece, &slide.moving);
        let static_weight = self.group_weight(shapes_of_piece, &complement);

        // Prefer to physically translate the lighter side; translation
        // invariance makes the two choices describe the same state, see
        // `search_node::tests` for why. A true separation always moves
        // the opening side regardless of weight, matching the intuition
        // that the piece with room is the one sliding free.
        let is_separation = slide.amount >= crate::constants::INFINITY;
        let has_complement = (0..n).any(|i| complement[i]);
        let move_complement_instead = !is_separation && has_complement && static_weight < moving_weight;

        let mut builder = SearchNodeBuilder::from_node(node);
        let amount = if is_separation { SEPARATION_DISTANCE } else { slide.amount };
        if move_complement_instead {
            self.apply_translation(&mut builder, node, &complement, slide.direction, amount, true);
        } else {
            self.apply_translation(&mut builder, node, &slide.moving, slide.direction, amount, false);
        }
        builder.finish(Rc::clone(node))
    }

    /// All legal single-direction slides from `node`, one per reachable
    /// step amount.
    #[must_use]
    pub fn slide_successors(&self, node: &Rc<SearchNode>, shapes_of_piece: &[crate::types::ShapeId]) -> Vec<Rc<SearchNode>> {
        let n = node.piece_count();
        let mut out = Vec::new();
        for dir_index in 0..DIRECTION_COUNT {
            let direction = Direction(dir_index);
            for start in 0..n {
                if node.is_piece_removed(start) {
                    continue;
                }
                if let Some((moving, steps)) = self.grow_moving_set(node, direction, start) {
                    for amount in steps {
                        let slide = Slide {
                            moving: moving.clone(),
                            direction,
                            amount,
                        };
                        out.push(self.build_slide(node, shapes_of_piece, &slide));
                    }
                }
            }
        }
        out
    }

    /// Returns the raw slides (not yet materialised into successor
    /// nodes), one per reachable step amount, so
    /// [`Self::merge_successors`] can combine compatible pairs.
    fn find_slides(&self, node: &SearchNode) -> Vec<Slide> {
        let n = node.piece_count();
        let mut out = Vec::new();
        for dir_index in 0..DIRECTION_COUNT {
            let direction = Direction(dir_index);
            for start in 0..n {
                if node.is_piece_removed(start) {
                    continue;
                }
                if let Some((moving, steps)) = self.grow_moving_set(node, direction, start) {
                    for amount in steps {
                        out.push(Slide {
                            moving: moving.clone(),
                            direction,
                            amount,
                        });
                    }
                }
            }
        }
        out
    }

    fn min_gap_between_groups(&self, direction: Direction, a: &[bool], b: &[bool]) -> i32 {
        let mut min = crate::constants::INFINITY;
        for (i, &ai) in a.iter().enumerate() {
            if !ai {
                continue;
            }
            for (j, &bj) in b.iter().enumerate() {
                if !bj {
                    continue;
                }
                min = min.min(self.gap_between(direction, i, j));
            }
        }
        min
    }

    fn try_merge(
        &self,
        node: &Rc<SearchNode>,
        shapes_of_piece: &[crate::types::ShapeId],
        a: &Slide,
        b: &Slide,
    ) -> Option<Rc<SearchNode>> {
        if a.amount >= crate::constants::INFINITY || b.amount >= crate::constants::INFINITY {
            return None;
        }
        if (0..a.moving.len()).any(|i| a.moving[i] && b.moving[i]) {
            return None;
        }
        if a.direction.axis() == b.direction.axis() {
            if a.direction.0 == b.direction.0 {
                return None;
            }
            let required = a.amount + b.amount;
            let available = self.min_gap_between_groups(a.direction, &a.moving, &b.moving);
            if available < required {
                return None;
            }
        }

        let mut builder = SearchNodeBuilder::from_node(node);
        self.apply_translation(&mut builder, node, &a.moving, a.direction, a.amount, false);
        self.apply_translation(&mut builder, node, &b.moving, b.direction, b.amount, false);
        let _ = shapes_of_piece;
        Some(builder.finish(Rc::clone(node)))
    }

    /// Combines disjoint, non-conflicting single-direction slides found
    /// from `node` into simultaneous multi-group moves. Grounded on
    /// `newNodeMerge`.
    #[must_use]
    pub fn merge_successors(&self, node: &Rc<SearchNode>, shapes_of_piece: &[crate::types::ShapeId]) -> Vec<Rc<SearchNode>> {
        let slides = self.find_slides(node);
        let mut out = Vec::new();
        for i in 0..slides.len() {
            for j in (i + 1)..slides.len() {
                if let Some(successor) = self.try_merge(node, shapes_of_piece, &slides[i], &slides[j]) {
                    out.push(successor);
                }
            }
        }
        out
    }
}

/// How far a piece is pushed when a slide has unbounded room: far enough
/// that [`crate::types::Position::is_removed`] is unambiguously true.
pub const SEPARATION_DISTANCE: i32 = 20_000;
