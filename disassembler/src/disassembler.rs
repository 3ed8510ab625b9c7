//! The top-level disassembly search: a three-front breadth-first search
//! over assembly states, recursing into each half once a separating move
//! is found.
//!
//! Grounded on `disassembler_0_c::disassemble`/`disassemble_rec`/
//! `checkSubproblem`. The three-front structure bounds memory: instead of
//! keeping every visited state forever, only this generation, the
//! previous one, and the one before that are kept, since a BFS can only
//! ever revisit a state from those three layers (anything older can
//! never be reached again without passing through a newer, already
//! recorded, layer first).
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, trace};

use crate::assembly::{Assembly, Puzzle};
use crate::error::DisassemblerError;
use crate::grouping::Grouping;
use crate::movement_cache::MovementCache;
use crate::movement_matrix::MovementMatrix;
use crate::move_finder::MoveFinder;
use crate::node_hash::NodeHash;
use crate::search_node::{root_node, SearchNode};
use crate::separation::{Separation, State};
use crate::types::{Position, ShapeId, Weight};
use geometry::{Orientation, Shape};

pub struct Disassembler<'p> {
    puzzle: &'p dyn Puzzle,
}

struct SubProblem {
    shapes_of_piece: Vec<ShapeId>,
    positions: Vec<Position>,
    orientations: Vec<Orientation>,
}

impl<'p> Disassembler<'p> {
    #[must_use]
    pub fn new(puzzle: &'p dyn Puzzle) -> Self {
        Self { puzzle }
    }

    /// Attempts to fully disassemble `assembly`. Returns `Ok(None)` when
    /// the assembly is locked (no sequence of moves separates it) —
    /// that's a normal, successful outcome, not an error.
    ///
    /// # Errors
    /// Returns [`DisassemblerError::Cancelled`] if `cancel` ever returns
    /// `true`, or a geometry error if the puzzle's shape data is
    /// malformed.
    pub fn disassemble(
        &self,
        assembly: &dyn Assembly,
        cancel: &dyn Fn() -> bool,
    ) -> Result<Option<Separation>, DisassemblerError> {
        let piece_count = assembly.piece_count();
        let shapes_of_piece: Vec<ShapeId> = (0..piece_count).map(|i| assembly.shape_of(i)).collect();
        let positions: Vec<Position> = (0..piece_count).map(|i| assembly.position_of(i)).collect();
        let orientations: Vec<Orientation> = (0..piece_count).map(|i| assembly.orientation_of(i)).collect();

        let mut grouping = Grouping::new();
        for (i, _shape) in self.puzzle.shapes().iter().enumerate() {
            let id = ShapeId(i as u32);
            for g in 0..self.puzzle.group_membership_count(id) {
                let (group_id, capacity) = self.puzzle.group_membership(id, g);
                grouping.register(group_id, id, capacity);
            }
        }

        let problem = SubProblem {
            shapes_of_piece,
            positions,
            orientations,
        };
        self.check_subproblem(&problem, &mut grouping, cancel)
    }

    /// Solves `problem` trivially (one piece), by full search, or by
    /// accepting it as a known equivalence group if the search locks.
    /// Grounded on `checkSubproblem`.
    fn check_subproblem(
        &self,
        problem: &SubProblem,
        grouping: &mut Grouping,
        cancel: &dyn Fn() -> bool,
    ) -> Result<Option<Separation>, DisassemblerError> {
        let piece_count = problem.shapes_of_piece.len();
        if piece_count <= 1 {
            return Ok(Some(self.trivial_separation(problem)));
        }

        let root = root_node(problem.positions.clone(), problem.orientations.clone());
        match self.disassemble_rec(&root, problem, grouping, cancel)? {
            Some(separation) => Ok(Some(separation)),
            None => {
                grouping.new_set();
                let all_known = problem
                    .shapes_of_piece
                    .iter()
                    .all(|&shape| grouping.add_piece_to_set(shape));
                if all_known {
                    debug!("sub-problem with {piece_count} pieces accepted via known equivalence group");
                    Ok(Some(self.trivial_separation(problem)))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn trivial_separation(&self, problem: &SubProblem) -> Separation {
        let state = State::new(problem.positions.clone());
        Separation::new(problem.shapes_of_piece.clone(), vec![state])
    }

    /// The three-front BFS over states of `problem`, stopping at the
    /// first separating move whose two halves both resolve recursively.
    /// Grounded on `disassemble_rec`.
    fn disassemble_rec(
        &self,
        root: &Rc<SearchNode>,
        problem: &SubProblem,
        grouping: &mut Grouping,
        cancel: &dyn Fn() -> bool,
    ) -> Result<Option<Separation>, DisassemblerError> {
        let piece_count = problem.shapes_of_piece.len();
        let shapes = self.puzzle.shapes();
        let weights: Vec<Weight> = (0..shapes.len()).map(|i| self.puzzle.weight(ShapeId(i as u32))).collect();
        let cache = MovementCache::new(shapes);

        // Slot 0 = two generations back ("old"), slot 1 = previous
        // generation ("cur"), slot 2 = the generation being built
        // ("new"). After each round the window slides: old is dropped,
        // cur becomes old, new becomes cur.
        let mut closed: [NodeHash; 3] = [NodeHash::new(), NodeHash::new(), NodeHash::new()];
        closed[1].insert(Rc::clone(root));

        let mut open_cur: VecDeque<Rc<SearchNode>> = VecDeque::new();
        open_cur.push_back(Rc::clone(root));
        let mut open_new: VecDeque<Rc<SearchNode>> = VecDeque::new();

        loop {
            if open_cur.is_empty() {
                trace!("sub-problem with {piece_count} pieces exhausted its search: locked");
                return Ok(None);
            }

            while let Some(node) = open_cur.pop_front() {
                if cancel() {
                    return Err(DisassemblerError::Cancelled);
                }

                let positions: Vec<Position> = (0..piece_count).map(|i| node.position(i)).collect();
                let orientations: Vec<Orientation> = (0..piece_count).map(|i| node.orientation(i)).collect();
                let matrix = MovementMatrix::build(piece_count, &problem.shapes_of_piece, &positions, &orientations, &cache);

                // Two caps, run as two distinct phases: one piece alone,
                // then a rigid group of up to half the assembly. Without
                // the first phase shrinking the cap back down to one, the
                // whole-puzzle move is never rejected by the group phase's
                // own cap, since it would then equal the whole puzzle.
                let single_finder = MoveFinder::new(&weights, &matrix, 1);
                let group_finder = MoveFinder::new(&weights, &matrix, piece_count / 2);

                let mut successors = single_finder.slide_successors(&node, &problem.shapes_of_piece);
                successors.extend(group_finder.slide_successors(&node, &problem.shapes_of_piece));
                successors.extend(group_finder.merge_successors(&node, &problem.shapes_of_piece));

                for successor in successors {
                    if successor.is_separation() {
                        if closed[2].insert(Rc::clone(&successor)) {
                            continue;
                        }
                        if let Some(resolved) = self.resolve_separation(&successor, problem, grouping, cancel)? {
                            return Ok(Some(resolved));
                        }
                        continue;
                    }

                    if closed[0].contains(&successor) || closed[1].contains(&successor) {
                        continue;
                    }
                    if closed[2].insert(Rc::clone(&successor)) {
                        continue;
                    }
                    open_new.push_back(successor);
                }
            }

            closed[0].clear();
            closed.rotate_left(1);
            std::mem::swap(&mut open_cur, &mut open_new);
        }
    }

    /// Splits the assembly at a separating node into its "removed" and
    /// "left" halves (read from the node just before the separating
    /// move, so coordinates stay bounded instead of carrying the
    /// separating node's overflowed sentinel positions), and recursively
    /// solves each half. Grounded on `create_new_params` plus the
    /// `checkSubproblem` recursive calls in `disassemble_rec`.
    fn resolve_separation(
        &self,
        successor: &Rc<SearchNode>,
        problem: &SubProblem,
        grouping: &mut Grouping,
        cancel: &dyn Fn() -> bool,
    ) -> Result<Option<Separation>, DisassemblerError> {
        let piece_count = problem.shapes_of_piece.len();
        let chain = collect_chain(successor);
        let predecessor = &chain[chain.len() - 2];

        let states: Vec<State> = chain
            .iter()
            .map(|n| State::new((0..piece_count).map(|i| n.position(i)).collect()))
            .collect();

        let removed_indices: Vec<usize> = (0..piece_count).filter(|&i| successor.is_piece_removed(i)).collect();
        let left_indices: Vec<usize> = (0..piece_count).filter(|&i| !successor.is_piece_removed(i)).collect();

        let sub_problem_for = |indices: &[usize]| SubProblem {
            shapes_of_piece: indices.iter().map(|&i| problem.shapes_of_piece[i]).collect(),
            positions: indices.iter().map(|&i| predecessor.position(i)).collect(),
            orientations: indices.iter().map(|&i| predecessor.orientation(i)).collect(),
        };

        let removed_problem = sub_problem_for(&removed_indices);
        let left_problem = sub_problem_for(&left_indices);

        // A side with a single piece has nothing further to decompose:
        // no child `Separation` is recorded for it at all (rather than
        // an empty trivial one), matching the original format's
        // convention — see `Separation::build`.
        let removed = if removed_indices.len() > 1 {
            match self.check_subproblem(&removed_problem, grouping, cancel)? {
                Some(sep) => Some(Some(sep)),
                None => None,
            }
        } else {
            Some(None)
        };
        let left = if left_indices.len() > 1 {
            match self.check_subproblem(&left_problem, grouping, cancel)? {
                Some(sep) => Some(Some(sep)),
                None => None,
            }
        } else {
            Some(None)
        };

        match (removed, left) {
            (Some(removed), Some(left)) => Ok(Some(Separation::build(problem.shapes_of_piece.clone(), states, removed, left))),
            _ => Ok(None),
        }
    }
}

fn collect_chain(node: &Rc<SearchNode>) -> Vec<Rc<SearchNode>> {
    let mut chain = Vec::new();
    let mut current = Rc::clone(node);
    loop {
        let parent = current.comefrom().cloned();
        chain.push(Rc::clone(&current));
        match parent {
            Some(p) => current = p,
            None => break,
        }
    }
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{Assembly, Puzzle};

    struct FixedAssembly {
        shapes_of_piece: Vec<ShapeId>,
        positions: Vec<Position>,
    }

    impl Assembly for FixedAssembly {
        fn piece_count(&self) -> usize {
            self.shapes_of_piece.len()
        }
        fn shape_of(&self, piece: usize) -> ShapeId {
            self.shapes_of_piece[piece]
        }
        fn position_of(&self, piece: usize) -> Position {
            self.positions[piece]
        }
        fn orientation_of(&self, _piece: usize) -> Orientation {
            Orientation::identity()
        }
    }

    struct FixedPuzzle {
        shapes: Vec<Shape>,
    }

    impl Puzzle for FixedPuzzle {
        fn shapes(&self) -> &[Shape] {
            &self.shapes
        }
        fn weight(&self, _id: ShapeId) -> Weight {
            Weight(1)
        }
        fn group_membership_count(&self, _id: ShapeId) -> usize {
            0
        }
        fn group_membership(&self, _id: ShapeId, _index: usize) -> (u32, usize) {
            unreachable!("no registered groups in this fixture")
        }
    }

    #[test]
    fn two_adjacent_unit_cubes_separate() {
        let puzzle = FixedPuzzle {
            shapes: vec![Shape::new(vec![(0, 0, 0)]).unwrap()],
        };
        let assembly = FixedAssembly {
            shapes_of_piece: vec![ShapeId(0), ShapeId(0)],
            positions: vec![Position::new(0, 0, 0), Position::new(1, 0, 0)],
        };
        let disassembler = Disassembler::new(&puzzle);
        let result = disassembler.disassemble(&assembly, &|| false).unwrap();
        let separation = result.expect("two free-standing cubes must separate");
        assert!(separation.sum_moves() >= 1);
    }

    #[test]
    fn a_single_piece_has_nothing_to_disassemble() {
        let puzzle = FixedPuzzle {
            shapes: vec![Shape::new(vec![(0, 0, 0)]).unwrap()],
        };
        let assembly = FixedAssembly {
            shapes_of_piece: vec![ShapeId(0)],
            positions: vec![Position::new(0, 0, 0)],
        };
        let disassembler = Disassembler::new(&puzzle);
        let result = disassembler.disassemble(&assembly, &|| false).unwrap();
        assert_eq!(result.unwrap().sum_moves(), 0);
    }

    #[test]
    fn cancellation_is_reported_as_an_error() {
        let puzzle = FixedPuzzle {
            shapes: vec![Shape::new(vec![(0, 0, 0)]).unwrap()],
        };
        let assembly = FixedAssembly {
            shapes_of_piece: vec![ShapeId(0), ShapeId(0)],
            positions: vec![Position::new(0, 0, 0), Position::new(1, 0, 0)],
        };
        let disassembler = Disassembler::new(&puzzle);
        let result = disassembler.disassemble(&assembly, &|| true);
        assert!(matches!(result, Err(DisassemblerError::Cancelled)));
    }
}
