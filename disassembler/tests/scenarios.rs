//! End-to-end scenarios exercising the full search through
//! [`Disassembler::disassemble`], as opposed to the per-module unit tests
//! that exercise one piece of the pipeline at a time.

use disassembler::{Assembly, Disassembler, Position, Puzzle, Separation, ShapeId, Weight};
use geometry::{Orientation, Shape};

/// A fixed, read-only placement of unit-cube pieces, all sharing shape 0
/// unless a caller overrides `shapes_of_piece`.
struct CubeAssembly {
    shapes_of_piece: Vec<ShapeId>,
    positions: Vec<Position>,
}

impl Assembly for CubeAssembly {
    fn piece_count(&self) -> usize {
        self.positions.len()
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

/// A puzzle with no declared equivalence groups and uniform weight.
struct PlainPuzzle {
    shapes: Vec<Shape>,
}

impl Puzzle for PlainPuzzle {
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

fn unit_cube_puzzle() -> PlainPuzzle {
    PlainPuzzle {
        shapes: vec![Shape::new(vec![(0, 0, 0)]).unwrap()],
    }
}

/// A registered-equivalence-group puzzle over the two shapes used by
/// `locked_assembly`: the hollow shell (shape 0) and the piece sealed
/// inside it (shape 1).
struct GroupedLockedPuzzle {
    shapes: Vec<Shape>,
}

impl Puzzle for GroupedLockedPuzzle {
    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
    fn weight(&self, _id: ShapeId) -> Weight {
        Weight(1)
    }
    fn group_membership_count(&self, _id: ShapeId) -> usize {
        1
    }
    fn group_membership(&self, _id: ShapeId, _index: usize) -> (u32, usize) {
        (1, 2)
    }
}

fn locked_shapes() -> Vec<Shape> {
    let mut shell = Vec::new();
    for x in 0..3 {
        for y in 0..3 {
            for z in 0..3 {
                if (x, y, z) != (1, 1, 1) {
                    shell.push((x, y, z));
                }
            }
        }
    }
    vec![Shape::new(shell).unwrap(), Shape::new(vec![(1, 1, 1)]).unwrap()]
}

fn locked_assembly() -> CubeAssembly {
    CubeAssembly {
        shapes_of_piece: vec![ShapeId(0), ShapeId(1)],
        positions: vec![Position::new(0, 0, 0), Position::new(0, 0, 0)],
    }
}

/// Every leaf of the tree (no `removed`/`left` children) holds exactly one
/// piece, and the leaf piece counts sum back up to the tree's total.
fn leaf_piece_counts(sep: &Separation) -> Vec<usize> {
    match (sep.removed(), sep.left()) {
        (None, None) => vec![sep.pieces().len()],
        (removed, left) => {
            let mut out = Vec::new();
            if let Some(r) = removed {
                out.extend(leaf_piece_counts(r));
            } else {
                out.push(1);
            }
            if let Some(l) = left {
                out.extend(leaf_piece_counts(l));
            } else {
                out.push(1);
            }
            out
        }
    }
}

#[test]
fn six_piece_chain_fully_disassembles() {
    // A linear chain of six unit cubes: a stand-in for a named,
    // notched multi-piece burr whose exact voxel geometry isn't
    // reproduced here, but which exercises the same structural
    // property — each split frees exactly one piece, recursing down
    // to six single-piece leaves.
    let puzzle = unit_cube_puzzle();
    let assembly = CubeAssembly {
        shapes_of_piece: vec![ShapeId(0); 6],
        positions: (0..6).map(|i| Position::new(i, 0, 0)).collect(),
    };
    let disassembler = Disassembler::new(&puzzle);
    let result = disassembler.disassemble(&assembly, &|| false).unwrap();
    let separation = result.expect("an open linear chain must fully disassemble");

    let leaves = leaf_piece_counts(&separation);
    assert_eq!(leaves.iter().sum::<usize>(), 6);
    assert!(leaves.iter().all(|&n| n == 1));
    assert!(separation.sum_moves() >= 1);
}

#[test]
fn two_trivially_interlocking_pieces_have_no_children() {
    let puzzle = unit_cube_puzzle();
    let assembly = CubeAssembly {
        shapes_of_piece: vec![ShapeId(0), ShapeId(0)],
        positions: vec![Position::new(0, 0, 0), Position::new(1, 0, 0)],
    };
    let disassembler = Disassembler::new(&puzzle);
    let result = disassembler.disassemble(&assembly, &|| false).unwrap();
    let separation = result.expect("two free-standing cubes must separate");

    assert!(separation.removed().is_none());
    assert!(separation.left().is_none());
    assert_eq!(separation.states().len(), 2);
    assert_eq!(separation.sum_moves(), 1);
}

#[test]
fn locked_assembly_returns_none() {
    // A single voxel fully sealed inside a hollow shell: no axis-aligned
    // slide, alone or combined with its neighbour, ever opens daylight.
    let puzzle = PlainPuzzle { shapes: locked_shapes() };
    let assembly = locked_assembly();
    let disassembler = Disassembler::new(&puzzle);
    let result = disassembler.disassemble(&assembly, &|| false).unwrap();
    assert!(result.is_none());
}

#[test]
fn equivalence_group_rescues_a_locked_subproblem() {
    // Same locked geometry as above, but both shapes are declared
    // interchangeable members of a capacity-2 group, so the author's
    // own claim that this pairing is already known-solvable is honoured
    // instead of reporting failure.
    let puzzle = GroupedLockedPuzzle { shapes: locked_shapes() };
    let assembly = locked_assembly();
    let disassembler = Disassembler::new(&puzzle);
    let result = disassembler.disassemble(&assembly, &|| false).unwrap();
    let separation = result.expect("a registered equivalence group must rescue the locked pair");
    assert_eq!(separation.sum_moves(), 0);
}

fn assert_states_differ_by_offset(a: &Separation, b: &Separation, offset: (i32, i32, i32)) {
    assert_eq!(a.states().len(), b.states().len());
    for (sa, sb) in a.states().iter().zip(b.states()) {
        assert_eq!(sa.positions().len(), sb.positions().len());
        for (pa, pb) in sa.positions().iter().zip(sb.positions()) {
            // Pieces pushed out to the separation sentinel aren't expected
            // to differ by exactly `offset` (the push itself dwarfs it),
            // only pieces still inside the assembly's working frame.
            if pa.is_removed() || pb.is_removed() {
                continue;
            }
            assert_eq!(pb.x - pa.x, offset.0);
            assert_eq!(pb.y - pa.y, offset.1);
            assert_eq!(pb.z - pa.z, offset.2);
        }
    }
    match (a.removed(), b.removed()) {
        (Some(ra), Some(rb)) => assert_states_differ_by_offset(ra, rb, offset),
        (None, None) => {}
        _ => panic!("removed branches diverged under translation"),
    }
    match (a.left(), b.left()) {
        (Some(la), Some(lb)) => assert_states_differ_by_offset(la, lb, offset),
        (None, None) => {}
        _ => panic!("left branches diverged under translation"),
    }
}

#[test]
fn disassembly_is_translation_invariant() {
    let puzzle = unit_cube_puzzle();
    let offset = (100, -50, 7);

    let base = CubeAssembly {
        shapes_of_piece: vec![ShapeId(0), ShapeId(0)],
        positions: vec![Position::new(0, 0, 0), Position::new(1, 0, 0)],
    };
    let shifted = CubeAssembly {
        shapes_of_piece: vec![ShapeId(0), ShapeId(0)],
        positions: vec![
            Position::new(offset.0, offset.1, offset.2),
            Position::new(1 + offset.0, offset.1, offset.2),
        ],
    };

    let disassembler = Disassembler::new(&puzzle);
    let base_result = disassembler.disassemble(&base, &|| false).unwrap().unwrap();
    let shifted_result = disassembler.disassemble(&shifted, &|| false).unwrap().unwrap();

    assert_eq!(base_result.sum_moves(), shifted_result.sum_moves());
    assert_eq!(base_result.moves_text(), shifted_result.moves_text());
    assert_states_differ_by_offset(&base_result, &shifted_result, offset);
}

#[test]
fn a_sandwiched_middle_piece_still_disassembles_via_its_neighbours() {
    // The middle piece of a three-in-a-row chain can never separate
    // alone (both neighbours block it), so the only way this assembly
    // comes apart is through the end pieces peeling off first, leaving
    // the last piece trivially alone. This exercises the single-piece
    // phase's cap actually rejecting the middle piece, rather than
    // silently permitting it to drag a neighbour along.
    let puzzle = unit_cube_puzzle();
    let assembly = CubeAssembly {
        shapes_of_piece: vec![ShapeId(0); 3],
        positions: (0..3).map(|i| Position::new(i, 0, 0)).collect(),
    };
    let disassembler = Disassembler::new(&puzzle);
    let result = disassembler.disassemble(&assembly, &|| false).unwrap();
    let separation = result.expect("an open three-piece chain must fully disassemble");

    let leaves = leaf_piece_counts(&separation);
    assert_eq!(leaves.iter().sum::<usize>(), 3);
    assert!(leaves.iter().all(|&n| n == 1));
}
