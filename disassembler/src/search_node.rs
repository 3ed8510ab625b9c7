//! Translation-invariant, hash-consed search nodes.
//!
//! Grounded on `node0_c` in `disassembler_0.cpp`. The original hand-rolls a
//! refcounted, intrusively-linked node with a manual `decRefCount` cascade
//! on its `comefrom` pointer; here that's just `Rc<SearchNode>` holding a
//! `comefrom: Option<Rc<SearchNode>>` — dropping the last `Rc` to a node
//! cascades into dropping its `comefrom` automatically, with identical
//! behaviour and no `unsafe`.
use geometry::Orientation;
use std::rc::Rc;

use crate::types::Position;

/// One state of every piece in a sub-problem: a point in the search graph.
///
/// Equality and hashing are translation-invariant: two nodes describe the
/// same state if every piece sits at the same offset *relative to piece
/// 0* and in the same orientation, regardless of the assembly's absolute
/// position in space. This lets sub-problems created by
/// [`crate::disassembler`]'s recursive split reuse the same node graph
/// machinery as the top-level search.
#[derive(Debug)]
pub struct SearchNode {
    comefrom: Option<Rc<SearchNode>>,
    positions: Vec<Position>,
    orientations: Vec<Orientation>,
}

/// Seed and per-axis multipliers for [`SearchNode::canonical_hash`].
/// Grounded verbatim on `node0_c::hash()`.
const HASH_SEED: u32 = 0x17FE_3B3C;
const HASH_MUL_X: u32 = 1343;
const HASH_MUL_Y: u32 = 923;
const HASH_MUL_Z: u32 = 113;
/// Extra multiplier folding orientation into the hash. The original omits
/// orientation entirely (its `operator==` comment reads `// FIXME:
/// transformation is missing`); this crate resolves that open question by
/// including it, so this multiplier has no analogue upstream.
const HASH_MUL_ORIENTATION: u32 = 71;

impl SearchNode {
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn position(&self, piece: usize) -> Position {
        self.positions[piece]
    }

    #[must_use]
    pub fn orientation(&self, piece: usize) -> Orientation {
        self.orientations[piece]
    }

    #[must_use]
    pub fn comefrom(&self) -> Option<&Rc<SearchNode>> {
        self.comefrom.as_ref()
    }

    #[must_use]
    pub fn is_piece_removed(&self, piece: usize) -> bool {
        self.positions[piece].is_removed()
    }

    /// True if at least one piece has slid clear of the assembly: the
    /// defining condition of a separating state. Grounded on
    /// `node0_c::is_separation()`.
    #[must_use]
    pub fn is_separation(&self) -> bool {
        (0..self.piece_count()).any(|i| self.is_piece_removed(i))
    }

    /// Translation- (but not orientation-) invariant hash. Grounded on
    /// `node0_c::hash()`, extended with an orientation term (see
    /// [`HASH_MUL_ORIENTATION`]).
    #[must_use]
    pub fn canonical_hash(&self) -> u32 {
        let mut h = HASH_SEED;
        let origin = self.positions[0];
        for i in 1..self.piece_count() {
            let p = self.positions[i];
            h = h.wrapping_add((p.x.wrapping_sub(origin.x)) as u32);
            h = h.wrapping_mul(HASH_MUL_X);
            h = h.wrapping_add((p.y.wrapping_sub(origin.y)) as u32);
            h = h.wrapping_mul(HASH_MUL_Y);
            h = h.wrapping_add((p.z.wrapping_sub(origin.z)) as u32);
            h = h.wrapping_mul(HASH_MUL_Z);
        }
        for o in &self.orientations {
            h = h.wrapping_add(u32::from(o.0));
            h = h.wrapping_mul(HASH_MUL_ORIENTATION);
        }
        h
    }

    /// Translation-invariant equality, including orientation (see
    /// [`HASH_MUL_ORIENTATION`] for why this crate diverges from the
    /// original's incomplete `operator==`).
    #[must_use]
    pub fn same_state_as(&self, other: &SearchNode) -> bool {
        if self.piece_count() != other.piece_count() {
            return false;
        }
        let o0 = self.positions[0];
        let o1 = other.positions[0];
        for i in 0..self.piece_count() {
            let a = self.positions[i];
            let b = other.positions[i];
            if (a.x - o0.x, a.y - o0.y, a.z - o0.z) != (b.x - o1.x, b.y - o1.y, b.z - o1.z) {
                return false;
            }
            if self.orientations[i] != other.orientations[i] {
                return false;
            }
        }
        true
    }
}

impl Drop for SearchNode {
    /// Unlinks `comefrom` iteratively instead of relying on the compiler's
    /// default recursive drop glue, which would blow the stack on a long
    /// search chain. This is the direct counterpart of the original's
    /// manual `decRefCount` cascade in `~node0_c`.
    fn drop(&mut self) {
        let mut next = self.comefrom.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut owned) => next = owned.comefrom.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.same_state_as(other)
    }
}

impl Eq for SearchNode {}

/// Accumulates the next state's per-piece positions/orientations before
/// it's sealed into an immutable, `Rc`-shared [`SearchNode`]. Substitutes
/// for the original's pattern of constructing a `node0_c` and mutating its
/// arrays in place before it is ever shared.
pub struct SearchNodeBuilder {
    positions: Vec<Position>,
    orientations: Vec<Orientation>,
}

impl SearchNodeBuilder {
    #[must_use]
    pub fn from_node(node: &SearchNode) -> Self {
        Self {
            positions: (0..node.piece_count()).map(|i| node.position(i)).collect(),
            orientations: (0..node.piece_count()).map(|i| node.orientation(i)).collect(),
        }
    }

    pub fn set(&mut self, piece: usize, position: Position, orientation: Orientation) {
        self.positions[piece] = position;
        self.orientations[piece] = orientation;
    }

    #[must_use]
    pub fn finish(self, comefrom: Rc<SearchNode>) -> Rc<SearchNode> {
        Rc::new(SearchNode {
            comefrom: Some(comefrom),
            positions: self.positions,
            orientations: self.orientations,
        })
    }
}

/// Builds the root node of a search: every piece at its starting
/// position, no predecessor.
#[must_use]
pub fn root_node(positions: Vec<Position>, orientations: Vec<Orientation>) -> Rc<SearchNode> {
    Rc::new(SearchNode {
        comefrom: None,
        positions,
        orientations,
    })
}
