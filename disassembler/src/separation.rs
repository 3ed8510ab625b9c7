//! The disassembly result tree and its XML-like serialisation.
//!
//! Grounded on `disassembly.cpp`'s `state_c`/`separation_c`: a
//! `Separation` is a sequence of intermediate `State`s ending in a
//! separating move, optionally followed by the two recursive
//! sub-problems (`removed`, `left`) that solve each half further.
use std::cmp::Ordering;

use crate::types::{Position, ShapeId};
use crate::xml::{self, Cursor, LoadError};

/// One recorded position of every piece along a separation's move
/// sequence. Orientation isn't recorded here: the original format only
/// ever serialised `dx`/`dy`/`dz`, and nothing in this crate's output
/// depends on replaying orientation changes from a saved tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    positions: Vec<Position>,
}

impl State {
    #[must_use]
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[must_use]
    pub fn piece_removed(&self) -> Option<usize> {
        self.positions.iter().position(|p| p.is_removed())
    }

    fn save(&self) -> String {
        let xs: Vec<i32> = self.positions.iter().map(|p| p.x).collect();
        let ys: Vec<i32> = self.positions.iter().map(|p| p.y).collect();
        let zs: Vec<i32> = self.positions.iter().map(|p| p.z).collect();
        format!(
            "<state><dx>{}</dx><dy>{}</dy><dz>{}</dz></state>",
            xml::format_numbers(&xs),
            xml::format_numbers(&ys),
            xml::format_numbers(&zs)
        )
    }

    fn load(inner: &str, piece_count: usize) -> Result<Self, LoadError> {
        let mut cursor = Cursor::new(inner);
        let dx = cursor
            .next_element("dx")?
            .ok_or(LoadError::MissingElement("dx"))?;
        let dy = cursor
            .next_element("dy")?
            .ok_or(LoadError::MissingElement("dy"))?;
        let dz = cursor
            .next_element("dz")?
            .ok_or(LoadError::MissingElement("dz"))?;
        let xs = xml::parse_numbers(dx.inner, piece_count)?;
        let ys = xml::parse_numbers(dy.inner, piece_count)?;
        let zs = xml::parse_numbers(dz.inner, piece_count)?;
        let positions = (0..piece_count)
            .map(|i| Position::new(xs[i], ys[i], zs[i]))
            .collect();
        Ok(Self { positions })
    }
}

/// One level of the disassembly tree: the pieces present, the states
/// they pass through, and (if this level's final state separates the
/// assembly into two halves) the recursive solution of each half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separation {
    pieces: Vec<ShapeId>,
    states: Vec<State>,
    removed: Option<Box<Separation>>,
    left: Option<Box<Separation>>,
}

impl Separation {
    #[must_use]
    pub fn new(pieces: Vec<ShapeId>, states: Vec<State>) -> Self {
        Self {
            pieces,
            states,
            removed: None,
            left: None,
        }
    }

    /// Builds a level with whichever of its two halves actually produced
    /// a further sub-disassembly tree. A side is `None` when that half
    /// was a single piece with nothing left to decompose, matching the
    /// original format's convention of omitting a trivial child branch
    /// entirely rather than recording an empty one.
    #[must_use]
    pub fn build(pieces: Vec<ShapeId>, states: Vec<State>, removed: Option<Separation>, left: Option<Separation>) -> Self {
        Self {
            pieces,
            states,
            removed: removed.map(Box::new),
            left: left.map(Box::new),
        }
    }

    #[must_use]
    pub fn with_children(pieces: Vec<ShapeId>, states: Vec<State>, removed: Separation, left: Separation) -> Self {
        Self::build(pieces, states, Some(removed), Some(left))
    }

    #[must_use]
    pub fn pieces(&self) -> &[ShapeId] {
        &self.pieces
    }

    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    #[must_use]
    pub fn removed(&self) -> Option<&Separation> {
        self.removed.as_deref()
    }

    #[must_use]
    pub fn left(&self) -> Option<&Separation> {
        self.left.as_deref()
    }

    /// Pushes a new leading state onto the front of the move sequence.
    /// Grounded on `separation_c::addstate`, which the original
    /// implements as a `push_front` on a `deque` since states are
    /// discovered in reverse (walking a search node's `comefrom` chain
    /// back to the root).
    pub fn addstate(&mut self, state: State) {
        self.states.insert(0, state);
    }

    /// Total number of individual moves this (sub)tree represents:
    /// one less than the number of recorded states at this level, plus
    /// both children's move counts. Grounded on `sumMoves`.
    #[must_use]
    pub fn sum_moves(&self) -> usize {
        let here = self.states.len().saturating_sub(1);
        let removed = self.removed.as_ref().map_or(0, |r| r.sum_moves());
        let left = self.left.as_ref().map_or(0, |l| l.sum_moves());
        here + removed + left
    }

    /// True if any level of the tree records more than one state-to-state
    /// transition with more than a single piece moving at once... in
    /// this simplified model every transition may move several pieces
    /// simultaneously, so this instead flags whether any level needed
    /// more than one move to separate. Grounded on `containsMultiMoves`.
    #[must_use]
    pub fn contains_multi_moves(&self) -> bool {
        self.states.len() > 2
            || self.removed.as_ref().is_some_and(|r| r.contains_multi_moves())
            || self.left.as_ref().is_some_and(|l| l.contains_multi_moves())
    }

    /// A dotted, depth-first textual summary such as `3.2.1`: the move
    /// count at this level followed by the same for `removed` and `left`.
    /// Grounded on `movesText`.
    #[must_use]
    pub fn moves_text(&self) -> String {
        let mut parts = vec![(self.states.len().saturating_sub(1)).to_string()];
        if let Some(r) = &self.removed {
            parts.push(r.moves_text());
        }
        if let Some(l) = &self.left {
            parts.push(l.moves_text());
        }
        parts.join(".")
    }

    /// Lexicographic comparison used to rank candidate solutions:
    /// fewer states first, then fewer pieces in `left`, then fewer in
    /// `removed`. Grounded on `separation_c::compare`.
    #[must_use]
    pub fn compare(&self, other: &Separation) -> Ordering {
        self.states
            .len()
            .cmp(&other.states.len())
            .then_with(|| {
                let left_len = |s: &Separation| s.left.as_ref().map_or(0, |l| l.pieces.len());
                left_len(self).cmp(&left_len(other))
            })
            .then_with(|| {
                let removed_len = |s: &Separation| s.removed.as_ref().map_or(0, |r| r.pieces.len());
                removed_len(self).cmp(&removed_len(other))
            })
    }

    /// Shifts one piece's recorded position by a fixed offset across
    /// every state at this level and below, wherever that piece appears.
    /// Used by the recursive splitter to translate a sub-problem's
    /// "removed to infinity" coordinates back to the sub-problem's own
    /// local frame. Grounded on `shiftPiece`.
    pub fn shift_piece(&mut self, piece_local_index: usize, dx: i32, dy: i32, dz: i32) {
        for state in &mut self.states {
            if let Some(p) = state.positions.get_mut(piece_local_index) {
                *p = Position::new(p.x + dx, p.y + dy, p.z + dz);
            }
        }
        if let Some(r) = &mut self.removed {
            r.shift_piece(piece_local_index, dx, dy, dz);
        }
        if let Some(l) = &mut self.left {
            l.shift_piece(piece_local_index, dx, dy, dz);
        }
    }

    /// Replaces every occurrence of one shape id with another throughout
    /// the tree; used when a grouping substitution picks a representative
    /// shape for an equivalence class. Grounded on `exchangeShape`.
    pub fn exchange_shape(&mut self, from: ShapeId, to: ShapeId) {
        for p in &mut self.pieces {
            if *p == from {
                *p = to;
            }
        }
        if let Some(r) = &mut self.removed {
            r.exchange_shape(from, to);
        }
        if let Some(l) = &mut self.left {
            l.exchange_shape(from, to);
        }
    }

    #[must_use]
    pub fn save_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<separation>");
        out.push_str(&format!(
            r#"<pieces count="{}">{}</pieces>"#,
            self.pieces.len(),
            xml::format_numbers(&self.pieces.iter().map(|s| s.0 as i32).collect::<Vec<_>>())
        ));
        for state in &self.states {
            out.push_str(&state.save());
        }
        if let Some(r) = &self.removed {
            out.push_str(&r.save_xml_typed("removed"));
        }
        if let Some(l) = &self.left {
            out.push_str(&l.save_xml_typed("left"));
        }
        out.push_str("</separation>");
        out
    }

    fn save_xml_typed(&self, kind: &str) -> String {
        self.save_xml().replacen("<separation>", &format!(r#"<separation type="{kind}">"#), 1)
    }

    /// # Errors
    /// Returns [`LoadError`] if the input doesn't match the grammar, or
    /// if `piece_count` doesn't match the declared `<pieces count>`.
    pub fn load_xml(input: &str, piece_count: usize) -> Result<Self, LoadError> {
        let mut cursor = Cursor::new(input);
        let root = cursor
            .next_element("separation")?
            .ok_or(LoadError::MissingElement("separation"))?;
        Self::load_from_inner(root.inner, piece_count)
    }

    fn load_from_inner(inner: &str, piece_count: usize) -> Result<Self, LoadError> {
        let mut cursor = Cursor::new(inner);
        let pieces_el = cursor
            .next_element("pieces")?
            .ok_or(LoadError::MissingElement("pieces"))?;
        let declared: usize = pieces_el
            .attr("count")
            .ok_or(LoadError::MissingAttribute("pieces", "count"))?
            .parse()
            .map_err(|_| LoadError::MalformedNumberList(pieces_el.inner.to_string()))?;
        if declared != piece_count {
            return Err(LoadError::PieceCountMismatch {
                expected: piece_count,
                found: declared,
            });
        }
        let pieces: Vec<ShapeId> = xml::parse_numbers(pieces_el.inner, piece_count)?
            .into_iter()
            .map(|v| ShapeId(v as u32))
            .collect();

        // `<state>` elements always precede any nested `<separation>`
        // children in this grammar, so restrict the scan to the text
        // before the first child to avoid matching `<state>` spans that
        // belong to a nested sub-problem instead of this level.
        let states_area = inner.find("<separation").map_or(inner, |idx| &inner[..idx]);
        let mut states_cursor = Cursor::new(states_area);
        let mut states = Vec::new();
        while let Some(state_el) = states_cursor.next_element("state")? {
            states.push(State::load(state_el.inner, piece_count)?);
        }
        if states.is_empty() {
            return Err(LoadError::NoStates);
        }

        let last = states.last().expect("checked non-empty above");
        let removed_pc = last.piece_removed().map_or(0, |_| {
            last.positions.iter().filter(|p| p.is_removed()).count()
        });
        let left_pc = piece_count - removed_pc;

        let mut removed = None;
        let mut left = None;
        let mut scan = Cursor::new(inner);
        while let Some(child) = scan.next_element("separation")? {
            match child.attr("type") {
                Some("removed") => {
                    if removed.is_some() {
                        return Err(LoadError::DuplicateBranch("removed"));
                    }
                    if removed_pc == 0 || left_pc == 0 {
                        return Err(LoadError::PieceCountMismatch {
                            expected: piece_count,
                            found: 0,
                        });
                    }
                    removed = Some(Box::new(Self::load_from_inner(child.inner, removed_pc)?));
                }
                Some("left") => {
                    if left.is_some() {
                        return Err(LoadError::DuplicateBranch("left"));
                    }
                    if removed_pc == 0 || left_pc == 0 {
                        return Err(LoadError::PieceCountMismatch {
                            expected: piece_count,
                            found: 0,
                        });
                    }
                    left = Some(Box::new(Self::load_from_inner(child.inner, left_pc)?));
                }
                _ => {}
            }
        }

        Ok(Self {
            pieces,
            states,
            removed,
            left,
        })
    }
}
