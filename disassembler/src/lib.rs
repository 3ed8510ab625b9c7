//! Disassembly analysis for interlocking voxel puzzles.
//!
//! Given a concrete placement of every piece ([`assembly::Assembly`]) and
//! the puzzle's static shape/weight/grouping data ([`assembly::Puzzle`]),
//! [`disassembler::Disassembler::disassemble`] searches for a sequence of
//! axis-aligned slides that takes the assembly apart, recursing into each
//! half once a piece (or rigid group of pieces) comes free.
//!
//! The search itself — movement caching, the per-node state graph,
//! duplicate detection, move enumeration, and the recursive splitter — is
//! a direct generalisation of the original project's `disassembler_0_c`;
//! see `DESIGN.md` at the repository root for the grounding of each part.

pub mod assembly;
pub mod constants;
pub mod disassembler;
pub mod error;
pub mod grouping;
pub mod move_finder;
pub mod movement_cache;
pub mod movement_matrix;
pub mod node_hash;
pub mod search_node;
pub mod separation;
pub mod types;
pub mod xml;

pub use assembly::{Assembly, Puzzle};
pub use disassembler::Disassembler;
pub use error::DisassemblerError;
pub use separation::{Separation, State};
pub use types::{Position, ShapeId, Weight};
