//! Voxel-geometry primitives for interlocking puzzle pieces.
//!
//! This crate is the minimal "outside library" the disassembly analysis
//! core (see the `disassembler` crate) is built against: shapes made of
//! unit voxels, the 24 proper rotations of a cube-aligned shape, and the
//! raw column-wise collision-gap query that `MovementCache` memoises.
//!
//! Shape minimisation, arbitrary (non-cubic) rotation groups, and bounding
//! box computation beyond what the gap query needs are out of scope.

mod error;
mod orientation;
mod shape;
mod voxel_space;

pub use error::GeometryError;
pub use orientation::{Orientation, ORIENTATION_COUNT};
pub use shape::{Axis, Shape, AXES};
pub use voxel_space::VoxelSpace;

/// Sentinel distance used in place of an unreachable/unbounded gap.
///
/// Matches the `disassembler` crate's own `INFINITY` constant; the two are
/// kept equal so `MovementCache` results compose directly into
/// `MovementMatrix` entries without rescaling (see spec.md §9, "Infinity
/// sentinel").
pub const INFINITY: i32 = 32_000;
