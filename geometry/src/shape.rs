use crate::{error::GeometryError, orientation::Orientation, voxel_space::VoxelSpace};
use itertools::Itertools;
use std::collections::HashMap;

/// An axis a piece may slide along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

pub const AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

/// A minimised, shape-only description of a piece: the set of voxels it
/// occupies relative to some arbitrary but fixed local origin.
///
/// Shape minimisation itself (finding the canonical smallest bounding box)
/// is out of scope per spec.md §1 Non-goals; callers are expected to hand
/// in an already-minimised voxel list, as the original project's CLI does
/// before invoking the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    voxels: Vec<(i32, i32, i32)>,
}

impl Shape {
    /// # Errors
    /// Returns [`GeometryError::EmptyShape`] if `voxels` is empty.
    pub fn new(voxels: Vec<(i32, i32, i32)>) -> Result<Self, GeometryError> {
        if voxels.is_empty() {
            return Err(GeometryError::EmptyShape);
        }
        Ok(Self { voxels })
    }

    /// # Errors
    /// Returns [`GeometryError::EmptyShape`] if the voxel space contains no
    /// filled voxels.
    pub fn from_voxel_space(space: &VoxelSpace) -> Result<Self, GeometryError> {
        Self::new(space.filled_voxels().collect())
    }

    #[must_use]
    pub fn voxels(&self) -> &[(i32, i32, i32)] {
        &self.voxels
    }

    fn oriented(&self, orientation: Orientation) -> Vec<(i32, i32, i32)> {
        self.voxels.iter().map(|&v| orientation.apply(v)).collect()
    }

    /// The per-axis column-wise collision gap between `self` (fixed) and
    /// `other` (the moving piece), both placed in their given orientations
    /// with `other` offset by `offset` relative to `self`.
    ///
    /// For each axis, the result is the largest distance `other` can move
    /// in the *positive* direction along that axis before any of its
    /// voxels collides with a voxel of `self`, clamped to
    /// [`crate::INFINITY`] when no voxel of `self` obstructs the column at
    /// all (the pieces are unconstrained along that axis).
    ///
    /// This mirrors `disassembler_0_c::prepare`'s use of
    /// `movementCache_c::getValue`: for each of the three axes, check the
    /// intersection area in that direction column by column and find the
    /// shortest distance before the first voxel of `self` would be hit.
    #[must_use]
    pub fn column_gap(
        &self,
        self_orientation: Orientation,
        other: &Shape,
        other_orientation: Orientation,
        offset: (i32, i32, i32),
    ) -> (i32, i32, i32) {
        let fixed = self.oriented(self_orientation);
        let moving: Vec<(i32, i32, i32)> = other
            .oriented(other_orientation)
            .into_iter()
            .map(|(x, y, z)| (x + offset.0, y + offset.1, z + offset.2))
            .collect();

        let gx = Self::axis_gap(&fixed, &moving, Axis::X);
        let gy = Self::axis_gap(&fixed, &moving, Axis::Y);
        let gz = Self::axis_gap(&fixed, &moving, Axis::Z);
        (gx, gy, gz)
    }

    fn axis_gap(fixed: &[(i32, i32, i32)], moving: &[(i32, i32, i32)], axis: Axis) -> i32 {
        let key = |(x, y, z): (i32, i32, i32)| -> ((i32, i32), i32) {
            match axis {
                Axis::X => ((y, z), x),
                Axis::Y => ((x, z), y),
                Axis::Z => ((x, y), z),
            }
        };

        // Group both fixed and moving voxels by column, keeping every
        // coordinate along `axis` in each — not just one representative
        // per column. A rigid piece can have more than one voxel in the
        // same column (e.g. a shell shape with a hole), and since every
        // voxel translates together, a trailing voxel can reach a fixed
        // obstacle before the column's leading voxel does. The only
        // correct bound is the minimum, over every (moving, fixed) voxel
        // pair sharing a column with the fixed voxel ahead, of the room
        // between them.
        let mut fixed_by_column: HashMap<(i32, i32), Vec<i32>> = HashMap::new();
        for v in fixed {
            let (col, coord) = key(*v);
            fixed_by_column.entry(col).or_default().push(coord);
        }

        let mut moving_by_column: HashMap<(i32, i32), Vec<i32>> = HashMap::new();
        for v in moving {
            let (col, coord) = key(*v);
            moving_by_column.entry(col).or_default().push(coord);
        }

        let mut gap = crate::INFINITY;
        for (col, moving_coords) in &moving_by_column {
            let Some(fixed_coords) = fixed_by_column.get(col) else {
                continue;
            };
            for &mv in moving_coords {
                for &fx in fixed_coords {
                    if fx > mv {
                        gap = gap.min(fx - mv - 1);
                    }
                }
            }
        }
        gap.min(crate::INFINITY)
    }

    /// All voxel coordinates of this shape transformed by `orientation`,
    /// deduplicated and sorted — useful for tests and for building a
    /// [`VoxelSpace`] back out of a shape.
    #[must_use]
    pub fn oriented_sorted(&self, orientation: Orientation) -> Vec<(i32, i32, i32)> {
        self.oriented(orientation).into_iter().sorted().collect()
    }
}
