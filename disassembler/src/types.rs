//! Small value types shared by every component of the search.

use crate::constants::REMOVED_THRESHOLD;
use std::ops::Index;

/// Identifies a piece's shape (its voxel geometry), independent of which
/// physical piece slot currently holds it. Multiple pieces may share a
/// `ShapeId` when the puzzle contains duplicate pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

/// A piece's relative "heaviness": when two groups of pieces could move
/// against each other, the lighter-weighted group is the one that actually
/// moves. Grounded on `disassembler_0_c::newNode`'s `moveWeight`/`stilWeight`
/// comparison, in turn fed by `puzzle->probGetShapeShape(..)->getWeight()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(pub u32);

/// A piece's position, in voxel units, relative to the assembly's fixed
/// frame of reference. Coordinates beyond [`REMOVED_THRESHOLD`] in
/// magnitude mark a piece that has slid out of the assembly entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn is_removed(self) -> bool {
        self.x.abs() > REMOVED_THRESHOLD || self.y.abs() > REMOVED_THRESHOLD || self.z.abs() > REMOVED_THRESHOLD
    }

    #[must_use]
    pub fn translated(self, axis: geometry::Axis, amount: i32) -> Self {
        match axis {
            geometry::Axis::X => Self::new(self.x + amount, self.y, self.z),
            geometry::Axis::Y => Self::new(self.x, self.y + amount, self.z),
            geometry::Axis::Z => Self::new(self.x, self.y, self.z + amount),
        }
    }
}

impl Index<geometry::Axis> for Position {
    type Output = i32;

    fn index(&self, axis: geometry::Axis) -> &i32 {
        match axis {
            geometry::Axis::X => &self.x,
            geometry::Axis::Y => &self.y,
            geometry::Axis::Z => &self.z,
        }
    }
}
