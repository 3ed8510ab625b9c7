use crate::error::GeometryError;

/// A dense, axis-aligned bounding box of voxels, filled or empty.
///
/// This is the raw input format pieces are authored in before being
/// minimised into a [`crate::Shape`]; it plays the same role the original
/// project's `voxel_c` grid plays relative to a disassembler piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelSpace {
    dim: (u32, u32, u32),
    filled: Vec<bool>,
}

impl VoxelSpace {
    #[must_use]
    pub fn empty(dim: (u32, u32, u32)) -> Self {
        let (x, y, z) = dim;
        Self {
            dim,
            filled: vec![false; (x as usize) * (y as usize) * (z as usize)],
        }
    }

    #[must_use]
    pub fn dim(&self) -> (u32, u32, u32) {
        self.dim
    }

    fn index(&self, (x, y, z): (i32, i32, i32)) -> Option<usize> {
        let (dx, dy, dz) = self.dim;
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as u32, y as u32, z as u32);
        if x >= dx || y >= dy || z >= dz {
            return None;
        }
        Some((x + y * dx + z * dx * dy) as usize)
    }

    /// # Errors
    /// Returns [`GeometryError::OutOfBounds`] if `coord` lies outside the
    /// space's declared dimensions.
    pub fn set(&mut self, coord: (i32, i32, i32), filled: bool) -> Result<(), GeometryError> {
        let idx = self
            .index(coord)
            .ok_or(GeometryError::OutOfBounds(coord, self.dim))?;
        self.filled[idx] = filled;
        Ok(())
    }

    #[must_use]
    pub fn is_filled(&self, coord: (i32, i32, i32)) -> bool {
        self.index(coord).is_some_and(|idx| self.filled[idx])
    }

    /// Iterates over every filled voxel's coordinates.
    pub fn filled_voxels(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let (dx, dy, _) = self.dim;
        self.filled
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(move |(idx, _)| {
                let idx = idx as u32;
                let x = idx % dx;
                let y = (idx / dx) % dy;
                let z = idx / (dx * dy);
                (x as i32, y as i32, z as i32)
            })
    }
}
