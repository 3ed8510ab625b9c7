use crate::error::GeometryError;
use std::sync::LazyLock;

/// One of the 24 proper rotations of a cube-aligned voxel shape.
///
/// The puzzle solver treats orientations as an opaque `0..24` index; the
/// actual rotation matrices are an implementation detail of this crate,
/// generated once and memoised in [`ROTATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Orientation(pub u8);

pub const ORIENTATION_COUNT: u8 = 24;

impl Orientation {
    /// # Errors
    /// Returns [`GeometryError::InvalidOrientation`] if `index >= 24`.
    pub fn new(index: u8) -> Result<Self, GeometryError> {
        if index < ORIENTATION_COUNT {
            Ok(Self(index))
        } else {
            Err(GeometryError::InvalidOrientation(index))
        }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self(0)
    }

    /// Applies this orientation's rotation matrix to a voxel offset.
    #[must_use]
    pub fn apply(self, (x, y, z): (i32, i32, i32)) -> (i32, i32, i32) {
        let m = &ROTATIONS[usize::from(self.0)];
        (
            m[0][0] * x + m[0][1] * y + m[0][2] * z,
            m[1][0] * x + m[1][1] * y + m[1][2] * z,
            m[2][0] * x + m[2][1] * y + m[2][2] * z,
        )
    }
}

type Matrix3 = [[i32; 3]; 3];

/// The 24 signed-permutation matrices with determinant +1, i.e. the
/// rotation group of the cube. Index 0 is always the identity.
static ROTATIONS: LazyLock<[Matrix3; 24]> = LazyLock::new(generate_rotations);

fn determinant(m: &Matrix3) -> i32 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn generate_rotations() -> [Matrix3; 24] {
    let perms = [
        [0usize, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let signs = [-1i32, 1];

    let mut found = Vec::with_capacity(24);
    for perm in perms {
        for sx in signs {
            for sy in signs {
                for sz in signs {
                    let mut m = [[0i32; 3]; 3];
                    m[0][perm[0]] = sx;
                    m[1][perm[1]] = sy;
                    m[2][perm[2]] = sz;
                    if determinant(&m) == 1 {
                        found.push(m);
                    }
                }
            }
        }
    }

    found.sort_by_key(|m| {
        m.iter()
            .flat_map(|row| row.iter().copied())
            .collect::<Vec<_>>()
    });

    let identity_pos = found
        .iter()
        .position(|m| *m == [[1, 0, 0], [0, 1, 0], [0, 0, 1]])
        .expect("identity is always a proper rotation");
    found.swap(0, identity_pos);

    found.try_into().expect("exactly 24 proper rotations exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_24_distinct_rotations() {
        let rots = &*ROTATIONS;
        for (i, a) in rots.iter().enumerate() {
            for (j, b) in rots.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "rotations {i} and {j} coincide");
                }
                assert_eq!(determinant(a), 1);
            }
        }
    }

    #[test]
    fn identity_is_orientation_zero() {
        assert_eq!(Orientation::identity().apply((3, -2, 7)), (3, -2, 7));
    }

    #[test]
    fn rotation_preserves_voxel_count_under_composition() {
        // Applying any orientation and then its "transpose" (inverse, since
        // rotation matrices are orthogonal) returns the original point.
        for i in 0..ORIENTATION_COUNT {
            let o = Orientation::new(i).unwrap();
            let p = (1, 2, 3);
            let rotated = o.apply(p);
            // The inverse of a signed-permutation matrix is its transpose;
            // searching for it among the 24 rotations must always succeed.
            let inverse = (0..ORIENTATION_COUNT)
                .map(|j| Orientation::new(j).unwrap())
                .find(|cand| cand.apply(rotated) == p);
            assert!(inverse.is_some(), "no inverse found for orientation {i}");
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(
            Orientation::new(24),
            Err(GeometryError::InvalidOrientation(24))
        );
    }
}
