//! The all-pairs, per-axis movement matrix and its transitive closure.
//!
//! Grounded on `disassembler_0_c::prepare`/`prepare2`: `prepare` fills a
//! `[3][n*n]` matrix of pairwise positive-direction collision gaps (the
//! negative-direction gap for piece `i` past piece `j` is the
//! positive-direction gap for `j` past `i`, so only one sign is stored);
//! `prepare2` then tightens it by transitive closure — if `i` would hit
//! `k` first but `k` itself has room to continue toward `j`, `i`'s real
//! reach past `k` is bounded by `gap(i, k) + gap(k, j)` — repeating until
//! no entry improves.
use crate::movement_cache::MovementCache;
use crate::types::{Position, ShapeId};
use geometry::{Axis, Orientation, AXES};

pub struct MovementMatrix {
    piece_count: usize,
    /// One `piece_count * piece_count` table per axis; entry `[i * n + j]`
    /// is how far piece `i` can move in the positive direction of that
    /// axis before it would collide with piece `j` (held fixed).
    tables: [Vec<i32>; 3],
}

impl MovementMatrix {
    /// Builds the raw pairwise matrix (`prepare`).
    #[must_use]
    pub fn build(
        piece_count: usize,
        shapes_of_piece: &[ShapeId],
        positions: &[Position],
        orientations: &[Orientation],
        cache: &MovementCache,
    ) -> Self {
        let mut tables = [
            vec![0; piece_count * piece_count],
            vec![0; piece_count * piece_count],
            vec![0; piece_count * piece_count],
        ];

        for i in 0..piece_count {
            for j in 0..piece_count {
                if i == j {
                    continue;
                }
                let offset = (
                    positions[i].x - positions[j].x,
                    positions[i].y - positions[j].y,
                    positions[i].z - positions[j].z,
                );
                let gaps = cache.query(
                    shapes_of_piece[j],
                    orientations[j],
                    shapes_of_piece[i],
                    orientations[i],
                    offset,
                );
                tables[0][i * piece_count + j] = gaps.0;
                tables[1][i * piece_count + j] = gaps.1;
                tables[2][i * piece_count + j] = gaps.2;
            }
        }

        let mut matrix = Self { piece_count, tables };
        matrix.close();
        matrix
    }

    /// The transitive closure pass (`prepare2`).
    fn close(&mut self) {
        let n = self.piece_count;
        for axis in 0..3 {
            Self::close_axis(n, &mut self.tables[axis]);
        }
    }

    fn close_axis(n: usize, m: &mut [i32]) {
        loop {
            let mut changed = false;
            for k in 0..n {
                for i in 0..n {
                    if i == k {
                        continue;
                    }
                    let mik = m[i * n + k];
                    if mik >= crate::constants::INFINITY {
                        continue;
                    }
                    for j in 0..n {
                        if j == k || j == i {
                            continue;
                        }
                        let mkj = m[k * n + j];
                        if mkj >= crate::constants::INFINITY {
                            continue;
                        }
                        let candidate = (mik + mkj).min(crate::constants::INFINITY);
                        if candidate < m[i * n + j] {
                            m[i * n + j] = candidate;
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// How far piece `i` can move in the positive direction of `axis`
    /// before hitting piece `j` (fixed).
    #[must_use]
    pub fn gap(&self, axis: Axis, moving: usize, fixed: usize) -> i32 {
        let idx = AXES.iter().position(|a| *a == axis).expect("axis is one of the three constants");
        self.tables[idx][moving * self.piece_count + fixed]
    }
}
