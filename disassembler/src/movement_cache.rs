//! Memoised per-axis collision-gap queries between two shapes.
//!
//! Grounded on `movementCache_c` (used from `disassembler_0_c::prepare`):
//! the underlying gap computation is pure but expensive relative to how
//! often the same `(shape, orientation, shape, orientation, offset)`
//! tuple recurs while filling the movement matrix, so results are cached.
//! `fxhash::FxHashMap` is used instead of `std::collections::HashMap`
//! because this cache is filled with a very high volume of small integer
//! keys and never faces adversarial input, the same tradeoff
//! `cycle_combination_solver` makes for its own lookup tables.
use std::cell::RefCell;

use fxhash::FxHashMap;
use geometry::{Orientation, Shape};

use crate::types::ShapeId;

type CacheKey = (i32, i32, i32, u8, u8, u32, u32);

pub struct MovementCache<'a> {
    shapes: &'a [Shape],
    cache: RefCell<FxHashMap<CacheKey, (i32, i32, i32)>>,
}

impl<'a> MovementCache<'a> {
    #[must_use]
    pub fn new(shapes: &'a [Shape]) -> Self {
        Self {
            shapes,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// The per-axis gap between `fixed` (shape `fixed_shape` in orientation
    /// `fixed_orientation`) and `moving` (shape `moving_shape` in
    /// orientation `moving_orientation`), with `moving` offset by
    /// `offset` relative to `fixed`.
    #[must_use]
    pub fn query(
        &self,
        fixed_shape: ShapeId,
        fixed_orientation: Orientation,
        moving_shape: ShapeId,
        moving_orientation: Orientation,
        offset: (i32, i32, i32),
    ) -> (i32, i32, i32) {
        let key = (
            offset.0,
            offset.1,
            offset.2,
            fixed_orientation.0,
            moving_orientation.0,
            fixed_shape.0,
            moving_shape.0,
        );
        if let Some(&hit) = self.cache.borrow().get(&key) {
            return hit;
        }
        let fixed = &self.shapes[fixed_shape.0 as usize];
        let moving = &self.shapes[moving_shape.0 as usize];
        let result = fixed.column_gap(fixed_orientation, moving, moving_orientation, offset);
        self.cache.borrow_mut().insert(key, result);
        result
    }
}
