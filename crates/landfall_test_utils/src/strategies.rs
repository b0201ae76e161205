//! Property-based testing strategies.
//!
//! Strategies generate small legal setups; the properties under test
//! (cost monotonicity, search determinism) do the rest.

use proptest::prelude::*;

/// Map dimensions small enough to search exhaustively.
#[must_use]
pub fn map_dims() -> impl Strategy<Value = (u32, u32)> {
    (4u32..=12, 4u32..=12)
}

/// A coordinate pair within the given dimensions.
#[must_use]
pub fn coords_in(width: u32, height: u32) -> impl Strategy<Value = (i32, i32)> {
    (0..width as i32, 0..height as i32)
}

/// A movement allowance in the range real unit types use.
#[must_use]
pub fn moves_left() -> impl Strategy<Value = i32> {
    1i32..=12
}
