//! Fixed-point math utilities for deterministic simulation.
//!
//! All ratio and modifier math uses fixed-point arithmetic to ensure
//! deterministic behavior across platforms. Floating-point operations
//! can produce different results on different CPUs.

use fixed::types::I32F32;

/// Fixed-point number type for ratio and modifier math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Goods amounts and movement costs remain plain `i32`; `Fixed` only
/// carries the intermediate scaling factors between them.
pub type Fixed = I32F32;

/// Floor a fixed-point value to an integer goods amount.
///
/// Fractional goods are never created; every realized production or
/// consumption amount passes through this.
#[must_use]
pub fn floor_to_i32(value: Fixed) -> i32 {
    value.floor().to_num::<i32>()
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}
