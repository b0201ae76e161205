//! # Landfall Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Standard rule-catalog fixture
//! - World-building helpers
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
