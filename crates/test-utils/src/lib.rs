//! Shared test utilities for the accretion-maps workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A builder for synthetic map files
//! - Grid data generators
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, MapFileBuilder};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for relative floating-point equality, for values spanning many
/// decades such as log-spaced axes.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_rel_eq;
///
/// assert_rel_eq!(1.0e13, 1.0000001e13, 1e-6); // passes
/// ```
#[macro_export]
macro_rules! assert_rel_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let scale = left.abs().max(right.abs()).max(f64::MIN_POSITIVE);
        $crate::assert_approx_eq!(left / scale, right / scale, $tolerance);
    }};
}
