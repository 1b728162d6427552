#![allow(dead_code)]

pub use pertdag_test_utils::{builders, demo_path, init_tracing};

/// Absolute tolerance used when comparing computed durations.
pub const TOL: f64 = 1e-9;

pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
