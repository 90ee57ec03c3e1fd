//! Convenience wrappers around methods from the approx crate for comparing simulated quantities
//! (probabilities, positions, velocities) that are the result of repeated floating point products.

use approx::AbsDiffEq;

/// Default accuracy for comparing products of multipliers.
pub const ACC: f64 = 10e-11;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}
