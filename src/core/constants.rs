//! Numerical tolerances shared across the crate.

/// Tolerance constants for floating-point validation
pub mod tolerances {
    /// Allowed deviation of the state vector's total squared magnitude from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Allowed deviation of U†U from the identity in the unitarity check.
    pub const UNITARITY_TOLERANCE: f64 = 1e-9;
    /// Threshold below which a probability is treated as exactly zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
}
