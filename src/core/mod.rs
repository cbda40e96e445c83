// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qfact::core::TypeName`
pub use error::{FactorError, QubitId};
pub use state::StateVector;

pub mod constants;
pub use constants::tolerances::{AMPLITUDE_TOLERANCE, NORM_TOLERANCE, UNITARITY_TOLERANCE}; // Re-export
