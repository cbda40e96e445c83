//! Qubit identifiers and error handling logic

use std::fmt;

/// Unique identifier for a qubit within a circuit.
/// Its uniqueness is context-dependent within one circuit; the simulation
/// engine assigns state-vector positions by sorting the identifiers, so the
/// numbering chosen by the circuit composer is stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Error types covering the whole factorization pipeline.
///
/// The taxonomy separates configuration mistakes (fix the parameters),
/// programming errors (fix the code), and estimation failures (a normal
/// outcome of the probabilistic algorithm; resample or pick another base).
#[derive(Debug, Clone, PartialEq, Eq)] // Eq useful for testing error variants
pub enum FactorError {
    /// The requested `(base, modulus)` pair cannot be used: the base is not
    /// coprime to the modulus, or no swap decomposition of the modular
    /// multiplication is known for it. Raised before any circuit is built.
    InvalidParameter {
        /// InvalidParameter failure message
        message: String
    },

    /// A gate matrix failed the tolerance-based unitarity check.
    /// This indicates a programming error in gate construction, never a
    /// recoverable runtime condition.
    UnitarityViolation {
        /// UnitarityViolation failure message
        message: String
    },

    /// No ranked phase estimate produced an even, nonzero period candidate.
    /// Retryable with a fresh sample batch or a different base.
    PeriodNotFound {
        /// PeriodNotFound failure message
        message: String
    },

    /// A period was recovered, but every candidate yielded only the trivial
    /// divisors 1 and the modulus itself. Retryable like `PeriodNotFound`.
    TrivialFactors {
        /// The even period whose gcd guesses were both trivial
        period: u64
    },

    /// An execution backend reported a failure. Propagated unchanged; the
    /// pipeline does not mask or retry backend errors.
    BackendFailure {
        /// BackendFailure failure message
        message: String
    },

    /// Internal inconsistency encountered during simulation itself.
    SimulationError {
        /// SimulationError failure message
        message: String
    },
}

impl FactorError {
    /// Returns `true` for the failure modes that are an expected outcome of
    /// the probabilistic algorithm. A retry loop can resample on these,
    /// whereas `InvalidParameter` requires reconfiguration.
    pub fn is_estimation_failure(&self) -> bool {
        matches!(
            self,
            FactorError::PeriodNotFound { .. } | FactorError::TrivialFactors { .. }
        )
    }
}

impl fmt::Display for FactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorError::InvalidParameter { message } => write!(f, "Invalid Parameter: {}", message),
            FactorError::UnitarityViolation { message } => write!(f, "Unitarity Violation: {}", message),
            FactorError::PeriodNotFound { message } => write!(f, "Period Not Found: {}", message),
            FactorError::TrivialFactors { period } => write!(f, "Trivial Factors: period {} yielded only trivial divisors", period),
            FactorError::BackendFailure { message } => write!(f, "Backend Failure: {}", message),
            FactorError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for FactorError {}
