// src/lib.rs

//! `qfact` - Integer factorization via simulated quantum period-finding
//!
//! This library builds the phase-estimation circuit of Shor's algorithm,
//! simulates it on a local state vector, and recovers a nontrivial factor
//! pair through continued-fraction post-processing. The execution backend
//! is a trait, so the same extraction logic runs against the local
//! simulator or any remote service returning sample counts.

pub mod core;
pub mod gates;
pub mod circuits;
pub mod simulation;
pub mod extract;
pub mod shor;

// Re-export the most common types for easier top-level use
pub use crate::core::{FactorError, QubitId, StateVector};
pub use crate::gates::{Gate, GateOp, ModMul, SwapModMul, qft_inverse};
pub use crate::circuits::{Circuit, CircuitBuilder};
pub use crate::simulation::{ExecutionBackend, OutcomeDistribution, SampleCounts, Simulator};
pub use crate::extract::{
    continued_fraction,
    gcd,
    mod_pow,
    Factorization,
    PeriodExtractor,
    Rational,
};
pub use crate::shor::{factor, period_finding_circuit, ShorConfig};

// Example 1: Factor 15 end to end
// Runs the whole pipeline against the local simulator: compose the
// period-finding circuit, sample it, and extract a verified factor pair.
/// ```
/// use qfact::{factor, ShorConfig, Simulator};
///
/// let config = ShorConfig::new(15, 7);
/// let backend = Simulator::with_seed(2024);
///
/// let result = factor(&config, &backend).expect("15 should factor with base 7");
/// println!("{}", result);
///
/// // The period of 7 mod 15 is 4; every useful phase estimate leads to a
/// // proper divisor, so 3 or 5 must appear among the gcd guesses.
/// let (g1, g2) = result.factors;
/// assert!([g1, g2].iter().any(|&g| g == 3 || g == 5));
/// assert_eq!(result.period % 2, 0);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Exact distribution, no sampling
// Inspects the simulator's exact outcome distribution and feeds it straight
// to the extractor, bypassing shot noise entirely.
/// ```
/// use qfact::{period_finding_circuit, PeriodExtractor, ShorConfig, Simulator};
///
/// let config = ShorConfig::new(15, 7);
/// let circuit = period_finding_circuit(&config).expect("valid configuration");
///
/// let distribution = Simulator::new().run(&circuit).expect("simulation succeeds");
/// // Phase estimation for period 4 concentrates all probability on the
/// // four multiples of 1/4.
/// assert!((distribution.total() - 1.0).abs() < 1e-9);
///
/// let extractor = PeriodExtractor::new(config.base, config.modulus, config.counting_width);
/// let result = extractor.extract(&distribution).expect("factors");
/// let (g1, g2) = result.factors;
/// assert!([g1, g2].iter().any(|&g| g == 3 || g == 5));
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
