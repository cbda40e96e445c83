// src/shor/mod.rs

//! The period-finding pipeline: configuration validation, circuit
//! composition, execution against a backend, and factor extraction.
//!
//! The circuit follows the standard phase-estimation layout: Hadamards put
//! the counting register into uniform superposition, the work register is
//! initialized to the unit residue |1>, each counting qubit controls
//! modular multiplication by base^(2^i), and the inverse QFT turns the
//! accumulated phases into a measurable fraction.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{FactorError, QubitId};
use crate::extract::{Factorization, PeriodExtractor};
use crate::gates::{h, qft_inverse, x, GateOp, ModMul, SwapModMul};
use crate::simulation::ExecutionBackend;

/// Problem parameters for one factorization attempt.
///
/// Plain integers supplied by the caller; `validate` checks them before any
/// circuit is built so an invalid configuration never reaches a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorConfig {
    /// The composite number to factor.
    pub modulus: u64,
    /// The coprime base whose multiplicative period is estimated.
    pub base: u64,
    /// Counting-register width in qubits; phases are resolved in units of
    /// 2^-counting_width.
    pub counting_width: usize,
    /// Number of shots to request from the execution backend.
    pub shots: u64,
}

impl ShorConfig {
    /// Configuration with the customary counting width and shot count.
    pub fn new(modulus: u64, base: u64) -> Self {
        Self { modulus, base, counting_width: 8, shots: 4096 }
    }

    /// Checks every precondition of the pipeline: ranges, coprimality, and
    /// the existence of a swap decomposition for the modular multiplication.
    ///
    /// An `InvalidParameter` error here means the caller must choose
    /// different parameters; resampling cannot help.
    pub fn validate(&self) -> Result<(), FactorError> {
        if self.counting_width == 0 || self.counting_width > 32 {
            return Err(FactorError::InvalidParameter {
                message: format!(
                    "counting width must be between 1 and 32, got {}",
                    self.counting_width
                ),
            });
        }
        if self.shots == 0 {
            return Err(FactorError::InvalidParameter {
                message: "shot count must be at least 1".to_string(),
            });
        }
        if self.base < 2 || self.base >= self.modulus {
            return Err(FactorError::InvalidParameter {
                message: format!(
                    "base must satisfy 2 <= base < modulus, got base {} for modulus {}",
                    self.base, self.modulus
                ),
            });
        }
        // Coprimality and decomposition support are checked by the operator
        // constructor itself.
        SwapModMul::new(self.base, 0, self.modulus)?;
        Ok(())
    }
}

/// Builds the full period-estimation circuit for the given configuration.
///
/// Layout: counting qubits 0..w-1, work qubits w..w+3. Counting qubit i
/// (least significant first) controls `ModMul(base, i, modulus)` on the
/// work register; the inverse QFT acts on the counting register; counting
/// qubit i is measured into classical bit i. The circuit is a description
/// only; nothing is executed here.
pub fn period_finding_circuit(config: &ShorConfig) -> Result<Circuit, FactorError> {
    config.validate()?;

    let width = config.counting_width;
    let counting: Vec<QubitId> = (0..width).map(|i| QubitId(i as u64)).collect();

    // Work register sized by the first operator; every power shares it.
    let first = SwapModMul::new(config.base, 0, config.modulus)?;
    let work: Vec<QubitId> = (0..first.work_width())
        .map(|j| QubitId((width + j) as u64))
        .collect();

    let mut builder = CircuitBuilder::new();
    for &qubit in &counting {
        builder = builder.gate(GateOp::new(h(), vec![qubit]));
    }
    // The work register starts as the unit residue |1>.
    builder = builder.gate(GateOp::new(x(), vec![work[0]]));

    for (i, &control) in counting.iter().enumerate() {
        let modmul = SwapModMul::new(config.base, i as u32, config.modulus)?;
        builder = builder.gates(modmul.operations(&work, control)?);
    }

    builder = builder.gates(qft_inverse(&counting));
    for (i, &qubit) in counting.iter().enumerate() {
        builder = builder.measure(qubit, i);
    }
    Ok(builder.build())
}

/// Runs the whole pipeline against a backend: validate, compose, execute,
/// convert counts to frequencies, and extract a verified factor pair.
///
/// One sequential pass with no retries: estimation failures and backend
/// failures are returned to the caller, who decides whether to resample,
/// rebase, or reconfigure.
pub fn factor<B: ExecutionBackend>(
    config: &ShorConfig,
    backend: &B,
) -> Result<Factorization, FactorError> {
    config.validate()?;
    let circuit = period_finding_circuit(config)?;
    let counts = backend.execute(&circuit, config.shots)?;
    let distribution = counts.to_distribution();
    PeriodExtractor::new(config.base, config.modulus, config.counting_width).extract(&distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ShorConfig::new(15, 7).validate().is_ok());
    }

    #[test]
    fn non_coprime_base_is_rejected_before_composition() {
        let config = ShorConfig::new(15, 6);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FactorError::InvalidParameter { .. }));
        assert!(!err.is_estimation_failure());
    }

    #[test]
    fn base_without_decomposition_is_rejected() {
        let err = ShorConfig::new(15, 14).validate().unwrap_err();
        assert!(matches!(err, FactorError::InvalidParameter { .. }));
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        assert!(ShorConfig { shots: 0, ..ShorConfig::new(15, 7) }.validate().is_err());
        assert!(ShorConfig { counting_width: 0, ..ShorConfig::new(15, 7) }.validate().is_err());
        assert!(ShorConfig { counting_width: 33, ..ShorConfig::new(15, 7) }.validate().is_err());
        assert!(ShorConfig::new(15, 1).validate().is_err());
        assert!(ShorConfig::new(15, 15).validate().is_err());
    }

    #[test]
    fn circuit_uses_counting_plus_work_qubits() -> Result<(), FactorError> {
        let config = ShorConfig::new(15, 7);
        let circuit = period_finding_circuit(&config)?;
        assert_eq!(circuit.qubits().len(), config.counting_width + 4);
        assert_eq!(circuit.measurements().len(), config.counting_width);
        assert_eq!(circuit.classical_width(), config.counting_width);
        Ok(())
    }

    #[test]
    fn only_counting_qubits_are_measured() -> Result<(), FactorError> {
        let config = ShorConfig::new(15, 7);
        let circuit = period_finding_circuit(&config)?;
        for (qubit, classical_bit) in circuit.measurements() {
            assert!(qubit.0 < config.counting_width as u64);
            assert_eq!(qubit.0, *classical_bit as u64);
        }
        Ok(())
    }

    #[test]
    fn composition_starts_with_superposition_layer() -> Result<(), FactorError> {
        let config = ShorConfig::new(15, 7);
        let circuit = period_finding_circuit(&config)?;
        let ops = circuit.operations();
        for op in ops.iter().take(config.counting_width) {
            assert_eq!(op.gate.name(), "H");
        }
        // Followed by the unit-residue initialization on the work register.
        assert_eq!(ops[config.counting_width].gate.name(), "X");
        assert_eq!(
            ops[config.counting_width].targets,
            vec![QubitId(config.counting_width as u64)]
        );
        Ok(())
    }
}
