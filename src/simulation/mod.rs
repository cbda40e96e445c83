// src/simulation/mod.rs

//! Simulates the execution of `qfact::circuits::Circuit` on a local state
//! vector. This module contains the `Simulator` entry point, the internal
//! `SimulationEngine` responsible for gate application, and the
//! [`ExecutionBackend`] boundary that a remote quantum service would also
//! satisfy.

// Make engine module crate visible for tests
mod results;
pub(crate) mod engine;

// Re-export the main public interface types
pub use results::{OutcomeDistribution, SampleCounts};

use crate::circuits::Circuit;
use crate::core::FactorError;
use engine::SimulationEngine;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The backend boundary: anything that can execute a circuit for a number
/// of shots and return sample counts.
///
/// The local [`Simulator`] is a drop-in substitute for a remote execution
/// service, so the same extraction logic runs against either. Backend
/// failures surface as [`FactorError::BackendFailure`] and are propagated
/// unchanged to the caller.
pub trait ExecutionBackend {
    /// Executes the circuit `shots` times and returns the observed counts.
    fn execute(&self, circuit: &Circuit, shots: u64) -> Result<SampleCounts, FactorError>;
}

/// The local simulator: builds a fresh state vector per execution, applies
/// the circuit's gates in order, and samples outcomes from the resulting
/// distribution.
///
/// Sampling is the only source of non-determinism. A fixed seed makes runs
/// reproducible; without one the generator is seeded from the OS.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    seed: Option<u64>,
}

impl Simulator {
    /// Creates a simulator whose sampler is seeded from the OS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator with a fixed sampling seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Runs the circuit once and returns the exact outcome distribution over
    /// its measured qubits.
    ///
    /// The state vector is created fresh in |0...0>, mutated in place by
    /// each gate application in sequence, and discarded after the marginal
    /// distribution is computed. Norm is validated after every application.
    pub fn run(&self, circuit: &Circuit) -> Result<OutcomeDistribution, FactorError> {
        if circuit.qubits().is_empty() {
            return Err(FactorError::InvalidParameter {
                message: "circuit involves no qubits".to_string(),
            });
        }
        if circuit.measurements().is_empty() {
            return Err(FactorError::InvalidParameter {
                message: "circuit measures no qubits".to_string(),
            });
        }

        let mut engine = SimulationEngine::init(circuit.qubits())?;
        for op in circuit.operations() {
            engine.apply(op)?;
            engine.validate_state()?;
        }
        engine.measure_distribution(circuit.measurements(), circuit.classical_width())
    }
}

impl ExecutionBackend for Simulator {
    fn execute(&self, circuit: &Circuit, shots: u64) -> Result<SampleCounts, FactorError> {
        let distribution = self.run(circuit)?;
        let mut rng = self.rng();
        Ok(distribution.sample(&mut rng, shots))
    }
}

#[cfg(test)]
mod tests {
    use super::engine::SimulationEngine;
    use super::*;
    use crate::core::{QubitId, StateVector};
    use crate::gates::{cphase, h, phase, swap, x, Gate, GateOp};
    use num_complex::Complex;
    use num_traits::Zero;
    use std::collections::HashSet;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    const TEST_TOLERANCE: f64 = 1e-9;

    // --- Helper Functions ---
    fn qid(id: u64) -> QubitId {
        QubitId(id)
    }

    fn qubit_set(ids: &[u64]) -> HashSet<QubitId> {
        ids.iter().map(|&id| QubitId(id)).collect()
    }

    /// Asserts that two complex state vectors are approximately equal
    /// component-wise.
    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        tolerance: f64,
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < tolerance * tolerance,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, DistSq: {:.3e}, Context: {}",
                i, actual[i], expected[i], dist_sq, context
            );
        }
    }

    #[test]
    fn norm_preserved_across_gate_sequence() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1, 2]);
        let mut engine = SimulationEngine::init(&qubits)?;
        let ops = [
            GateOp::new(h(), vec![qid(0)]),
            GateOp::new(x(), vec![qid(1)]),
            GateOp::new(swap(), vec![qid(1), qid(2)]),
            GateOp::new(cphase(PI / 3.0), vec![qid(0), qid(2)]),
            GateOp::controlled(x(), vec![qid(1)], qid(0)),
        ];
        for op in &ops {
            engine.validate_state()?;
            engine.apply(op)?;
            engine.validate_state()?;
        }
        Ok(())
    }

    #[test]
    fn gate_followed_by_inverse_restores_state() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1]);
        let mut engine = SimulationEngine::init(&qubits)?;
        // Prepare a non-trivial state first.
        engine.apply(&GateOp::new(h(), vec![qid(0)]))?;
        engine.apply(&GateOp::new(phase(PI / 5.0), vec![qid(0)]))?;
        let reference = engine.state().vector().to_vec();

        let pairs = [
            (GateOp::new(h(), vec![qid(1)]), GateOp::new(h(), vec![qid(1)])),
            (
                GateOp::new(phase(PI / 7.0), vec![qid(0)]),
                GateOp::new(phase(-PI / 7.0), vec![qid(0)]),
            ),
            (
                GateOp::new(swap(), vec![qid(0), qid(1)]),
                GateOp::new(swap(), vec![qid(0), qid(1)]),
            ),
            (
                GateOp::new(cphase(PI / 3.0), vec![qid(0), qid(1)]),
                GateOp::new(cphase(-PI / 3.0), vec![qid(0), qid(1)]),
            ),
        ];
        for (forward, inverse) in &pairs {
            engine.apply(forward)?;
            engine.apply(inverse)?;
            assert_complex_vec_approx_equal(
                engine.state().vector(),
                &reference,
                TEST_TOLERANCE,
                &format!("{} then inverse", forward.gate.name()),
            );
        }
        Ok(())
    }

    #[test]
    fn controlled_gate_is_identity_when_control_is_zero() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1]);
        let mut engine = SimulationEngine::init(&qubits)?;
        // |00>: control q0 is 0, so CX must leave the state untouched.
        engine.apply(&GateOp::controlled(x(), vec![qid(1)], qid(0)))?;
        let mut expected = vec![Complex::zero(); 4];
        expected[0] = Complex::new(1.0, 0.0);
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &expected,
            TEST_TOLERANCE,
            "CX with control 0",
        );
        Ok(())
    }

    #[test]
    fn controlled_gate_acts_when_control_is_one() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1]);
        let mut engine = SimulationEngine::init(&qubits)?;
        engine.apply(&GateOp::new(x(), vec![qid(0)]))?; // |10>
        engine.apply(&GateOp::controlled(x(), vec![qid(1)], qid(0)))?; // |11>
        let mut expected = vec![Complex::zero(); 4];
        expected[3] = Complex::new(1.0, 0.0);
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &expected,
            TEST_TOLERANCE,
            "CX with control 1",
        );
        Ok(())
    }

    #[test]
    fn swap_exchanges_basis_values() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1]);
        let mut engine = SimulationEngine::init(&qubits)?;
        engine.apply(&GateOp::new(x(), vec![qid(0)]))?; // |10>
        engine.apply(&GateOp::new(swap(), vec![qid(0), qid(1)]))?; // |01>
        let mut expected = vec![Complex::zero(); 4];
        expected[1] = Complex::new(1.0, 0.0);
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &expected,
            TEST_TOLERANCE,
            "swap of |10>",
        );
        Ok(())
    }

    #[test]
    fn non_unitary_gate_is_rejected() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0]);
        let mut engine = SimulationEngine::init(&qubits)?;
        let bad = Gate::new("bad", 1, vec![
            Complex::new(1.0, 0.0), Complex::new(1.0, 0.0),
            Complex::zero(), Complex::new(1.0, 0.0),
        ]);
        let err = engine.apply(&GateOp::new(bad, vec![qid(0)])).unwrap_err();
        assert!(matches!(err, FactorError::UnitarityViolation { .. }));
        Ok(())
    }

    #[test]
    fn marginal_distribution_sums_to_one() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1, 2]);
        let mut engine = SimulationEngine::init(&qubits)?;
        for id in 0..3 {
            engine.apply(&GateOp::new(h(), vec![qid(id)]))?;
        }
        // Measure only q0 and q2, marginalizing q1.
        let dist = engine.measure_distribution(&[(qid(0), 0), (qid(2), 1)], 2)?;
        assert!((dist.total() - 1.0).abs() < TEST_TOLERANCE);
        assert_eq!(dist.len(), 4);
        Ok(())
    }

    #[test]
    fn zero_probability_outcomes_are_not_stored() -> Result<(), FactorError> {
        let qubits = qubit_set(&[0, 1]);
        let mut engine = SimulationEngine::init(&qubits)?;
        let amp = Complex::new(FRAC_1_SQRT_2, 0.0);
        engine.set_state(StateVector::from_amplitudes(
            vec![amp, Complex::zero(), Complex::zero(), amp],
            2,
        ))?;
        let dist = engine.measure_distribution(&[(qid(0), 1), (qid(1), 0)], 2)?;
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.probability(1), 0.0);
        assert_eq!(dist.probability(2), 0.0);
        Ok(())
    }

    #[test]
    fn sample_counts_sum_to_shot_count() -> Result<(), FactorError> {
        let circuit = crate::circuits::CircuitBuilder::new()
            .gate(GateOp::new(h(), vec![qid(0)]))
            .gate(GateOp::new(h(), vec![qid(1)]))
            .measure(qid(0), 0)
            .measure(qid(1), 1)
            .build();
        let simulator = Simulator::with_seed(7);
        let counts = simulator.execute(&circuit, 4096)?;
        assert_eq!(counts.shots(), 4096);
        Ok(())
    }

    #[test]
    fn seeded_sampling_is_reproducible() -> Result<(), FactorError> {
        let circuit = crate::circuits::CircuitBuilder::new()
            .gate(GateOp::new(h(), vec![qid(0)]))
            .measure(qid(0), 0)
            .build();
        let a = Simulator::with_seed(42).execute(&circuit, 256)?;
        let b = Simulator::with_seed(42).execute(&circuit, 256)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn unseeded_sampling_still_accounts_for_every_shot() -> Result<(), FactorError> {
        let circuit = crate::circuits::CircuitBuilder::new()
            .gate(GateOp::new(h(), vec![qid(0)]))
            .measure(qid(0), 0)
            .build();
        let counts = Simulator::new().execute(&circuit, 512)?;
        assert_eq!(counts.shots(), 512);
        assert_eq!(counts.count(0) + counts.count(1), 512);
        Ok(())
    }

    #[test]
    fn deterministic_outcome_samples_to_single_bucket() -> Result<(), FactorError> {
        let circuit = crate::circuits::CircuitBuilder::new()
            .gate(GateOp::new(x(), vec![qid(0)]))
            .measure(qid(0), 0)
            .build();
        let counts = Simulator::with_seed(1).execute(&circuit, 100)?;
        assert_eq!(counts.count(1), 100);
        assert_eq!(counts.count(0), 0);
        Ok(())
    }

    #[test]
    fn unmeasured_circuit_is_rejected() {
        let circuit = crate::circuits::CircuitBuilder::new()
            .gate(GateOp::new(h(), vec![qid(0)]))
            .build();
        let err = Simulator::new().run(&circuit).unwrap_err();
        assert!(matches!(err, FactorError::InvalidParameter { .. }));
    }
}
