// src/simulation/engine.rs
use crate::core::{
    FactorError, QubitId, StateVector, AMPLITUDE_TOLERANCE, NORM_TOLERANCE, UNITARITY_TOLERANCE,
};
use crate::gates::GateOp;
use crate::simulation::results::OutcomeDistribution;
use num_complex::Complex;
use num_traits::Zero;
use std::collections::{BTreeMap, HashMap, HashSet};

/// The core simulation engine that holds the amplitude store and applies
/// gates to it in place. (Internal visibility)
pub(crate) struct SimulationEngine {
    /// Maps qubit IDs to their index (0..N-1) in the ordered list used for
    /// the global state vector. Built by sorting the IDs, so assignment is
    /// deterministic regardless of set iteration order.
    qubit_indices: HashMap<QubitId, usize>,
    /// The global state vector over all simulated qubits, dimension 2^N.
    state: StateVector,
    /// Number of qubits being simulated (N).
    num_qubits: usize,
}

impl SimulationEngine {
    /// Initializes the engine for a given set of qubits in the state |0...0>.
    pub(crate) fn init(qubit_ids: &HashSet<QubitId>) -> Result<Self, FactorError> {
        if qubit_ids.is_empty() {
            return Err(FactorError::InvalidParameter {
                message: "cannot initialize simulation engine with zero qubits".to_string(),
            });
        }

        let num_qubits = qubit_ids.len();
        1usize.checked_shl(num_qubits as u32).ok_or_else(|| FactorError::SimulationError {
            message: "qubit count too large, state vector dimension overflows usize".to_string(),
        })?;

        let mut sorted_ids: Vec<QubitId> = qubit_ids.iter().cloned().collect();
        sorted_ids.sort();
        let mut qubit_indices = HashMap::with_capacity(num_qubits);
        for (index, qubit_id) in sorted_ids.into_iter().enumerate() {
            qubit_indices.insert(qubit_id, index);
        }

        Ok(Self {
            qubit_indices,
            state: StateVector::zero_state(num_qubits),
            num_qubits,
        })
    }

    /// Read access to the current state, for validation and tests.
    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    // Crate-visible method to set the state directly for testing.
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<(), FactorError> {
        if state.dim() != self.state.dim() {
            Err(FactorError::SimulationError {
                message: format!(
                    "cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.state.dim()
                ),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    /// Applies one gate to the state vector in place.
    ///
    /// The 2^N basis indices are partitioned into groups that agree on all
    /// bits outside the gate's support; each group's amplitudes form a small
    /// vector indexed by the support bits, which is left-multiplied by the
    /// gate matrix. Controlled gates skip every group whose control bit is 0.
    /// This avoids materializing the full 2^N x 2^N operator.
    pub(crate) fn apply(&mut self, op: &GateOp) -> Result<(), FactorError> {
        if !op.gate.is_unitary(UNITARITY_TOLERANCE) {
            return Err(FactorError::UnitarityViolation {
                message: format!(
                    "gate '{}' (arity {}) failed the unitarity check",
                    op.gate.name(),
                    op.gate.arity()
                ),
            });
        }
        if op.targets.len() != op.gate.arity() {
            return Err(FactorError::SimulationError {
                message: format!(
                    "gate '{}' has arity {} but {} targets were given",
                    op.gate.name(),
                    op.gate.arity(),
                    op.targets.len()
                ),
            });
        }

        // Resolve target qubits to bit masks within the basis index.
        let arity = op.gate.arity();
        let mut seen = HashSet::with_capacity(arity + 1);
        let mut target_masks = Vec::with_capacity(arity);
        for target in &op.targets {
            let idx = self.qubit_index(target)?;
            if !seen.insert(idx) {
                return Err(FactorError::SimulationError {
                    message: format!("duplicate target {} in gate '{}'", target, op.gate.name()),
                });
            }
            target_masks.push(1usize << (self.num_qubits - 1 - idx));
        }
        let control_mask = match &op.control {
            Some(control) => {
                let idx = self.qubit_index(control)?;
                if !seen.insert(idx) {
                    return Err(FactorError::SimulationError {
                        message: format!(
                            "control {} overlaps a target of gate '{}'",
                            control,
                            op.gate.name()
                        ),
                    });
                }
                Some(1usize << (self.num_qubits - 1 - idx))
            }
            None => None,
        };
        let support_mask: usize = target_masks.iter().sum();

        let dim = self.state.dim();
        let d = op.gate.dim();
        let mut new_vec = self.state.vector().to_vec();
        let mut indices = vec![0usize; d];
        let mut amps = vec![Complex::zero(); d];

        // Group bases have zeros at every support bit; the remaining bits
        // enumerate the groups.
        for base in 0..dim {
            if base & support_mask != 0 {
                continue;
            }
            if let Some(cmask) = control_mask {
                if base & cmask == 0 {
                    continue; // control bit is 0: leave this group unchanged
                }
            }

            // Expand the sub-index over the support bits. The first target
            // supplies the most significant bit of the sub-index, matching
            // the gate's declared basis order.
            for (sub, slot) in indices.iter_mut().enumerate() {
                let mut full = base;
                for (j, mask) in target_masks.iter().enumerate() {
                    if (sub >> (arity - 1 - j)) & 1 == 1 {
                        full |= mask;
                    }
                }
                *slot = full;
            }
            for (slot, &index) in amps.iter_mut().zip(indices.iter()) {
                *slot = self.state.vector()[index];
            }

            for row in 0..d {
                let mut acc = Complex::zero();
                for (col, amp) in amps.iter().enumerate() {
                    acc += op.gate.element(row, col) * amp;
                }
                new_vec[indices[row]] = acc;
            }
        }

        self.state = StateVector::from_amplitudes(new_vec, self.num_qubits);
        Ok(())
    }

    /// Checks that the state vector still has unit norm. A violation means a
    /// non-unitary transform slipped through, which is a programming error.
    pub(crate) fn validate_state(&self) -> Result<(), FactorError> {
        let norm_sq = self.state.norm_sqr();
        if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
            return Err(FactorError::SimulationError {
                message: format!("state vector norm deviated from 1: {}", norm_sq),
            });
        }
        Ok(())
    }

    /// Derives the outcome distribution over the measured qubits by
    /// marginalizing the state vector over every unmeasured qubit: each
    /// basis state's squared magnitude is summed into the bucket keyed by
    /// its measured-qubit bits.
    pub(crate) fn measure_distribution(
        &self,
        measurements: &[(QubitId, usize)],
        width: usize,
    ) -> Result<OutcomeDistribution, FactorError> {
        let mut bit_map = Vec::with_capacity(measurements.len());
        for (qubit, classical_bit) in measurements {
            let idx = self.qubit_index(qubit)?;
            bit_map.push((self.num_qubits - 1 - idx, *classical_bit));
        }

        let mut probabilities: BTreeMap<u64, f64> = BTreeMap::new();
        for (k, amp) in self.state.vector().iter().enumerate() {
            let p = amp.norm_sqr();
            if p <= AMPLITUDE_TOLERANCE {
                continue;
            }
            let mut value: u64 = 0;
            for (bit_pos, classical_bit) in &bit_map {
                value |= (((k >> bit_pos) & 1) as u64) << classical_bit;
            }
            *probabilities.entry(value).or_insert(0.0) += p;
        }

        Ok(OutcomeDistribution::new(probabilities, width))
    }

    /// Helper to get a qubit's index, returning a specific error if not found.
    fn qubit_index(&self, qubit_id: &QubitId) -> Result<usize, FactorError> {
        self.qubit_indices
            .get(qubit_id)
            .copied()
            .ok_or_else(|| FactorError::SimulationError {
                message: format!("qubit {} not found in simulation context", qubit_id),
            })
    }
}
