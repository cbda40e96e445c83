// src/gates/qft.rs

//! Inverse quantum Fourier transform.
//!
//! Phase estimation encodes the sought fraction in the relative phases of
//! the counting register; the inverse transform rotates those phases back
//! into the computational basis so measurement reads the fraction directly.

use super::{cphase, h, swap, GateOp};
use crate::core::QubitId;
use std::f64::consts::PI;

/// Builds the inverse QFT on the given qubits as an ordered gate sequence.
///
/// Standard construction: reverse the qubit order with swaps, then for each
/// qubit j (ascending) apply a controlled-phase rotation of angle
/// -pi / 2^(j-m) with every earlier qubit m, followed by a Hadamard on j.
/// The result is a fixed unitary of size 2^width determined entirely by the
/// number of qubits.
pub fn qft_inverse(qubits: &[QubitId]) -> Vec<GateOp> {
    let n = qubits.len();
    let mut ops = Vec::new();
    for i in 0..n / 2 {
        ops.push(GateOp::new(swap(), vec![qubits[i], qubits[n - 1 - i]]));
    }
    for j in 0..n {
        for m in 0..j {
            let theta = -PI / (1u64 << (j - m)) as f64;
            // cphase is symmetric in its targets, so no control is attached.
            ops.push(GateOp::new(cphase(theta), vec![qubits[m], qubits[j]]));
        }
        ops.push(GateOp::new(h(), vec![qubits[j]]));
    }
    ops
}
