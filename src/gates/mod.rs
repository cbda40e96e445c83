// src/gates/mod.rs

//! The gate library: unitary operators expressed as matrices over a small
//! support of qubits, together with the composite constructors used by the
//! period-finding circuit (controlled modular multiplication and the inverse
//! quantum Fourier transform).
//!
//! A [`Gate`] owns its matrix; a [`GateOp`] binds a gate to the ordered list
//! of qubits it acts on, plus an optional control qubit. The simulation
//! engine applies a controlled gate only to basis states where the control
//! bit is 1 and leaves every other group of amplitudes untouched.

mod modmul;
mod qft;

pub use modmul::{ModMul, SwapModMul};
pub use qft::qft_inverse;

use crate::core::QubitId;
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// A unitary transformation scoped to an ordered subset of qubits.
///
/// The matrix is stored row-major with dimension `2^arity`. Basis order for
/// the support follows the target list: the first target supplies the most
/// significant bit of the row/column index (so for a two-qubit gate on
/// `(a, b)` the basis is |ab> = |00>, |01>, |10>, |11>).
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    /// Short symbol used in circuit diagrams ("X", "H", "x", "P").
    name: String,
    /// Row-major matrix of dimension 2^arity.
    matrix: Vec<Complex<f64>>,
    /// Number of qubits in the gate's support.
    arity: usize,
}

impl Gate {
    /// Creates a gate from a row-major matrix over `arity` qubits.
    ///
    /// The matrix length must be `4^arity`. Unitarity is checked at
    /// application time by the engine, not here, so that a deliberately
    /// malformed gate can be constructed in tests.
    pub fn new(name: impl Into<String>, arity: usize, matrix: Vec<Complex<f64>>) -> Self {
        Self { name: name.into(), matrix, arity }
    }

    /// The gate's diagram symbol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the gate's support.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Dimension 2^arity of the gate's matrix.
    pub fn dim(&self) -> usize {
        1usize << self.arity
    }

    /// Matrix element at (row, col).
    pub fn element(&self, row: usize, col: usize) -> Complex<f64> {
        self.matrix[row * self.dim() + col]
    }

    /// Checks U†U = I within `tolerance`, element-wise.
    ///
    /// Also fails when the stored matrix length does not match the declared
    /// arity, since such a gate cannot be applied meaningfully.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let d = self.dim();
        if self.matrix.len() != d * d {
            return false;
        }
        for i in 0..d {
            for j in 0..d {
                let mut entry: Complex<f64> = Complex::zero();
                for k in 0..d {
                    entry += self.element(k, i).conj() * self.element(k, j);
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                if (entry.re - expected).abs() > tolerance || entry.im.abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One gate application: a gate bound to its target qubits, optionally
/// conditioned on a control qubit.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOp {
    /// The unitary to apply.
    pub gate: Gate,
    /// Ordered target qubits; length must equal the gate's arity.
    pub targets: Vec<QubitId>,
    /// Optional control: the gate acts only on basis states where this
    /// qubit's bit is 1, identity otherwise.
    pub control: Option<QubitId>,
}

impl GateOp {
    /// An uncontrolled application of `gate` to `targets`.
    pub fn new(gate: Gate, targets: Vec<QubitId>) -> Self {
        Self { gate, targets, control: None }
    }

    /// An application of `gate` to `targets` conditioned on `control`.
    pub fn controlled(gate: Gate, targets: Vec<QubitId>, control: QubitId) -> Self {
        Self { gate, targets, control: Some(control) }
    }

    /// Returns all qubit IDs mentioned by this application (targets plus
    /// control). Lets the circuit track which qubits it involves.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        let mut qubits = self.targets.clone();
        if let Some(c) = self.control {
            qubits.push(c);
        }
        qubits
    }
}

// --- Elementary gate constructors ---

/// Bit flip (Pauli X).
pub fn x() -> Gate {
    Gate::new("X", 1, vec![
        Complex::zero(), Complex::new(1.0, 0.0),
        Complex::new(1.0, 0.0), Complex::zero(),
    ])
}

/// Hadamard: maps a basis state to an equal-magnitude superposition.
pub fn h() -> Gate {
    let s = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    Gate::new("H", 1, vec![s, s, s, -s])
}

/// Single-qubit phase rotation: applies e^(i*theta) when the qubit is 1.
pub fn phase(theta: f64) -> Gate {
    Gate::new("P", 1, vec![
        Complex::new(1.0, 0.0), Complex::zero(),
        Complex::zero(), Complex::new(theta.cos(), theta.sin()),
    ])
}

/// Two-qubit swap: exchanges the basis values of its two targets.
pub fn swap() -> Gate {
    let one = Complex::new(1.0, 0.0);
    let zero = Complex::zero();
    Gate::new("x", 2, vec![
        one, zero, zero, zero,
        zero, zero, one, zero,
        zero, one, zero, zero,
        zero, zero, zero, one,
    ])
}

/// Controlled-phase rotation: diag(1, 1, 1, e^(i*theta)) on two qubits.
/// Symmetric in its targets, so no separate control qubit is needed.
pub fn cphase(theta: f64) -> Gate {
    let one = Complex::new(1.0, 0.0);
    let zero = Complex::zero();
    Gate::new("P", 2, vec![
        one, zero, zero, zero,
        zero, one, zero, zero,
        zero, zero, one, zero,
        zero, zero, zero, Complex::new(theta.cos(), theta.sin()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UNITARITY_TOLERANCE;
    use std::f64::consts::PI;

    #[test]
    fn elementary_gates_are_unitary() {
        for gate in [x(), h(), phase(PI / 3.0), swap(), cphase(-PI / 4.0)] {
            assert!(
                gate.is_unitary(UNITARITY_TOLERANCE),
                "gate {} failed unitarity check",
                gate.name()
            );
        }
    }

    #[test]
    fn non_unitary_matrix_is_rejected() {
        // Row-scaled X is not unitary.
        let bad = Gate::new("bad", 1, vec![
            Complex::zero(), Complex::new(2.0, 0.0),
            Complex::new(1.0, 0.0), Complex::zero(),
        ]);
        assert!(!bad.is_unitary(UNITARITY_TOLERANCE));
    }

    #[test]
    fn mismatched_matrix_length_is_rejected() {
        let bad = Gate::new("bad", 2, vec![Complex::new(1.0, 0.0); 4]);
        assert!(!bad.is_unitary(UNITARITY_TOLERANCE));
    }

    #[test]
    fn gate_op_reports_involved_qubits() {
        let op = GateOp::controlled(x(), vec![QubitId(3)], QubitId(7));
        assert_eq!(op.involved_qubits(), vec![QubitId(3), QubitId(7)]);
    }
}
