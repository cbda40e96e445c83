// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// The amplitude store: the complex state vector of an n-qubit register.
///
/// A register of n qubits spans 2^n basis states, each identified by an n-bit
/// index; the store holds one complex amplitude per basis state. The vector
/// is transient simulation state, created fresh per circuit execution in the
/// all-zero basis state and mutated in place by each gate application.
///
/// Invariant: the sum of squared magnitudes is 1 within numerical tolerance
/// at every observable point, since every applied transform is unitary.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    /// Amplitudes, indexed by basis state.
    amplitudes: Vec<Complex<f64>>,
    /// Number of qubits n, with `amplitudes.len() == 2^n`.
    num_qubits: usize,
}

impl StateVector {
    /// Creates the state |0...0> for `num_qubits` qubits: amplitude 1.0 at
    /// basis index 0, zero elsewhere.
    pub(crate) fn zero_state(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self { amplitudes, num_qubits }
    }

    /// Creates a state directly from an amplitude vector. The caller is
    /// responsible for the vector's length being a power of two matching
    /// `num_qubits`; validation happens during simulation.
    pub(crate) fn from_amplitudes(amplitudes: Vec<Complex<f64>>, num_qubits: usize) -> Self {
        Self { amplitudes, num_qubits }
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Gets the dimension 2^n of the state space.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Gets the number of qubits n.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total squared magnitude of the vector. Equals 1.0 (within tolerance)
    /// for any valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
