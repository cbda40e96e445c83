// src/gates/modmul.rs

//! Controlled modular multiplication.
//!
//! Period finding needs, for each counting qubit `i`, a unitary realizing
//! x -> (base^(2^i) * x) mod modulus on the work register. How that unitary
//! is produced is an implementation detail behind the [`ModMul`] trait;
//! [`SwapModMul`] supplies the hand-picked swap/bit-flip decomposition that
//! exists for modulus 15, and a permutation-matrix synthesis could satisfy
//! the same trait for other small moduli.

use super::{swap, x, GateOp};
use crate::core::{FactorError, QubitId};
use crate::extract::gcd;

/// Produces the gate sequence for multiplication by `base^(2^power)` modulo
/// `modulus`, restricted to the basis states representing residues
/// 0..modulus-1. States outside that range are left unspecified.
pub trait ModMul {
    /// The multiplicative base.
    fn base(&self) -> u64;

    /// The modulus being factored.
    fn modulus(&self) -> u64;

    /// Number of work qubits the operator acts on: ceil(log2(modulus)).
    fn work_width(&self) -> usize {
        (u64::BITS - (self.modulus() - 1).leading_zeros()) as usize
    }

    /// Gate applications realizing the modular multiplication on the `work`
    /// register, each conditioned on `control`. Controlling every
    /// constituent gate is equivalent to controlling their composition.
    fn operations(&self, work: &[QubitId], control: QubitId) -> Result<Vec<GateOp>, FactorError>;
}

/// Bases mod 15 for which the swap decomposition is known. The units 1 and
/// 14 are excluded: 1 is the identity and 14 has order 2, so neither can
/// drive period finding.
const SUPPORTED_BASES_MOD_15: [u64; 6] = [2, 4, 7, 8, 11, 13];

/// Swap-based modular multiplication for modulus 15.
///
/// Multiplication by a unit mod 15 permutes the residues 0..15; for the
/// bases in [`SUPPORTED_BASES_MOD_15`] that permutation factors into qubit
/// swaps plus full-register bit flips on the 4-qubit work register. This
/// construction encodes a group-theoretic fact about (Z/15Z)* and does not
/// generalize to other moduli; other [`ModMul`] implementations must be
/// supplied for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapModMul {
    base: u64,
    power: u32,
    modulus: u64,
}

impl SwapModMul {
    /// Creates the operator for x -> base^(2^power) * x mod 15.
    ///
    /// Fails with `InvalidParameter` before any gate is appended when the
    /// base is not coprime to the modulus or no swap decomposition is known
    /// for it.
    pub fn new(base: u64, power: u32, modulus: u64) -> Result<Self, FactorError> {
        if modulus != 15 {
            return Err(FactorError::InvalidParameter {
                message: format!(
                    "swap-based modular multiplication is only defined for modulus 15, got {}",
                    modulus
                ),
            });
        }
        if gcd(base, modulus) != 1 {
            return Err(FactorError::InvalidParameter {
                message: format!("base {} is not coprime to modulus {}", base, modulus),
            });
        }
        if !SUPPORTED_BASES_MOD_15.contains(&base) {
            return Err(FactorError::InvalidParameter {
                message: format!(
                    "no swap decomposition is known for base {} mod {}; supported bases are {:?}",
                    base, modulus, SUPPORTED_BASES_MOD_15
                ),
            });
        }
        Ok(Self { base, power, modulus })
    }

    /// One round of multiplication by `base` itself: the swap/flip sequence
    /// for the residue permutation. Applied 2^power times by `operations`.
    fn single_round(&self, work: &[QubitId], control: QubitId) -> Vec<GateOp> {
        let mut ops = Vec::new();
        let cswap = |a: usize, b: usize, ops: &mut Vec<GateOp>| {
            ops.push(GateOp::controlled(swap(), vec![work[a], work[b]], control));
        };
        match self.base {
            2 | 13 => {
                cswap(2, 3, &mut ops);
                cswap(1, 2, &mut ops);
                cswap(0, 1, &mut ops);
            }
            7 | 8 => {
                cswap(0, 1, &mut ops);
                cswap(1, 2, &mut ops);
                cswap(2, 3, &mut ops);
            }
            4 | 11 => {
                cswap(1, 3, &mut ops);
                cswap(0, 2, &mut ops);
            }
            _ => unreachable!("constructor admits only supported bases"),
        }
        if matches!(self.base, 7 | 11 | 13) {
            for &q in work.iter() {
                ops.push(GateOp::controlled(x(), vec![q], control));
            }
        }
        ops
    }
}

impl ModMul for SwapModMul {
    fn base(&self) -> u64 {
        self.base
    }

    fn modulus(&self) -> u64 {
        self.modulus
    }

    fn operations(&self, work: &[QubitId], control: QubitId) -> Result<Vec<GateOp>, FactorError> {
        if work.len() != self.work_width() {
            return Err(FactorError::InvalidParameter {
                message: format!(
                    "modular multiplication mod {} needs {} work qubits, got {}",
                    self.modulus,
                    self.work_width(),
                    work.len()
                ),
            });
        }
        let repetitions = 1u64 << self.power;
        let mut ops = Vec::new();
        for _ in 0..repetitions {
            ops.extend(self.single_round(work, control));
        }
        Ok(ops)
    }
}
