// src/extract/mod.rs

//! Classical post-processing: turns phase-estimation statistics into a
//! verified factor pair.
//!
//! Each measured value y at counting width w is a phase estimate y / 2^w;
//! its continued-fraction convergent (denominator bounded by the modulus)
//! proposes a period r, and gcd(base^(r/2) -+ 1, modulus) proposes factors.
//! Candidates are walked in ranked probability order until one yields a
//! proper divisor, since the top sample alone is not guaranteed to.

mod fraction;

pub use fraction::{continued_fraction, gcd, mod_pow, Rational};

use crate::core::FactorError;
use crate::simulation::OutcomeDistribution;
use std::fmt;

/// A verified factorization: the factor pair plus the period and phase
/// estimate that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    /// The two gcd guesses, at least one of which is a proper divisor.
    pub factors: (u64, u64),
    /// The period candidate r that yielded the factors.
    pub period: u64,
    /// The phase estimate the period was derived from.
    pub phase: f64,
    /// The measured value the phase was read from.
    pub measured: u64,
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "factors ({}, {}) from period {} (measured {}, phase {})",
            self.factors.0, self.factors.1, self.period, self.measured, self.phase
        )
    }
}

/// Converts sampled phase estimates into period candidates and searches for
/// a nontrivial common divisor of the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodExtractor {
    base: u64,
    modulus: u64,
    /// Counting-register width in bits; phases are measured in units of 2^-width.
    width: usize,
}

impl PeriodExtractor {
    /// Creates an extractor for the given problem parameters. Parameter
    /// validity (coprimality etc.) is checked upstream before any circuit is
    /// built; the extractor itself works with whatever distribution it is
    /// handed.
    pub fn new(base: u64, modulus: u64, width: usize) -> Self {
        Self { base, modulus, width }
    }

    /// Walks the distribution's outcomes in ranked order (probability
    /// descending, ties by ascending value) and returns the first verified
    /// factor pair.
    ///
    /// For each phase estimate: take its continued-fraction convergent with
    /// denominator bounded by the modulus; reject odd or zero denominators;
    /// otherwise test gcd(base^(r/2) -+ 1, modulus) for a proper divisor.
    ///
    /// On exhaustion the error distinguishes "no valid period found"
    /// (`PeriodNotFound`) from "period found but trivial divisors only"
    /// (`TrivialFactors`), so a retry loop can decide what to change.
    pub fn extract(&self, distribution: &OutcomeDistribution) -> Result<Factorization, FactorError> {
        if distribution.is_empty() {
            return Err(FactorError::PeriodNotFound {
                message: "outcome distribution is empty".to_string(),
            });
        }

        let denominator_space = (1u64 << self.width) as f64;
        let mut trivial_period = None;

        for (measured, _probability) in distribution.ranked() {
            let phase = measured as f64 / denominator_space;
            let approximation = continued_fraction(phase, self.modulus);
            let period = approximation.denominator;
            // Odd and zero periods cannot split the modulus; a phase of
            // exactly 0 lands here via its 0/1 convergent.
            if period == 0 || period % 2 != 0 {
                continue;
            }

            let half_power = mod_pow(self.base, period / 2, self.modulus);
            let g1 = gcd((half_power + self.modulus - 1) % self.modulus, self.modulus);
            let g2 = gcd((half_power + 1) % self.modulus, self.modulus);
            let proper = |g: u64| g != 1 && g != self.modulus;
            if proper(g1) || proper(g2) {
                return Ok(Factorization {
                    factors: (g1, g2),
                    period,
                    phase,
                    measured,
                });
            }
            trivial_period = Some(period);
        }

        match trivial_period {
            Some(period) => Err(FactorError::TrivialFactors { period }),
            None => Err(FactorError::PeriodNotFound {
                message: format!(
                    "no ranked phase estimate yielded an even nonzero period for base {} mod {}",
                    self.base, self.modulus
                ),
            }),
        }
    }
}
