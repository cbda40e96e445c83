// src/extract/fraction.rs

//! Rational approximation via continued fractions, plus the elementary
//! number theory (gcd, modular exponentiation) the factor search needs.

use std::fmt;

/// A fraction approximating a measured phase value in [0, 1).
/// The denominator is bounded by the modulus being factored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    /// Numerator s of the approximation s/r.
    pub numerator: u64,
    /// Denominator r: the period candidate.
    pub denominator: u64,
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Greatest common divisor (Euclid).
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Modular exponentiation by squaring. Intermediate products are widened to
/// u128 so `base^exp mod modulus` never overflows for u64 inputs.
pub fn mod_pow(base: u64, exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut base = base as u128 % m;
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    result as u64
}

/// Best rational approximation of `phase` with denominator bounded by
/// `max_denominator`, via continued fractions.
///
/// Returns the last convergent of the continued-fraction expansion whose
/// denominator does not exceed the bound; the expansion is truncated at the
/// first point the denominator would exceed it. This is the phase-to-period
/// conversion of the algorithm, with the denominator bound set to the
/// modulus being factored rather than an arbitrary precision cutoff.
///
/// A phase of exactly 0 yields 0/1; the denominator is never zero.
pub fn continued_fraction(phase: f64, max_denominator: u64) -> Rational {
    // Convergent recurrence h_n = a_n h_{n-1} + h_{n-2} (same for k),
    // seeded with h_{-1}/k_{-1} = 1/0 and h_{-2}/k_{-2} = 0/1.
    let (mut h_m1, mut k_m1): (u64, u64) = (1, 0);
    let (mut h_m2, mut k_m2): (u64, u64) = (0, 1);
    let mut best = Rational { numerator: 0, denominator: 1 };

    let mut x = phase;
    for _ in 0..64 {
        let a = x.floor();
        if !a.is_finite() || a < 0.0 || a >= u64::MAX as f64 {
            break;
        }
        let a = a as u64;
        let h = match a.checked_mul(h_m1).and_then(|v| v.checked_add(h_m2)) {
            Some(h) => h,
            None => break,
        };
        let k = match a.checked_mul(k_m1).and_then(|v| v.checked_add(k_m2)) {
            Some(k) => k,
            None => break,
        };
        if k > max_denominator {
            break;
        }
        best = Rational { numerator: h, denominator: k };
        (h_m2, k_m2) = (h_m1, k_m1);
        (h_m1, k_m1) = (h, k);

        let frac = x - x.floor();
        // Expansion terminated: the phase is (numerically) exactly rational.
        if frac < 1e-12 {
            break;
        }
        x = 1.0 / frac;
    }
    best
}
