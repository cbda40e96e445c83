// src/simulation/results.rs
use rand::{Rng, RngExt};
use std::collections::BTreeMap;
use std::fmt;

/// Probability distribution over classical measurement outcomes.
///
/// Keys are the measured values (bitstrings read as integers); only outcomes
/// with nonzero probability are stored, so an impossible bitstring can never
/// be sampled. Probabilities sum to 1 for any valid final state.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    probabilities: BTreeMap<u64, f64>,
    /// Width of the classical register, in bits.
    width: usize,
}

impl OutcomeDistribution {
    /// Creates a distribution from precomputed probabilities. (Internal visibility)
    pub(crate) fn new(probabilities: BTreeMap<u64, f64>, width: usize) -> Self {
        Self { probabilities, width }
    }

    /// Probability of a specific measured value (0.0 when absent).
    pub fn probability(&self, value: u64) -> f64 {
        self.probabilities.get(&value).copied().unwrap_or(0.0)
    }

    /// Iterates outcomes in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.probabilities.iter().map(|(&v, &p)| (v, p))
    }

    /// Number of outcomes carrying probability mass.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns `true` when no outcome carries probability mass.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Width of the classical register, in bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sum of all stored probabilities. Equals 1 within tolerance for a
    /// distribution derived from a valid state vector.
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// Outcomes ranked by probability, descending; ties broken by ascending
    /// value. This is the order the period extractor walks.
    pub fn ranked(&self) -> Vec<(u64, f64)> {
        let mut ranked: Vec<(u64, f64)> = self.iter().collect();
        // Stable sort keeps the ascending-value order of equal probabilities.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Draws `shots` independent categorical samples from the distribution.
    ///
    /// Fully deterministic for a fixed random source and seed. An outcome
    /// with zero probability never receives a count, since it is not stored
    /// and carries no cumulative mass.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, shots: u64) -> SampleCounts {
        let total = self.total();
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for _ in 0..shots {
            let sample: f64 = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = self.probabilities.keys().next_back().copied().unwrap_or(0);
            for (&value, &p) in &self.probabilities {
                cumulative += p;
                if sample < cumulative {
                    chosen = value;
                    break;
                }
            }
            *counts.entry(chosen).or_insert(0) += 1;
        }
        SampleCounts { counts, width: self.width }
    }
}

impl fmt::Display for OutcomeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Outcome Distribution ({} bits):", self.width)?;
        for (value, p) in self.iter() {
            writeln!(f, "  {:0width$b}: p={:.4}", value, p, width = self.width)?;
        }
        Ok(())
    }
}

/// Shot counts keyed by measured value, as returned by an execution backend.
///
/// Counts sum to the requested shot count. This is the boundary type shared
/// by the local sampler and any remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCounts {
    counts: BTreeMap<u64, u64>,
    /// Width of the classical register, in bits.
    width: usize,
}

impl SampleCounts {
    /// Creates counts from raw backend data.
    pub fn from_counts(counts: BTreeMap<u64, u64>, width: usize) -> Self {
        Self { counts, width }
    }

    /// Count for a specific measured value (0 when absent).
    pub fn count(&self, value: u64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Iterates counted outcomes in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no shots were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Width of the classical register, in bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of shots recorded.
    pub fn shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Converts counts into observed frequencies, so extraction can run
    /// identically on local simulation results and remote execution results.
    pub fn to_distribution(&self) -> OutcomeDistribution {
        let shots = self.shots();
        let mut probabilities = BTreeMap::new();
        if shots > 0 {
            for (&value, &count) in &self.counts {
                if count > 0 {
                    probabilities.insert(value, count as f64 / shots as f64);
                }
            }
        }
        OutcomeDistribution { probabilities, width: self.width }
    }
}

impl fmt::Display for SampleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample Counts ({} shots, {} bits):", self.shots(), self.width)?;
        for (value, count) in self.iter() {
            writeln!(f, "  {:0width$b}: {}", value, count, width = self.width)?;
        }
        Ok(())
    }
}
