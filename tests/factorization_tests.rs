// tests/factorization_tests.rs

// End-to-end factorization runs: pipeline success for the supported bases,
// parameter rejection, estimation-failure classification, and the backend
// boundary.

use qfact::{
    factor, Circuit, ExecutionBackend, FactorError, PeriodExtractor, SampleCounts, ShorConfig,
    Simulator,
};

fn assert_proper_divisor_of_fifteen(factors: (u64, u64)) {
    let (g1, g2) = factors;
    let proper = |g: u64| g != 1 && g != 15 && 15 % g == 0;
    assert!(
        proper(g1) || proper(g2),
        "neither {} nor {} properly divides 15",
        g1,
        g2
    );
}

#[test]
fn factors_fifteen_with_base_seven() -> Result<(), FactorError> {
    let config = ShorConfig::new(15, 7);
    let backend = Simulator::with_seed(1);
    let result = factor(&config, &backend)?;

    assert_proper_divisor_of_fifteen(result.factors);
    assert_eq!(result.period % 2, 0, "reported period must be even");
    assert!(result.period > 0);
    assert!(result.phase >= 0.0 && result.phase < 1.0);
    Ok(())
}

#[test]
fn factors_fifteen_with_base_two() -> Result<(), FactorError> {
    // Odd and degenerate period candidates must be rejected along the way;
    // 1 and 15 must never be reported as the found factor.
    let config = ShorConfig::new(15, 2);
    let result = factor(&config, &Simulator::with_seed(2))?;
    assert_proper_divisor_of_fifteen(result.factors);
    Ok(())
}

#[test]
fn factors_fifteen_with_short_period_bases() -> Result<(), FactorError> {
    // 4 and 11 both square to 1 mod 15; the period 2 still splits 15.
    for base in [4u64, 11] {
        let config = ShorConfig::new(15, base);
        let result = factor(&config, &Simulator::with_seed(3))?;
        assert_proper_divisor_of_fifteen(result.factors);
    }
    Ok(())
}

#[test]
fn extraction_from_exact_distribution_is_deterministic() -> Result<(), FactorError> {
    let config = ShorConfig::new(15, 7);
    let circuit = qfact::period_finding_circuit(&config)?;
    let distribution = Simulator::new().run(&circuit)?;
    let extractor = PeriodExtractor::new(config.base, config.modulus, config.counting_width);

    let a = extractor.extract(&distribution)?;
    let b = extractor.extract(&distribution)?;
    assert_eq!(a, b);
    assert_proper_divisor_of_fifteen(a.factors);
    Ok(())
}

#[test]
fn invalid_parameters_fail_before_execution() {
    // Base 6 shares a factor with 15.
    let err = factor(&ShorConfig::new(15, 6), &Simulator::new()).unwrap_err();
    assert!(matches!(err, FactorError::InvalidParameter { .. }));
    assert!(!err.is_estimation_failure());

    // Base 14 is coprime but has no swap decomposition.
    let err = factor(&ShorConfig::new(15, 14), &Simulator::new()).unwrap_err();
    assert!(matches!(err, FactorError::InvalidParameter { .. }));
}

#[test]
fn estimation_failures_are_marked_retryable() {
    // A distribution carrying only the zero phase cannot produce a period.
    let extractor = PeriodExtractor::new(7, 15, 8);
    let counts = SampleCounts::from_counts([(0u64, 100u64)].into_iter().collect(), 8);
    let err = extractor.extract(&counts.to_distribution()).unwrap_err();
    assert!(err.is_estimation_failure());
}

struct FailingBackend;

impl ExecutionBackend for FailingBackend {
    fn execute(&self, _circuit: &Circuit, _shots: u64) -> Result<SampleCounts, FactorError> {
        Err(FactorError::BackendFailure {
            message: "queue unavailable".to_string(),
        })
    }
}

#[test]
fn backend_failures_propagate_unchanged() {
    let err = factor(&ShorConfig::new(15, 7), &FailingBackend).unwrap_err();
    assert_eq!(
        err,
        FactorError::BackendFailure { message: "queue unavailable".to_string() }
    );
}

#[test]
fn remote_style_counts_feed_the_same_extractor() {
    // Sample counts as a remote backend would return them: the extraction
    // logic does not care where the counts came from.
    let counts = SampleCounts::from_counts(
        [(0u64, 1000u64), (64, 1050), (128, 980), (192, 1066)]
            .into_iter()
            .collect(),
        8,
    );
    assert_eq!(counts.shots(), 4096);
    let extractor = PeriodExtractor::new(7, 15, 8);
    let result = extractor.extract(&counts.to_distribution()).expect("factors");
    assert_proper_divisor_of_fifteen(result.factors);
    // 192 is the most frequent outcome; 3/4 -> period 4 directly.
    assert_eq!(result.period, 4);
    assert_eq!(result.measured, 192);
}
