// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_core::{EvalError, LabelSequence};

/// Percentile of `scores` with linear interpolation between closest ranks.
///
/// `percent` is on the 0..=100 scale; the rank is `percent / 100 * (n - 1)`.
pub fn percentile(scores: &[f64], percent: f64) -> Result<f64, EvalError> {
    validate_scores(scores)?;
    validate_percent(percent)?;

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = percent / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Binarizes detector scores against their own `percent` percentile.
///
/// A score is flagged only when it is strictly above the cutoff, so at most
/// roughly `100 - percent` percent of the points end up positive. Returns the
/// predictions together with the cutoff that produced them.
pub fn threshold_scores(scores: &[f64], percent: f64) -> Result<(LabelSequence, f64), EvalError> {
    let cutoff = percentile(scores, percent)?;
    let pred_label = scores.iter().map(|&score| score > cutoff).collect();
    Ok((pred_label, cutoff))
}

/// Rejects a percentile outside 0..=100 or one that is not finite.
pub fn validate_percent(percent: f64) -> Result<(), EvalError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(EvalError::invalid_parameter(format!(
            "percent must be within [0, 100]; got {percent}"
        )));
    }
    Ok(())
}

fn validate_scores(scores: &[f64]) -> Result<(), EvalError> {
    if scores.is_empty() {
        return Err(EvalError::invalid_parameter(
            "scores must be non-empty to derive a threshold",
        ));
    }
    if let Some((index, &value)) = scores
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(EvalError::NonFiniteScore { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{percentile, threshold_scores, validate_percent};

    fn assert_approx_eq(actual: f64, expected: f64) {
        let delta = (actual - expected).abs();
        assert!(
            delta <= 1e-12,
            "expected {expected}, got {actual} (delta={delta})"
        );
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let scores = [4.0, 1.0, 3.0, 2.0];
        assert_approx_eq(percentile(&scores, 0.0).expect("p0"), 1.0);
        assert_approx_eq(percentile(&scores, 100.0).expect("p100"), 4.0);
        assert_approx_eq(percentile(&scores, 50.0).expect("p50"), 2.5);
        assert_approx_eq(percentile(&scores, 90.0).expect("p90"), 3.7);
    }

    #[test]
    fn percentile_of_single_score_is_that_score() {
        assert_approx_eq(percentile(&[7.5], 99.9).expect("single score"), 7.5);
    }

    #[test]
    fn threshold_flags_only_scores_strictly_above_cutoff() {
        let scores = [0.1, 0.2, 0.9, 0.3, 0.95];
        let (pred, cutoff) = threshold_scores(&scores, 75.0).expect("threshold should compute");
        assert_approx_eq(cutoff, 0.9);
        assert_eq!(pred.to_u8_vec(), vec![0, 0, 0, 0, 1]);

        let (pred, _) = threshold_scores(&scores, 100.0).expect("threshold should compute");
        assert_eq!(pred.count_positive(), 0);
    }

    #[test]
    fn constant_scores_produce_no_positives() {
        let (pred, cutoff) = threshold_scores(&[2.0; 6], 50.0).expect("threshold should compute");
        assert_approx_eq(cutoff, 2.0);
        assert_eq!(pred.count_positive(), 0);
    }

    #[test]
    fn rejects_empty_and_non_finite_scores() {
        let err = percentile(&[], 50.0).expect_err("empty scores should fail");
        assert_eq!(err.code(), "invalid_parameter");

        let err = percentile(&[1.0, f64::NAN], 50.0).expect_err("NaN should fail");
        assert_eq!(err.code(), "non_finite_score");
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn rejects_out_of_range_percent() {
        for percent in [-0.1, 100.5, f64::NAN] {
            let err = percentile(&[1.0, 2.0], percent).expect_err("percent should be rejected");
            assert!(err.to_string().contains("percent must be within [0, 100]"));
        }
        assert_eq!(
            validate_percent(500.0).map_err(|err| err.code()),
            Err("invalid_parameter")
        );
        assert!(validate_percent(0.0).is_ok());
        assert!(validate_percent(100.0).is_ok());
    }
}
