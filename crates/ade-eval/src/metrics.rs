// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_core::{ConfusionCounts, EvalError, LabelSequence, MetricResult};

/// Tallies tp/tn/fp/fn over two aligned label sequences in a single pass.
pub fn confusion_counts(
    pred_label: &LabelSequence,
    true_label: &LabelSequence,
) -> Result<ConfusionCounts, EvalError> {
    validate_aligned(pred_label, true_label)?;

    let mut counts = ConfusionCounts::default();
    for (&pred, &truth) in pred_label.as_slice().iter().zip(true_label.as_slice()) {
        match (pred, truth) {
            (true, true) => counts.tp += 1,
            (true, false) => counts.fp += 1,
            (false, false) => counts.tn += 1,
            (false, true) => counts.fn_ += 1,
        }
    }
    Ok(counts)
}

/// Computes precision, recall, F1 and the confusion counts.
///
/// Zero denominators resolve to 0 (see [`ConfusionCounts`]); an empty pair of
/// sequences is a valid degenerate input with all counts at 0.
pub fn point_metrics(
    pred_label: &LabelSequence,
    true_label: &LabelSequence,
) -> Result<MetricResult, EvalError> {
    point_metrics_fbeta(pred_label, true_label, 1.0)
}

/// Same as [`point_metrics`] with the F-score weighted by `beta`.
pub fn point_metrics_fbeta(
    pred_label: &LabelSequence,
    true_label: &LabelSequence,
    beta: f64,
) -> Result<MetricResult, EvalError> {
    validate_beta(beta)?;
    let counts = confusion_counts(pred_label, true_label)?;
    Ok(MetricResult::from_counts(counts, beta))
}

pub(crate) fn validate_aligned(
    pred_label: &LabelSequence,
    true_label: &LabelSequence,
) -> Result<(), EvalError> {
    if pred_label.len() != true_label.len() {
        return Err(EvalError::shape_mismatch(pred_label.len(), true_label.len()));
    }
    Ok(())
}

pub(crate) fn validate_beta(beta: f64) -> Result<(), EvalError> {
    if !beta.is_finite() || beta <= 0.0 {
        return Err(EvalError::invalid_parameter(format!(
            "beta must be finite and > 0; got {beta}"
        )));
    }
    Ok(())
}
