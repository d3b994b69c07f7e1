// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::metrics::validate_aligned;
use ade_core::{DelayWindow, EvalError, LabelSequence};
use log::trace;

/// Applies delay-tolerant point adjustment to a prediction sequence.
///
/// For every maximal run `[start, end]` of positive `true_label` entries, the
/// tolerance window is `[start, min(end, start + delay)]`. If any prediction in
/// that window is positive, the whole run is marked positive in the output;
/// otherwise the run keeps its original predictions. Indices outside positive
/// runs are copied unchanged, so false positives are neither created nor
/// suppressed.
///
/// Returns a new sequence; the inputs are left untouched.
pub fn adjust_predicts(
    pred_label: &LabelSequence,
    true_label: &LabelSequence,
    delay: DelayWindow,
) -> Result<LabelSequence, EvalError> {
    validate_aligned(pred_label, true_label)?;

    let pred = pred_label.as_slice();
    let mut adjusted = pred.to_vec();
    for segment in true_label.segments() {
        let window_end = segment.tolerance_end(delay);
        if pred[segment.start..=window_end].iter().any(|&label| label) {
            trace!(
                "segment [{}, {}] detected within [{}, {window_end}]",
                segment.start, segment.end, segment.start
            );
            adjusted[segment.start..=segment.end].fill(true);
        }
    }

    Ok(LabelSequence::from_bools(adjusted))
}
