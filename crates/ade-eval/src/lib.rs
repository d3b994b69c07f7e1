// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod adjust;
pub mod harness;
pub mod metrics;
pub mod threshold;

pub use adjust::adjust_predicts;
pub use harness::{
    EvaluationReport, HarnessConfig, RunInput, RunReport, evaluate_run, evaluate_runs,
};
pub use metrics::{confusion_counts, point_metrics, point_metrics_fbeta};
pub use threshold::{percentile, threshold_scores, validate_percent};

/// Evaluation crate name helper.
pub fn crate_name() -> &'static str {
    let _ = ade_core::crate_name();
    "ade-eval"
}
