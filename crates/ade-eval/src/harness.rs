// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::adjust::adjust_predicts;
use crate::metrics::{point_metrics_fbeta, validate_aligned, validate_beta};
use ade_core::{DelayWindow, EvalError, ExecutionMode, LabelSequence, MetricResult};
use log::{debug, warn};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Settings shared by every run of an evaluation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HarnessConfig {
    pub delay: DelayWindow,
    pub beta: f64,
    pub mode: ExecutionMode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            delay: DelayWindow::default(),
            beta: 1.0,
            mode: ExecutionMode::Balanced,
        }
    }
}

impl HarnessConfig {
    pub fn with_delay(mut self, delay: DelayWindow) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        validate_beta(self.beta)
    }
}

/// One independent evaluation run, e.g. one benchmark file.
#[derive(Clone, Debug, PartialEq)]
pub struct RunInput {
    pub name: String,
    pub pred_label: LabelSequence,
    pub true_label: LabelSequence,
}

impl RunInput {
    pub fn new(
        name: impl Into<String>,
        pred_label: LabelSequence,
        true_label: LabelSequence,
    ) -> Self {
        Self {
            name: name.into(),
            pred_label,
            true_label,
        }
    }
}

/// Raw and adjusted metrics for a single run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub name: String,
    pub raw: MetricResult,
    pub adjusted: MetricResult,
    pub adjusted_pred: LabelSequence,
}

/// Per-run reports in run order plus metrics over the concatenated runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationReport {
    pub runs: Vec<RunReport>,
    /// Adjusted predictions of every run concatenated and scored once.
    pub aggregate: MetricResult,
    /// Raw predictions of every run concatenated and scored once.
    pub aggregate_raw: MetricResult,
}

/// Scores one run before and after point adjustment.
pub fn evaluate_run(run: &RunInput, config: &HarnessConfig) -> Result<RunReport, EvalError> {
    config.validate()?;
    evaluate_validated(run, config).map_err(|err| err.in_run(run.name.as_str()))
}

/// Evaluates every run independently, then scores the concatenation.
///
/// Each run is adjusted on its own, so delay windows never cross run
/// boundaries. Aggregates are computed from the concatenated sequences in run
/// order, which makes their confusion counts the sum of the per-run counts.
/// The first failing run, in run order, aborts the whole evaluation.
pub fn evaluate_runs(
    runs: &[RunInput],
    config: &HarnessConfig,
) -> Result<EvaluationReport, EvalError> {
    config.validate()?;
    for run in runs {
        validate_aligned(&run.pred_label, &run.true_label)
            .map_err(|err| err.in_run(run.name.as_str()))?;
    }

    let reports = if can_use_parallel(config.mode, runs.len()) {
        debug!("evaluating {} runs in parallel", runs.len());
        evaluate_parallel(runs, config)?
    } else {
        evaluate_sequential(runs, config)?
    };

    let truth = LabelSequence::concat(runs.iter().map(|run| &run.true_label));
    let raw = LabelSequence::concat(runs.iter().map(|run| &run.pred_label));
    let adjusted = LabelSequence::concat(reports.iter().map(|report| &report.adjusted_pred));

    let aggregate = point_metrics_fbeta(&adjusted, &truth, config.beta)?;
    let aggregate_raw = point_metrics_fbeta(&raw, &truth, config.beta)?;
    debug!(
        "aggregate over {} runs ({} points): precision={:.4} recall={:.4} f1={:.4}",
        reports.len(),
        truth.len(),
        aggregate.precision,
        aggregate.recall,
        aggregate.f1
    );

    Ok(EvaluationReport {
        runs: reports,
        aggregate,
        aggregate_raw,
    })
}

fn evaluate_validated(run: &RunInput, config: &HarnessConfig) -> Result<RunReport, EvalError> {
    let raw = point_metrics_fbeta(&run.pred_label, &run.true_label, config.beta)?;
    let adjusted_pred = adjust_predicts(&run.pred_label, &run.true_label, config.delay)?;
    let adjusted = point_metrics_fbeta(&adjusted_pred, &run.true_label, config.beta)?;

    if run.true_label.count_positive() == 0 {
        warn!(
            "run '{}' has no positive ground truth; recall is reported as 0",
            run.name
        );
    }
    debug!(
        "run '{}': n={} segments={} raw(tp={} fp={} fn={}) adjusted(tp={} fp={} fn={})",
        run.name,
        run.true_label.len(),
        run.true_label.segments().count(),
        raw.tp,
        raw.fp,
        raw.fn_,
        adjusted.tp,
        adjusted.fp,
        adjusted.fn_
    );

    Ok(RunReport {
        name: run.name.clone(),
        raw,
        adjusted,
        adjusted_pred,
    })
}

fn evaluate_sequential(
    runs: &[RunInput],
    config: &HarnessConfig,
) -> Result<Vec<RunReport>, EvalError> {
    runs.iter()
        .map(|run| evaluate_validated(run, config).map_err(|err| err.in_run(run.name.as_str())))
        .collect()
}

#[cfg(feature = "rayon")]
fn evaluate_parallel(
    runs: &[RunInput],
    config: &HarnessConfig,
) -> Result<Vec<RunReport>, EvalError> {
    // Indexed collection keeps run order; the first error in run order wins.
    let results = runs
        .par_iter()
        .map(|run| evaluate_validated(run, config).map_err(|err| err.in_run(run.name.as_str())))
        .collect::<Vec<_>>();
    results.into_iter().collect()
}

#[cfg(not(feature = "rayon"))]
fn evaluate_parallel(
    runs: &[RunInput],
    config: &HarnessConfig,
) -> Result<Vec<RunReport>, EvalError> {
    evaluate_sequential(runs, config)
}

#[cfg(feature = "rayon")]
fn can_use_parallel(mode: ExecutionMode, run_count: usize) -> bool {
    mode.allows_parallel(run_count)
}

#[cfg(not(feature = "rayon"))]
fn can_use_parallel(_mode: ExecutionMode, _run_count: usize) -> bool {
    false
}
