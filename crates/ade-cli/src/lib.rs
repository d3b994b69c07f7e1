// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_core::{EvalError, LabelSequence};
use ade_eval::{RunInput, threshold_scores};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the `ade` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InvalidInput(String),
}

impl CliError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Eval(err) => err.code(),
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "json_error",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Prediction column of an input file: binary labels or raw detector scores.
#[derive(Clone, Debug, PartialEq)]
pub enum Predictions {
    Labels(LabelSequence),
    Scores(Vec<f64>),
}

/// One parsed input file, before thresholding.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedRun {
    pub name: String,
    pub true_label: LabelSequence,
    pub predictions: Predictions,
}

impl LoadedRun {
    /// Converts to a harness run, thresholding scores at `thres_percent`.
    ///
    /// Returns the cutoff used when the run carried scores.
    pub fn into_run_input(self, thres_percent: f64) -> Result<(RunInput, Option<f64>), EvalError> {
        let (pred_label, threshold) = match self.predictions {
            Predictions::Labels(labels) => (labels, None),
            Predictions::Scores(scores) => {
                let (labels, cutoff) = threshold_scores(&scores, thres_percent)
                    .map_err(|err| err.in_run(self.name.as_str()))?;
                (labels, Some(cutoff))
            }
        };
        Ok((RunInput::new(self.name, pred_label, self.true_label), threshold))
    }
}

/// Resolves explicit inputs followed by a directory's `.csv`/`.json` files in
/// lexical file-name order.
pub fn collect_input_paths(
    inputs: &[PathBuf],
    input_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = inputs.to_vec();
    if let Some(dir) = input_dir {
        let entries = fs::read_dir(dir).map_err(|source| {
            CliError::io(format!("failed to read directory '{}'", dir.display()), source)
        })?;
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                CliError::io(format!("failed to list directory '{}'", dir.display()), source)
            })?;
            let path = entry.path();
            if path.is_file() && input_format(&path).is_some() {
                found.push(path);
            }
        }
        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        paths.extend(found);
    }

    if paths.is_empty() {
        return Err(CliError::invalid_input(
            "eval requires at least one --input <path> or an --input-dir with .csv/.json files",
        ));
    }
    Ok(paths)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    Csv,
    Json,
}

fn input_format(path: &Path) -> Option<InputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(InputFormat::Csv),
        "json" => Some(InputFormat::Json),
        _ => None,
    }
}

/// Reads and parses one input file; the run is named after the path.
pub fn load_run(path: &Path) -> Result<LoadedRun, CliError> {
    let format = input_format(path).ok_or_else(|| {
        CliError::invalid_input(format!(
            "unsupported input extension for '{}'; expected .csv or .json",
            path.display()
        ))
    })?;
    let raw = fs::read_to_string(path)
        .map_err(|source| CliError::io(format!("failed to read '{}'", path.display()), source))?;
    let name = path.display().to_string();
    match format {
        InputFormat::Csv => parse_csv_run(name, raw.as_str()),
        InputFormat::Json => parse_json_run(name, raw.as_str()),
    }
}

/// Parses a CSV with a header row holding `label` and either `pred` or `score`.
pub fn parse_csv_run(name: impl Into<String>, raw: &str) -> Result<LoadedRun, CliError> {
    let name = name.into();
    let mut rows = raw
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty());
    let (_, header) = rows
        .next()
        .ok_or_else(|| CliError::invalid_input(format!("'{name}' is empty; expected a header row")))?;
    let columns = header
        .split(',')
        .map(|col| col.trim().to_ascii_lowercase())
        .collect::<Vec<_>>();
    let find = |wanted: &str| columns.iter().position(|col| col == wanted);

    let label_col = find("label").ok_or_else(|| {
        CliError::invalid_input(format!("'{name}' has no 'label' column"))
    })?;
    let (pred_col, is_score) = match (find("pred"), find("score")) {
        (Some(col), _) => (col, false),
        (None, Some(col)) => (col, true),
        (None, None) => {
            return Err(CliError::invalid_input(format!(
                "'{name}' needs a 'pred' or 'score' column"
            )));
        }
    };

    let mut labels = Vec::new();
    let mut preds = Vec::new();
    for (line_idx, line) in rows {
        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        let cell = |col: usize, column: &str| -> Result<f64, CliError> {
            let raw = fields.get(col).ok_or_else(|| {
                CliError::invalid_input(format!(
                    "'{name}' line {} is missing the '{column}' column",
                    line_idx + 1
                ))
            })?;
            raw.parse::<f64>().map_err(|_| {
                CliError::invalid_input(format!(
                    "'{name}' line {} has non-numeric {column} '{raw}'",
                    line_idx + 1
                ))
            })
        };
        labels.push(cell(label_col, "label")?);
        preds.push(cell(pred_col, if is_score { "score" } else { "pred" })?);
    }

    build_run(name, &labels, preds, is_score)
}

/// Parses `{"label": [...], "pred": [...]}` or `{"label": [...], "score": [...]}`.
pub fn parse_json_run(name: impl Into<String>, raw: &str) -> Result<LoadedRun, CliError> {
    let name = name.into();
    let value: Value = serde_json::from_str(raw)
        .map_err(|source| CliError::json(format!("invalid JSON in '{name}'"), source))?;
    let object = value.as_object().ok_or_else(|| {
        CliError::invalid_input(format!("'{name}' must contain a JSON object"))
    })?;

    let labels = number_array(object.get("label"), &name, "label")?;
    if let Some(pred) = object.get("pred") {
        let preds = number_array(Some(pred), &name, "pred")?;
        return build_run(name, &labels, preds, false);
    }
    if let Some(score) = object.get("score") {
        let scores = number_array(Some(score), &name, "score")?;
        return build_run(name, &labels, scores, true);
    }
    Err(CliError::invalid_input(format!(
        "'{name}' needs a 'pred' or 'score' array"
    )))
}

fn number_array(value: Option<&Value>, name: &str, key: &str) -> Result<Vec<f64>, CliError> {
    let array = value
        .and_then(Value::as_array)
        .ok_or_else(|| CliError::invalid_input(format!("'{name}' needs a '{key}' array")))?;
    array
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_f64()
                .or_else(|| item.as_bool().map(|flag| if flag { 1.0 } else { 0.0 }))
                .ok_or_else(|| {
                    CliError::invalid_input(format!("'{name}' {key}[{idx}] must be a number"))
                })
        })
        .collect()
}

fn build_run(
    name: String,
    labels: &[f64],
    preds: Vec<f64>,
    is_score: bool,
) -> Result<LoadedRun, CliError> {
    let true_label = LabelSequence::from_f64(labels).map_err(|err| err.in_run(name.as_str()))?;
    let predictions = if is_score {
        Predictions::Scores(preds)
    } else {
        Predictions::Labels(
            LabelSequence::from_f64(&preds).map_err(|err| err.in_run(name.as_str()))?,
        )
    };
    Ok(LoadedRun {
        name,
        true_label,
        predictions,
    })
}

/// CLI crate name helper.
pub fn crate_name() -> &'static str {
    let _ = (ade_core::crate_name(), ade_eval::crate_name());
    "ade-cli"
}
