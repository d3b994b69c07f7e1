// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised at the entry of every evaluation operation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("predicted and true label sequences must share length; got pred_len={pred}, true_len={truth}")]
    ShapeMismatch { pred: usize, truth: usize },
    #[error("delay must be >= 0; got {0}")]
    InvalidDelay(i64),
    #[error("labels must be binary (0 or 1); index {index} has {value}")]
    NonBinaryLabel { index: usize, value: f64 },
    #[error("scores must be finite; index {index} has {value}")]
    NonFiniteScore { index: usize, value: f64 },
    #[error("{0}")]
    InvalidParameter(String),
    #[error("run '{name}' failed: {source}")]
    Run {
        name: String,
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    pub fn shape_mismatch(pred: usize, truth: usize) -> Self {
        Self::ShapeMismatch { pred, truth }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Wraps an error with the name of the evaluation run that produced it.
    pub fn in_run(self, name: impl Into<String>) -> Self {
        Self::Run {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code; run wrappers report their inner code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::InvalidDelay(_) => "invalid_delay",
            Self::NonBinaryLabel { .. } => "non_binary_label",
            Self::NonFiniteScore { .. } => "non_finite_score",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::Run { source, .. } => source.code(),
        }
    }
}
