// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod delay;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod repro;

pub use delay::{DEFAULT_DELAY, DelayWindow};
pub use error::EvalError;
pub use labels::{LabelSequence, Segment, Segments};
pub use metrics::{ConfusionCounts, MetricResult};
pub use repro::ExecutionMode;

/// Core shared types for ade.
pub fn crate_name() -> &'static str {
    "ade-core"
}
