// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EvalError;

/// Default detection delay tolerance, in samples.
pub const DEFAULT_DELAY: usize = 7;

/// How many samples past a segment start still count as detecting the segment.
///
/// The window for a segment `[start, end]` is `[start, min(end, start + delay)]`,
/// so a delay of zero only inspects the first anomalous sample.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelayWindow(usize);

impl DelayWindow {
    /// Validates a signed delay as read from user input.
    pub fn new(delay: i64) -> Result<Self, EvalError> {
        usize::try_from(delay)
            .map(Self)
            .map_err(|_| EvalError::InvalidDelay(delay))
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self(DEFAULT_DELAY)
    }
}

impl From<usize> for DelayWindow {
    fn from(delay: usize) -> Self {
        Self(delay)
    }
}
