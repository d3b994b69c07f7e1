// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EvalError;
use crate::delay::DelayWindow;
use std::iter::FusedIterator;

/// Index-aligned binary label sequence (ground truth or prediction).
///
/// Values are strictly binary; the fallible constructors reject anything that
/// is not exactly 0 or 1 instead of coercing it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LabelSequence {
    labels: Vec<bool>,
}

impl LabelSequence {
    pub fn from_bools(labels: Vec<bool>) -> Self {
        Self { labels }
    }

    /// Builds a sequence from 0/1 bytes.
    pub fn from_u8(values: &[u8]) -> Result<Self, EvalError> {
        values
            .iter()
            .enumerate()
            .map(|(index, &value)| binary(index, f64::from(value), value == 1, value <= 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_bools)
    }

    /// Builds a sequence from 0/1 integers.
    pub fn from_i64(values: &[i64]) -> Result<Self, EvalError> {
        values
            .iter()
            .enumerate()
            .map(|(index, &value)| binary(index, value as f64, value == 1, value == 0 || value == 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_bools)
    }

    /// Builds a sequence from 0.0/1.0 floats, as label columns often arrive.
    pub fn from_f64(values: &[f64]) -> Result<Self, EvalError> {
        values
            .iter()
            .enumerate()
            .map(|(index, &value)| binary(index, value, value == 1.0, value == 0.0 || value == 1.0))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_bools)
    }

    /// Concatenates sequences in the given order.
    pub fn concat<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a LabelSequence>,
    {
        let mut labels = Vec::new();
        for part in parts {
            labels.extend_from_slice(part.as_slice());
        }
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.labels.get(index).copied()
    }

    pub fn count_positive(&self) -> usize {
        self.labels.iter().filter(|&&label| label).count()
    }

    /// Maximal runs of positive labels, left to right.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            labels: &self.labels,
            pos: 0,
        }
    }

    /// Returns the labels as 0/1 bytes.
    pub fn to_u8_vec(&self) -> Vec<u8> {
        self.labels.iter().map(|&label| u8::from(label)).collect()
    }

    pub fn into_inner(self) -> Vec<bool> {
        self.labels
    }
}

impl From<Vec<bool>> for LabelSequence {
    fn from(labels: Vec<bool>) -> Self {
        Self::from_bools(labels)
    }
}

impl FromIterator<bool> for LabelSequence {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self::from_bools(iter.into_iter().collect())
    }
}

fn binary(index: usize, value: f64, positive: bool, valid: bool) -> Result<bool, EvalError> {
    if valid {
        Ok(positive)
    } else {
        Err(EvalError::NonBinaryLabel { index, value })
    }
}

/// Maximal contiguous run of positive ground-truth labels, inclusive on both ends.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Segments are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Last index of the tolerance window, clipped to the segment end.
    pub fn tolerance_end(&self, delay: DelayWindow) -> usize {
        self.start.saturating_add(delay.get()).min(self.end)
    }
}

/// Iterator over the segments of a [`LabelSequence`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    labels: &'a [bool],
    pos: usize,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.labels[self.pos..].iter().position(|&label| label)?;
        let start = self.pos + offset;
        let run = self.labels[start..]
            .iter()
            .position(|&label| !label)
            .unwrap_or(self.labels.len() - start);
        self.pos = start + run;
        Some(Segment {
            start,
            end: start + run - 1,
        })
    }
}

impl FusedIterator for Segments<'_> {}
