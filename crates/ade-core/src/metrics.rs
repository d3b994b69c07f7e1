// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Confusion-matrix tallies for one evaluation pass.
///
/// Ratios follow a fixed zero-denominator convention instead of producing NaN:
/// precision is 0 when nothing was predicted positive, recall is 0 when the
/// ground truth has no positives, and any F-score is 0 when its denominator is 0.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    pub fn_: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// Weighted harmonic mean of precision and recall; `beta > 1` favours recall.
    pub fn f_beta(&self, beta: f64) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        let beta2 = beta * beta;
        let denominator = beta2 * precision + recall;
        if denominator == 0.0 {
            0.0
        } else {
            (1.0 + beta2) * precision * recall / denominator
        }
    }

    pub fn f1(&self) -> f64 {
        self.f_beta(1.0)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Add for ConfusionCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            tp: self.tp + rhs.tp,
            tn: self.tn + rhs.tn,
            fp: self.fp + rhs.fp,
            fn_: self.fn_ + rhs.fn_,
        }
    }
}

impl AddAssign for ConfusionCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ConfusionCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Precision/recall/F-score summary plus the counts it was derived from.
///
/// `f1` holds the F-beta score for whatever beta produced the result (1.0 unless
/// requested otherwise).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricResult {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    pub fn_: usize,
}

impl MetricResult {
    pub fn from_counts(counts: ConfusionCounts, beta: f64) -> Self {
        Self {
            precision: counts.precision(),
            recall: counts.recall(),
            f1: counts.f_beta(beta),
            tp: counts.tp,
            tn: counts.tn,
            fp: counts.fp,
            fn_: counts.fn_,
        }
    }

    pub fn counts(&self) -> ConfusionCounts {
        ConfusionCounts {
            tp: self.tp,
            tn: self.tn,
            fp: self.fp,
            fn_: self.fn_,
        }
    }
}

impl From<ConfusionCounts> for MetricResult {
    fn from(counts: ConfusionCounts) -> Self {
        Self::from_counts(counts, 1.0)
    }
}
