// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_core::{ConfusionCounts, DelayWindow, LabelSequence};
use ade_eval::{
    HarnessConfig, RunInput, adjust_predicts, confusion_counts, evaluate_runs, point_metrics,
};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

const MIN_PROPTEST_CASES: u32 = 512;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

/// Aligned (pred, truth) pair of equal length.
fn label_pair(max_len: usize) -> impl Strategy<Value = (LabelSequence, LabelSequence)> {
    (0..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec(any::<bool>(), n),
        )
            .prop_map(|(pred, truth)| {
                (
                    LabelSequence::from_bools(pred),
                    LabelSequence::from_bools(truth),
                )
            })
    })
}

/// Ground truth built from long runs so segments span several indices.
fn bursty_pair(max_len: usize) -> impl Strategy<Value = (LabelSequence, LabelSequence)> {
    (
        prop::collection::vec((any::<bool>(), 1usize..8), 0..max_len),
        prop::collection::vec(prop::bool::weighted(0.2), max_len * 8),
    )
        .prop_map(|(runs, noise)| {
            let truth = runs
                .iter()
                .flat_map(|&(value, len)| std::iter::repeat_n(value, len))
                .collect::<Vec<_>>();
            let pred = noise[..truth.len()].to_vec();
            (
                LabelSequence::from_bools(pred),
                LabelSequence::from_bools(truth),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn confusion_counts_cover_every_index((pred, truth) in label_pair(128)) {
        let counts = confusion_counts(&pred, &truth).expect("aligned input should count");
        prop_assert_eq!(counts.total(), pred.len());

        let metrics = point_metrics(&pred, &truth).expect("aligned input should score");
        for value in [metrics.precision, metrics.recall, metrics.f1] {
            prop_assert!((0.0..=1.0).contains(&value), "metric {} out of range", value);
        }
    }

    #[test]
    fn adjustment_is_idempotent((pred, truth) in bursty_pair(48), delay in 0usize..12) {
        let delay = DelayWindow::from(delay);
        let once = adjust_predicts(&pred, &truth, delay).expect("first adjustment");
        let twice = adjust_predicts(&once, &truth, delay).expect("second adjustment");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn larger_delay_never_lowers_recall(
        (pred, truth) in bursty_pair(48),
        delay in 0usize..10,
        extra in 0usize..10,
    ) {
        let short = adjust_predicts(&pred, &truth, DelayWindow::from(delay)).expect("short delay");
        let long = adjust_predicts(&pred, &truth, DelayWindow::from(delay + extra))
            .expect("long delay");

        let short_recall = point_metrics(&short, &truth).expect("short metrics").recall;
        let long_recall = point_metrics(&long, &truth).expect("long metrics").recall;
        prop_assert!(long_recall >= short_recall);
    }

    #[test]
    fn adjustment_only_touches_true_segments((pred, truth) in label_pair(96), delay in 0usize..16) {
        let adjusted = adjust_predicts(&pred, &truth, DelayWindow::from(delay))
            .expect("adjustment should succeed");

        for idx in 0..pred.len() {
            if !truth.as_slice()[idx] {
                prop_assert_eq!(adjusted.as_slice()[idx], pred.as_slice()[idx]);
            } else if pred.as_slice()[idx] {
                prop_assert!(adjusted.as_slice()[idx]);
            }
        }
        let before = confusion_counts(&pred, &truth).expect("raw counts");
        let after = confusion_counts(&adjusted, &truth).expect("adjusted counts");
        prop_assert_eq!(before.fp, after.fp);
        prop_assert!(after.tp >= before.tp);
    }

    #[test]
    fn adjusted_segments_are_all_or_original(
        (pred, truth) in bursty_pair(48),
        delay in 0usize..12,
    ) {
        let delay = DelayWindow::from(delay);
        let adjusted = adjust_predicts(&pred, &truth, delay).expect("adjustment should succeed");

        for segment in truth.segments() {
            let hit = pred.as_slice()[segment.start..=segment.tolerance_end(delay)]
                .iter()
                .any(|&label| label);
            let span = segment.start..=segment.end;
            if hit {
                prop_assert!(adjusted.as_slice()[span].iter().all(|&label| label));
            } else {
                prop_assert_eq!(&adjusted.as_slice()[span.clone()], &pred.as_slice()[span]);
            }
        }
    }

    #[test]
    fn all_negative_truth_passes_predictions_through(
        pred in prop::collection::vec(any::<bool>(), 0..64),
        delay in 0usize..32,
    ) {
        let truth = LabelSequence::from_bools(vec![false; pred.len()]);
        let pred = LabelSequence::from_bools(pred);
        let adjusted = adjust_predicts(&pred, &truth, DelayWindow::from(delay))
            .expect("adjustment should succeed");
        prop_assert_eq!(adjusted, pred);
    }

    #[test]
    fn aggregate_counts_equal_sum_of_run_counts(
        pairs in prop::collection::vec(bursty_pair(16), 0..6),
        delay in 0usize..6,
    ) {
        let runs = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (pred, truth))| RunInput::new(format!("run-{idx}"), pred, truth))
            .collect::<Vec<_>>();
        let config = HarnessConfig::default().with_delay(DelayWindow::from(delay));
        let report = evaluate_runs(&runs, &config).expect("runs should evaluate");

        let summed = report
            .runs
            .iter()
            .map(|run| run.adjusted.counts())
            .sum::<ConfusionCounts>();
        prop_assert_eq!(report.aggregate.counts(), summed);
        prop_assert_eq!(
            report.aggregate.counts().total(),
            runs.iter().map(|run| run.true_label.len()).sum::<usize>()
        );
    }
}
