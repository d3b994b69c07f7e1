// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use ade_core::{DelayWindow, LabelSequence};
use ade_eval::{HarnessConfig, RunInput, adjust_predicts, evaluate_runs, point_metrics};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);

    let delay = DelayWindow::new(i64::from(cursor.next_i16()));
    let split_seed = cursor.next_u8();
    let bytes = cursor.rest();

    // Low bit is truth, next bit is prediction.
    let truth = bytes.iter().map(|&b| b & 1 == 1).collect::<LabelSequence>();
    let pred = bytes.iter().map(|&b| b & 2 == 2).collect::<LabelSequence>();

    let Ok(delay) = delay else {
        return;
    };

    let adjusted = adjust_predicts(&pred, &truth, delay).expect("aligned input must adjust");
    assert_eq!(adjusted.len(), truth.len());
    let again = adjust_predicts(&adjusted, &truth, delay).expect("aligned input must adjust");
    assert_eq!(again, adjusted);

    let raw = point_metrics(&pred, &truth).expect("aligned input must score");
    let fixed = point_metrics(&adjusted, &truth).expect("aligned input must score");
    assert_eq!(raw.counts().total(), truth.len());
    assert_eq!(raw.fp, fixed.fp);
    assert!(fixed.recall >= raw.recall);

    let split = common::bounded(split_seed, 0, bytes.len());
    let runs = vec![
        RunInput::new(
            "head",
            pred.as_slice()[..split].iter().copied().collect(),
            truth.as_slice()[..split].iter().copied().collect(),
        ),
        RunInput::new(
            "tail",
            pred.as_slice()[split..].iter().copied().collect(),
            truth.as_slice()[split..].iter().copied().collect(),
        ),
    ];
    let report = evaluate_runs(&runs, &HarnessConfig::default().with_delay(delay))
        .expect("aligned runs must evaluate");
    assert_eq!(report.aggregate.counts().total(), truth.len());
});
