// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

// Registered with `required-features = ["rayon"]`; Balanced and Fast fan out here.

use ade_core::{DelayWindow, ExecutionMode, LabelSequence};
use ade_eval::{EvaluationReport, HarnessConfig, RunInput, evaluate_runs};
use std::sync::Arc;
use std::thread;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

fn synthetic_runs(count: usize, len: usize) -> Vec<RunInput> {
    let mut state = 0x5eed_cafe_u64;
    (0..count)
        .map(|idx| {
            let mut truth = Vec::with_capacity(len);
            while truth.len() < len {
                let anomalous = lcg_next(&mut state) % 5 == 0;
                let run_len = 1 + (lcg_next(&mut state) % 30) as usize;
                truth.extend(std::iter::repeat_n(anomalous, run_len.min(len - truth.len())));
            }
            let pred = (0..len)
                .map(|_| lcg_next(&mut state) % 17 == 0)
                .collect::<Vec<_>>();
            RunInput::new(
                format!("run-{idx:03}"),
                LabelSequence::from_bools(pred),
                LabelSequence::from_bools(truth),
            )
        })
        .collect()
}

fn evaluate(runs: &[RunInput], mode: ExecutionMode) -> EvaluationReport {
    let config = HarnessConfig::default()
        .with_delay(DelayWindow::from(4))
        .with_mode(mode);
    evaluate_runs(runs, &config).expect("synthetic runs should evaluate")
}

#[test]
fn reports_are_identical_across_threads_and_modes() {
    const THREADS: usize = 4;

    let runs = Arc::new(synthetic_runs(24, 500));
    let baseline = evaluate(&runs, ExecutionMode::Strict);

    let mut workers = Vec::with_capacity(THREADS);
    for worker_idx in 0..THREADS {
        let runs = Arc::clone(&runs);
        workers.push(thread::spawn(move || {
            let mode = if worker_idx % 2 == 0 {
                ExecutionMode::Fast
            } else {
                ExecutionMode::Balanced
            };
            evaluate(&runs, mode)
        }));
    }

    for worker in workers {
        let report = worker.join().expect("thread should join cleanly");
        assert_eq!(report, baseline);
    }
}

#[test]
fn run_order_is_preserved_in_reports() {
    let runs = synthetic_runs(16, 64);
    let report = evaluate(&runs, ExecutionMode::Fast);
    let names = report
        .runs
        .iter()
        .map(|run| run.name.clone())
        .collect::<Vec<_>>();
    let expected = runs.iter().map(|run| run.name.clone()).collect::<Vec<_>>();
    assert_eq!(names, expected);
}
