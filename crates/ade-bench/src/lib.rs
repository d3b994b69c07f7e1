// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_core::LabelSequence;
use ade_eval::RunInput;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Deterministic ground truth with bursty anomalies and sparse noisy predictions.
pub fn synthetic_pair(n: usize, seed: u64) -> (LabelSequence, LabelSequence) {
    let mut state = seed ^ 0xfeed_f00d_dead_beef;
    let mut truth = Vec::with_capacity(n);
    while truth.len() < n {
        let anomalous = lcg_next(&mut state) % 8 == 0;
        let run_len = 1 + (lcg_next(&mut state) % 64) as usize;
        let take = run_len.min(n - truth.len());
        truth.extend(std::iter::repeat_n(anomalous, take));
    }
    let pred = truth
        .iter()
        .map(|&label| {
            let roll = lcg_next(&mut state) % 100;
            if label { roll < 30 } else { roll < 2 }
        })
        .collect();
    (pred, LabelSequence::from_bools(truth))
}

/// `count` independent runs of length `n`, named in lexical order.
pub fn synthetic_runs(count: usize, n: usize) -> Vec<RunInput> {
    (0..count)
        .map(|idx| {
            let (pred, truth) = synthetic_pair(n, idx as u64);
            RunInput::new(format!("run-{idx:04}"), pred, truth)
        })
        .collect()
}
