// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Controls whether independent runs may be evaluated on worker threads.
///
/// Results are identical in every mode; only scheduling differs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Evaluate runs one after another on the calling thread.
    Strict,
    /// Parallelize when there is more than one run.
    #[default]
    Balanced,
    /// Parallelize whenever a thread pool is available.
    Fast,
}

impl ExecutionMode {
    /// Whether `run_count` runs should be fanned out across threads.
    pub fn allows_parallel(self, run_count: usize) -> bool {
        match self {
            Self::Strict => false,
            Self::Balanced => run_count > 1,
            Self::Fast => run_count > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionMode;

    #[test]
    fn execution_mode_default_is_balanced() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Balanced);
    }

    #[test]
    fn strict_mode_never_parallelizes() {
        assert!(!ExecutionMode::Strict.allows_parallel(64));
        assert!(!ExecutionMode::Balanced.allows_parallel(1));
        assert!(ExecutionMode::Balanced.allows_parallel(2));
        assert!(ExecutionMode::Fast.allows_parallel(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn execution_mode_serde_roundtrip() {
        for mode in [
            ExecutionMode::Strict,
            ExecutionMode::Balanced,
            ExecutionMode::Fast,
        ] {
            let encoded = serde_json::to_string(&mode).expect("mode should serialize");
            let decoded: ExecutionMode =
                serde_json::from_str(&encoded).expect("mode should deserialize");
            assert_eq!(decoded, mode);
        }
    }
}
