use serde::{Deserialize, Serialize};

use super::JudgmentCategory;

/// Judgment window widths in milliseconds, applied symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingWindows {
    pub perfect_ms: i64,
    pub good_ms: i64,
    /// Outer acceptance window: inputs farther than this match nothing, and
    /// notes this far overdue expire.
    pub miss_ms: i64,
}

impl TimingWindows {
    pub fn standard() -> Self {
        Self {
            perfect_ms: 25,
            good_ms: 50,
            miss_ms: 100,
        }
    }
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self::standard()
    }
}

/// Base score per category, before the combo multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub perfect: u64,
    pub good: u64,
    pub miss: u64,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            perfect: 1000,
            good: 500,
            miss: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JudgmentPolicy {
    windows: TimingWindows,
    scores: ScoreTable,
}

impl JudgmentPolicy {
    pub fn new(windows: TimingWindows, scores: ScoreTable) -> Self {
        Self { windows, scores }
    }

    pub fn windows(&self) -> &TimingWindows {
        &self.windows
    }

    /// Classify a signed offset. `None` (auto-expiry) is always a Miss.
    ///
    /// Anything beyond the good window is a Miss; callers only pass offsets
    /// that already matched within `miss_ms`.
    pub fn classify(&self, timing_delta_ms: Option<i64>) -> JudgmentCategory {
        let Some(delta) = timing_delta_ms else {
            return JudgmentCategory::Miss;
        };
        let abs_delta = delta.abs();

        if abs_delta <= self.windows.perfect_ms {
            JudgmentCategory::Perfect
        } else if abs_delta <= self.windows.good_ms {
            JudgmentCategory::Good
        } else {
            JudgmentCategory::Miss
        }
    }

    pub fn base_score(&self, category: JudgmentCategory) -> u64 {
        match category {
            JudgmentCategory::Perfect => self.scores.perfect,
            JudgmentCategory::Good => self.scores.good,
            JudgmentCategory::Miss => self.scores.miss,
        }
    }

    pub fn is_in_window(&self, timing_delta_ms: i64) -> bool {
        timing_delta_ms.abs() <= self.windows.miss_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_windows() {
        let windows = TimingWindows::standard();
        assert_eq!(windows.perfect_ms, 25);
        assert_eq!(windows.good_ms, 50);
        assert_eq!(windows.miss_ms, 100);
    }

    #[test]
    fn test_classify_boundaries() {
        let policy = JudgmentPolicy::default();
        let cases = [
            (0, JudgmentCategory::Perfect),
            (25, JudgmentCategory::Perfect),
            (-25, JudgmentCategory::Perfect),
            (26, JudgmentCategory::Good),
            (-50, JudgmentCategory::Good),
            (50, JudgmentCategory::Good),
            (51, JudgmentCategory::Miss),
            (-100, JudgmentCategory::Miss),
        ];
        for (delta, expected) in cases {
            assert_eq!(policy.classify(Some(delta)), expected, "delta {delta}");
        }
    }

    #[test]
    fn test_auto_expiry_is_miss() {
        assert_eq!(JudgmentPolicy::default().classify(None), JudgmentCategory::Miss);
    }

    #[test]
    fn test_base_scores() {
        let policy = JudgmentPolicy::default();
        assert_eq!(policy.base_score(JudgmentCategory::Perfect), 1000);
        assert_eq!(policy.base_score(JudgmentCategory::Good), 500);
        assert_eq!(policy.base_score(JudgmentCategory::Miss), 0);
    }

    #[test]
    fn test_custom_tables() {
        let policy = JudgmentPolicy::new(
            TimingWindows {
                perfect_ms: 10,
                good_ms: 20,
                miss_ms: 40,
            },
            ScoreTable {
                perfect: 3,
                good: 1,
                miss: 0,
            },
        );
        assert_eq!(policy.classify(Some(15)), JudgmentCategory::Good);
        assert_eq!(policy.base_score(JudgmentCategory::Perfect), 3);
        assert!(policy.is_in_window(-40));
        assert!(!policy.is_in_window(41));
    }
}
