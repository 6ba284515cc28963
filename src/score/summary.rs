use serde::{Deserialize, Serialize};

/// Read-only result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: u64,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub early_count: u32,
    pub late_count: u32,
    pub total_notes: u32,
    /// Notes still unresolved when the session ended.
    pub unplayed_count: u32,
    pub paused_ms: i64,
    pub accuracy_percent: f64,
}

impl SessionSummary {
    /// Hits over all scheduled notes; unplayed notes count against accuracy.
    pub fn accuracy_over(hits: u32, total_notes: u32) -> f64 {
        if total_notes == 0 {
            return 0.0;
        }
        hits as f64 / total_notes as f64 * 100.0
    }

    pub fn rank(&self) -> &'static str {
        let acc = self.accuracy_percent;
        if acc >= 95.0 {
            "S"
        } else if acc >= 90.0 {
            "A"
        } else if acc >= 80.0 {
            "B"
        } else if acc >= 70.0 {
            "C"
        } else {
            "D"
        }
    }

    pub fn is_full_combo(&self) -> bool {
        self.total_notes > 0 && self.miss_count == 0 && self.unplayed_count == 0
    }
}
