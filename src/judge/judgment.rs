use serde::{Deserialize, Serialize};

use crate::chart::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgmentCategory {
    Perfect,
    Good,
    Miss,
}

impl JudgmentCategory {
    pub fn continues_combo(&self) -> bool {
        matches!(self, Self::Perfect | Self::Good)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT",
            Self::Good => "GOOD",
            Self::Miss => "MISS",
        }
    }
}

/// Outcome of resolving one note, by input or by expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub note_id: NoteId,
    pub category: JudgmentCategory,
    /// `input_time - scheduled_time`; `None` for auto-miss.
    pub timing_delta_ms: Option<i64>,
    pub score_awarded: u64,
    pub combo_after: u32,
}

impl JudgmentResult {
    pub fn is_auto_miss(&self) -> bool {
        self.timing_delta_ms.is_none()
    }
}

/// FAST/SLOW direction of a judged hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingDirection {
    Early,
    Exact,
    Late,
}

impl TimingDirection {
    pub fn from_delta(timing_delta_ms: i64) -> Self {
        match timing_delta_ms {
            d if d < 0 => Self::Early,
            0 => Self::Exact,
            _ => Self::Late,
        }
    }
}
