use serde::{Deserialize, Serialize};

use crate::chart::{Lane, Note, NoteId, NoteState};
use crate::judge::{JudgmentCategory, JudgmentResult};

/// Render-facing view of one visible note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNote {
    pub id: NoteId,
    pub lane: Lane,
    pub scheduled_time_ms: i64,
    pub state: NoteState,
}

impl From<&Note> for ActiveNote {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id(),
            lane: note.lane(),
            scheduled_time_ms: note.scheduled_time_ms(),
            state: note.state(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastJudgment {
    pub category: JudgmentCategory,
    pub timing_delta_ms: Option<i64>,
}

impl From<&JudgmentResult> for LastJudgment {
    fn from(result: &JudgmentResult) -> Self {
        Self {
            category: result.category,
            timing_delta_ms: result.timing_delta_ms,
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub active_notes: Vec<ActiveNote>,
    pub score: u64,
    pub combo: u32,
    pub multiplier: f64,
    pub last_judgment: Option<LastJudgment>,
    pub accuracy_percent: f64,
    pub paused: bool,
}
