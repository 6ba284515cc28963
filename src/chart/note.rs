use serde::{Deserialize, Serialize};

use crate::judge::JudgmentCategory;

/// Independent judgment track index.
pub type Lane = u32;

/// Stable note identifier, assigned in schedule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteId(pub usize);

/// Schedule source entry: when and where a note should be hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSpec {
    pub time_ms: i64,
    #[serde(default)]
    pub lane: Lane,
}

impl NoteSpec {
    pub fn new(time_ms: i64, lane: Lane) -> Self {
        Self { time_ms, lane }
    }
}

/// Note lifecycle. `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteState {
    Pending,
    Hittable,
    Resolved(JudgmentCategory),
}

impl NoteState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    scheduled_time_ms: i64,
    lane: Lane,
    state: NoteState,
}

impl Note {
    pub(crate) fn new(id: NoteId, spec: NoteSpec) -> Self {
        Self {
            id,
            scheduled_time_ms: spec.time_ms,
            lane: spec.lane,
            state: NoteState::Pending,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn scheduled_time_ms(&self) -> i64 {
        self.scheduled_time_ms
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }

    /// Signed offset of a hit at `time_ms` (positive = late). Saturates at
    /// the `i64` bounds.
    pub fn timing_delta(&self, time_ms: i64) -> i64 {
        time_ms.saturating_sub(self.scheduled_time_ms)
    }

    /// Pending -> Hittable. Returns false if the note was not Pending.
    pub(crate) fn mark_hittable(&mut self) -> bool {
        if self.state == NoteState::Pending {
            self.state = NoteState::Hittable;
            true
        } else {
            false
        }
    }

    /// Resolves the note once; later calls are ignored.
    pub(crate) fn resolve(&mut self, category: JudgmentCategory) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.state = NoteState::Resolved(category);
        true
    }
}
