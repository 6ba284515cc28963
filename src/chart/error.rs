use thiserror::Error;

use super::Lane;

/// Reasons a note schedule is rejected before a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("note {index} has negative time {time_ms}ms")]
    NegativeTime { index: usize, time_ms: i64 },

    #[error("note {index} at {time_ms}ms is earlier than the previous note at {previous_ms}ms")]
    Unsorted {
        index: usize,
        time_ms: i64,
        previous_ms: i64,
    },

    #[error("duplicate note at {time_ms}ms on lane {lane}")]
    DuplicateNote { time_ms: i64, lane: Lane },
}
