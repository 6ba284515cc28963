mod error;
mod note;
mod schedule;

pub use error::ScheduleError;
pub use note::{Lane, Note, NoteId, NoteSpec, NoteState};
pub use schedule::{
    AdvanceOutcome, DEFAULT_LEAD_MS, DEFAULT_MISS_THRESHOLD_MS, DEFAULT_VISIBLE_TRAIL_MS, Schedule,
};
