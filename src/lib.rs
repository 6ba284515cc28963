//! Real-time rhythm judgment core.
//!
//! A [`RhythmEngine`] owns a [`Schedule`] of timed notes for one session,
//! expires overdue notes as gameplay time advances, judges lane presses
//! against the configured timing windows and keeps score and combo.
//! Clock readings and input events are plain values pushed in by the caller.

pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod judge;
pub mod score;
pub mod traits;
pub mod util;

pub use chart::{Lane, Note, NoteId, NoteSpec, NoteState, Schedule, ScheduleError};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineState, InputOutcome, RhythmEngine, StateSnapshot};
pub use error::EngineError;
pub use judge::{JudgmentCategory, JudgmentResult};
pub use score::SessionSummary;
