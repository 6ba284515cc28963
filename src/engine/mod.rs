mod autoplay;
mod rhythm_engine;
mod snapshot;
mod state;

pub use autoplay::autoplay_inputs;
pub use rhythm_engine::{InputOutcome, RhythmEngine};
pub use snapshot::{ActiveNote, LastJudgment, StateSnapshot};
pub use state::EngineState;
