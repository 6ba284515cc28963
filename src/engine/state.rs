use std::fmt;

use serde::{Deserialize, Serialize};

/// Session lifecycle: Idle -> Running <-> Paused -> Ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    Running,
    Paused,
    Ended,
}

impl EngineState {
    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}
