use thiserror::Error;

use crate::chart::ScheduleError;
use crate::config::ConfigError;
use crate::engine::EngineState;
use crate::traits::ClockError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{operation} is not allowed while the engine is {state}")]
    InvalidState {
        operation: &'static str,
        state: EngineState,
    },

    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    #[error("cannot start session without a clock reading")]
    ClockUnavailable(#[source] ClockError),

    #[error("invalid engine config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
