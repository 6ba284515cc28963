use serde::{Deserialize, Serialize};

use crate::chart::Lane;

/// A single press on a lane, stamped with gameplay time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub lane: Lane,
    pub time_ms: i64,
}

impl InputEvent {
    pub fn new(lane: Lane, time_ms: i64) -> Self {
        Self { lane, time_ms }
    }
}

/// Abstraction over input sources.
/// Implementations: ScriptedInput (simulation, testing).
pub trait InputSource {
    /// Events stamped at or before `up_to_ms` not yet returned, in time order.
    fn poll_events(&mut self, up_to_ms: i64) -> Vec<InputEvent>;

    /// Whether every event has been delivered.
    fn is_exhausted(&self) -> bool;
}

/// Replays a fixed list of events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<InputEvent>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by_key(|e| e.time_ms);
        Self { events, cursor: 0 }
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self, up_to_ms: i64) -> Vec<InputEvent> {
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.time_ms <= up_to_ms)
        {
            self.cursor += 1;
        }
        self.events[start..self.cursor].to_vec()
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
