pub mod clock;
pub mod input;

pub use clock::{Clock, ClockError, MockClock, PausableClock, SystemClock};
pub use input::{InputEvent, InputSource, ScriptedInput};
