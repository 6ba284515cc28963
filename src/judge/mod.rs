mod judgment;
mod policy;

pub use judgment::{JudgmentCategory, JudgmentResult, TimingDirection};
pub use policy::{JudgmentPolicy, ScoreTable, TimingWindows};
