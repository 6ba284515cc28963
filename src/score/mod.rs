mod combo;
mod session;
mod summary;

pub use combo::{ComboTier, ComboTracker, default_combo_tiers};
pub use session::GameSession;
pub use summary::SessionSummary;
