use serde::{Deserialize, Serialize};

use crate::judge::JudgmentCategory;

const PERMILLE: u64 = 1000;

/// Multiplier applied once the combo reaches `min_combo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTier {
    pub min_combo: u32,
    /// Multiplier in thousandths (1100 = x1.1).
    pub multiplier_permille: u32,
}

impl ComboTier {
    pub const fn new(min_combo: u32, multiplier_permille: u32) -> Self {
        Self {
            min_combo,
            multiplier_permille,
        }
    }
}

pub fn default_combo_tiers() -> Vec<ComboTier> {
    vec![
        ComboTier::new(0, 1000),
        ComboTier::new(10, 1100),
        ComboTier::new(20, 1200),
    ]
}

/// Streak counter. Perfect/Good extend it, any Miss resets it.
#[derive(Debug, Clone)]
pub struct ComboTracker {
    tiers: Vec<ComboTier>,
    combo: u32,
}

impl ComboTracker {
    /// `tiers` must be sorted by `min_combo`.
    pub fn new(tiers: Vec<ComboTier>) -> Self {
        Self {
            tiers,
            combo: 0,
        }
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Apply a resolution and return the combo after it.
    pub fn record(&mut self, category: JudgmentCategory) -> u32 {
        if category.continues_combo() {
            self.combo += 1;
        } else {
            self.combo = 0;
        }
        self.combo
    }

    /// Multiplier for the current combo.
    pub fn multiplier_permille(&self) -> u32 {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_combo <= self.combo)
            .map_or(PERMILLE as u32, |tier| tier.multiplier_permille)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier_permille() as f64 / PERMILLE as f64
    }

    /// `base` scaled by the current multiplier, rounded down.
    pub fn apply_multiplier(&self, base: u64) -> u64 {
        base * self.multiplier_permille() as u64 / PERMILLE
    }

    pub fn reset(&mut self) {
        self.combo = 0;
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(default_combo_tiers())
    }
}
