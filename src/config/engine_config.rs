use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::{DEFAULT_LEAD_MS, DEFAULT_MISS_THRESHOLD_MS, DEFAULT_VISIBLE_TRAIL_MS};
use crate::judge::{ScoreTable, TimingWindows};
use crate::score::{ComboTier, default_combo_tiers};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("timing windows must satisfy 0 <= perfect ({perfect}) <= good ({good}) <= miss ({miss})")]
    WindowOrder { perfect: i64, good: i64, miss: i64 },

    #[error("lead time must not be negative: {0}ms")]
    NegativeLead(i64),

    #[error("visible trail must not be negative: {0}ms")]
    NegativeTrail(i64),

    #[error("at least one combo tier is required")]
    NoComboTiers,

    #[error("first combo tier must start at combo 0, found {0}")]
    FirstTierNotZero(u32),

    #[error("combo tiers must be strictly ascending (tier {index} starts at {min_combo})")]
    TiersNotAscending { index: usize, min_combo: u32 },
}

/// Judgment, scoring and visibility tables injected into the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingWindows,
    pub scores: ScoreTable,
    pub combo_tiers: Vec<ComboTier>,
    /// How long before its hit time a note becomes visible.
    pub lead_ms: i64,
    /// How long after its hit time an unresolved note stays visible.
    pub visible_trail_ms: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timing: TimingWindows {
                miss_ms: DEFAULT_MISS_THRESHOLD_MS,
                ..TimingWindows::standard()
            },
            scores: ScoreTable::default(),
            combo_tiers: default_combo_tiers(),
            lead_ms: DEFAULT_LEAD_MS,
            visible_trail_ms: DEFAULT_VISIBLE_TRAIL_MS,
        }
    }
}

impl EngineConfig {
    /// Loads config from a JSON file.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let TimingWindows {
            perfect_ms,
            good_ms,
            miss_ms,
        } = self.timing;
        if perfect_ms < 0 || perfect_ms > good_ms || good_ms > miss_ms {
            return Err(ConfigError::WindowOrder {
                perfect: perfect_ms,
                good: good_ms,
                miss: miss_ms,
            });
        }
        if self.lead_ms < 0 {
            return Err(ConfigError::NegativeLead(self.lead_ms));
        }
        if self.visible_trail_ms < 0 {
            return Err(ConfigError::NegativeTrail(self.visible_trail_ms));
        }

        let first = self.combo_tiers.first().ok_or(ConfigError::NoComboTiers)?;
        if first.min_combo != 0 {
            return Err(ConfigError::FirstTierNotZero(first.min_combo));
        }
        for (index, pair) in self.combo_tiers.windows(2).enumerate() {
            if pair[1].min_combo <= pair[0].min_combo {
                return Err(ConfigError::TiersNotAscending {
                    index: index + 1,
                    min_combo: pair[1].min_combo,
                });
            }
        }
        Ok(())
    }
}
