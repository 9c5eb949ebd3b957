//! Configuration structures for the timebar system.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::period::Period;
use crate::types::OfferSide;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bar construction configuration.
    pub bars: BarConfig,
    /// Ingestion buffering configuration.
    pub ingestion: IngestionConfig,
}

impl Config {
    /// Parse a JSON document. Missing sections and fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.bars.period.is_tick() {
            return Err(Error::config("bar period cannot be tick"));
        }
        if self.bars.tick_bar_size == 0 {
            return Err(Error::config("tick_bar_size must be positive"));
        }
        if self.ingestion.max_pending_bars == 0 {
            return Err(Error::config("max_pending_bars must be positive"));
        }
        Ok(())
    }
}

/// Bar construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Period of time-based bars.
    pub period: Period,
    /// Side of the book bars are built from.
    pub offer_side: OfferSide,
    /// Ticks per tick bar.
    pub tick_bar_size: u32,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            period: Period::ONE_MINUTE,
            offer_side: OfferSide::Bid,
            tick_bar_size: 100,
        }
    }
}

/// Ingestion buffering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Maximum bars kept open at once; the oldest is closed early beyond this.
    pub max_pending_bars: usize,
    /// Drop ticks that fall into an already finalized bucket.
    pub reject_out_of_order: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_pending_bars: 1_000,
            reject_out_of_order: true,
        }
    }
}
