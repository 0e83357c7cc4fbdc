//! Engine and server configuration.
//!
//! The engine configuration is a JSON document; every field is optional:
//!
//! ```
//! use timetable_solver::config::{EngineConfig, RowLayout};
//!
//! let config = EngineConfig::from_json_str(r#"{
//!     "grid": { "days": ["Mon", "Tue"], "timeSlots": ["08:00-09:30", "09:30-11:00"] },
//!     "search": { "blockSearchBudget": 500, "rowLayout": "merged_block" }
//! }"#).unwrap();
//!
//! assert_eq!(config.grid.day_count(), 2);
//! assert_eq!(config.search.row_layout, RowLayout::MergedBlock);
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audit::AuditMode;
use crate::error::ConfigError;
use crate::grid::WeekGrid;

/// Environment variable naming the engine configuration file.
pub const CONFIG_ENV: &str = "TIMETABLE_CONFIG";
/// Environment variable overriding the server bind address.
pub const BIND_ENV: &str = "TIMETABLE_BIND";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_BLOCK_SEARCH_BUDGET: usize = 50_000;

/// How a contiguous block is written out as rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLayout {
    /// One row per grid cell; a block shows up as adjacent rows on one day.
    #[default]
    PerSlot,
    /// One row from the first cell's start to the last cell's end.
    MergedBlock,
}

/// Tuning for the slot allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Maximum oracle calls per course during the contiguous-block phase.
    pub block_search_budget: usize,
    pub row_layout: RowLayout,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            block_search_budget: DEFAULT_BLOCK_SEARCH_BUDGET,
            row_layout: RowLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub grid: WeekGrid,
    pub search: SearchOptions,
    pub audit_mode: AuditMode,
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads from `$TIMETABLE_CONFIG` if set, otherwise returns defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                info!("Loading engine configuration from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        std::env::var(BIND_ENV)
            .map(|bind_addr| Self { bind_addr })
            .unwrap_or_default()
    }
}
