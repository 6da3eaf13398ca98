//! Engine configuration.
//!
//! The configuration is loaded from a JSON file.  Every section is optional
//! and falls back to compiled-in defaults, so `{}` is a valid file.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid": { "rows": 5, "columns": 4, "pages": 3 },
//!   "move": { "strategy": "shift", "on_relocation_failure": "strict" },
//!   "resize": { "heuristic": "chebyshev", "on_relocation_failure": "best-effort" }
//! }
//! ```

use crate::resolver::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid dimensions and page count.
    pub grid: GridConfig,

    /// Resolver settings used when an item is dragged or inserted.
    #[serde(rename = "move")]
    pub on_move: ResolveOptions,

    /// Resolver settings used when an item is resized.
    #[serde(rename = "resize")]
    pub on_resize: ResolveOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            on_move: ResolveOptions::for_move(),
            on_resize: ResolveOptions::for_resize(),
        }
    }
}

/// Shape of every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub columns: usize,
    /// Number of pages an inserted item may land on.
    pub pages: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 4,
            pages: 1,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject grids no item could ever be placed on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(ConfigError(format!(
                "grid must have at least one row and column, got {}x{}",
                self.grid.rows, self.grid.columns
            )));
        }
        if self.grid.pages == 0 {
            return Err(ConfigError("grid must have at least one page".into()));
        }
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
