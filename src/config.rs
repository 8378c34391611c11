//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/gridwm/config.json`).  Every section is optional and
//! falls back to compiled-in defaults; unknown keys are ignored so the file
//! can grow new sections without breaking older builds.
//!
//! # Example
//!
//! ```json
//! {
//!   "workspaces": {
//!     "rows": 2,
//!     "cols": 3,
//!     "max_workspaces": 9,
//!     "wraparound": true,
//!     "wraparound_same_row": false,
//!     "overflow": "origin",
//!     "layout": "tile",
//!     "main_window_scale": 50
//!   },
//!   "screen": { "width": 2560, "height": 1440 }
//! }
//! ```

use crate::command::Rect;
use crate::workspace::DEFAULT_MAIN_WINDOW_SCALE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workspace grid shape and navigation policy.
    #[serde(default)]
    pub workspaces: GridConfig,

    /// Usable screen area handed to layouts.
    #[serde(default)]
    pub screen: ScreenConfig,
}

/// What grid navigation does when a step lands past the last row or column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Jump to the first workspace.
    #[default]
    Origin,
    /// Stay on the last row/column.
    Clamp,
}

/// Shape of the workspace grid.
///
/// Read once at startup; the grid is never resized afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Upper bound on `rows * cols`.  Must be given whenever a `workspaces`
    /// section is present; a missing bound refuses to build the grid.
    #[serde(default)]
    pub max_workspaces: Option<usize>,
    /// Crossing an edge re-enters from the opposite edge.
    pub wraparound: bool,
    /// Wrapping stays on the same row (or column) instead of moving to the
    /// adjacent one.
    pub wraparound_same_row: bool,
    pub overflow: OverflowPolicy,
    /// Layout every workspace starts with.
    pub layout: String,
    /// Initial main window scale, clamped to `1..=99`.
    pub main_window_scale: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            max_workspaces: Some(9),
            wraparound: true,
            wraparound_same_row: false,
            overflow: OverflowPolicy::Origin,
            layout: "tile".into(),
            main_window_scale: DEFAULT_MAIN_WINDOW_SCALE as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }
    }
}

impl ScreenConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
