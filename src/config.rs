use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_COLS: usize = 12;
pub const DEFAULT_NAME: &str = "Новая таблица";

/// Largest grid the binaries accept (999 rows, columns up to `ZZ`).
pub const MAX_ROWS: usize = 999;
pub const MAX_COLS: usize = 702;

/// Dimensions and title of a grid session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub name: String,
    /// Auto-fit with the embedded font's advances instead of the character-count estimate.
    #[serde(default)]
    pub font_metrics: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            name: DEFAULT_NAME.to_string(),
            font_metrics: false,
        }
    }
}

impl GridConfig {
    pub fn new(rows: usize, cols: usize, name: impl Into<String>) -> Self {
        Self {
            rows,
            cols,
            name: name.into(),
            font_metrics: false,
        }
    }

    pub fn with_font_metrics(mut self, enabled: bool) -> Self {
        self.font_metrics = enabled;
        self
    }

    /// Reject dimensions the binaries cannot serve.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows > MAX_ROWS {
            return Err(GridError::InvalidConfig(format!(
                "rows must be in 1..={}, got {}",
                MAX_ROWS, self.rows
            )));
        }
        if self.cols == 0 || self.cols > MAX_COLS {
            return Err(GridError::InvalidConfig(format!(
                "cols must be in 1..={}, got {}",
                MAX_COLS, self.cols
            )));
        }
        Ok(())
    }
}
