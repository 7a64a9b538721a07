use crate::error::{GridError, Result};
use log::{debug, warn};
use thiserror::Error;

/// Narrowest a data column can be, in pixels.
pub const MIN_WIDTH: u32 = 80;
/// Widest a data column can be, in pixels.
pub const MAX_WIDTH: u32 = 260;
/// Average advance of one glyph at the display font size.
pub const AVG_GLYPH_WIDTH: u32 = 7;
/// Horizontal padding added to every measured text.
pub const TEXT_PADDING: u32 = 24;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    #[error("text measurement unavailable: {0}")]
    Unavailable(String),
}

/// Strategy for measuring rendered text width.
///
/// [`CharCountMeasure`] is the deterministic default. [`crate::font::FontMeasure`]
/// measures with the embedded font's advances instead.
pub trait TextMeasure: Send + Sync {
    fn measure(&self, text: &str) -> Result<u32, MeasureError>;
}

/// `chars x AVG_GLYPH_WIDTH + TEXT_PADDING`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharCountMeasure;

impl TextMeasure for CharCountMeasure {
    fn measure(&self, text: &str) -> Result<u32, MeasureError> {
        Ok(estimate_width(text))
    }
}

pub fn estimate_width(text: &str) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(AVG_GLYPH_WIDTH).saturating_add(TEXT_PADDING)
}

/// Per-column display widths with non-shrinking auto-fit and manual override.
pub struct ColumnWidths {
    widths: Vec<u32>,
    /// Which columns were last sized by hand. Informational only: auto-fit
    /// never shrinks, so a manual width is kept until a wider value arrives
    /// either way.
    manual: Vec<bool>,
    measure: Box<dyn TextMeasure>,
}

impl std::fmt::Debug for ColumnWidths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnWidths")
            .field("widths", &self.widths)
            .field("manual", &self.manual)
            .finish()
    }
}

impl ColumnWidths {
    pub fn new(cols: usize) -> Self {
        Self::with_measure(cols, Box::new(CharCountMeasure))
    }

    pub fn with_measure(cols: usize, measure: Box<dyn TextMeasure>) -> Self {
        ColumnWidths {
            widths: vec![MIN_WIDTH; cols],
            manual: vec![false; cols],
            measure,
        }
    }

    pub fn cols(&self) -> usize {
        self.widths.len()
    }

    fn check(&self, col: usize) -> Result<()> {
        if col >= self.widths.len() {
            return Err(GridError::ColumnOutOfRange {
                col,
                cols: self.widths.len(),
            });
        }
        Ok(())
    }

    /// Measure `text` and widen `col` if it fits within `MAX_WIDTH`.
    ///
    /// Returns whether the width changed. A failing measurement falls back to
    /// [`estimate_width`] and never rejects the edit.
    pub fn observe(&mut self, col: usize, text: &str) -> Result<bool> {
        self.check(col)?;
        let candidate = match self.measure.measure(text) {
            Ok(width) => width,
            Err(err) => {
                warn!("{err}; falling back to character-count estimate");
                estimate_width(text)
            }
        };
        let current = self.widths[col];
        if candidate > current && candidate <= MAX_WIDTH {
            debug!("auto-fit column {col}: {current} -> {candidate}");
            self.widths[col] = candidate;
            self.manual[col] = false;
            return Ok(true);
        }
        Ok(false)
    }

    /// Set `col` to `width` clamped to `[MIN_WIDTH, MAX_WIDTH]`; returns the applied width.
    pub fn set_manual(&mut self, col: usize, width: u32) -> Result<u32> {
        self.check(col)?;
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        self.widths[col] = width;
        self.manual[col] = true;
        Ok(width)
    }

    pub fn width_of(&self, col: usize) -> Result<u32> {
        self.check(col)?;
        Ok(self.widths[col])
    }

    pub fn manual_columns(&self) -> Vec<usize> {
        (0..self.manual.len()).filter(|&c| self.manual[c]).collect()
    }

    pub fn reset(&mut self) {
        self.widths.fill(MIN_WIDTH);
        self.manual.fill(false);
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.widths.clone()
    }
}
