use crate::cell::{CellSnapshot, CellStore, parse_cell_key};
use crate::config::{DEFAULT_NAME, GridConfig};
use crate::downloader;
use crate::error::Result;
use crate::render;
use crate::tables::{DEFAULT_TABLE_NAME, TablePayload};
use crate::font::FontMeasure;
use crate::widths::{CharCountMeasure, ColumnWidths, TextMeasure};
use log::{debug, warn};

/// Immutable copy of the grid taken at export time.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSnapshot {
    pub name: String,
    pub cells: CellSnapshot,
    pub widths: Vec<u32>,
}

impl GridSnapshot {
    pub fn to_csv(&self) -> String {
        downloader::to_csv(&self.cells)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        render::to_png(self)
    }

    #[cfg(feature = "xlsx")]
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        downloader::to_xlsx(&self.cells, &self.widths)
    }

    /// Payload for the table storage: the name plus `"{row}_{col}"`-keyed values.
    pub fn to_payload(&self) -> TablePayload {
        TablePayload {
            name: Some(self.name.clone()),
            data: self.cells.to_keyed_map(),
        }
    }

    pub fn csv_filename(&self) -> String {
        format!("{}.csv", self.name)
    }

    pub fn png_filename(&self) -> String {
        format!("{}.png", self.name)
    }

    pub fn xlsx_filename(&self) -> String {
        format!("{}.xlsx", self.name)
    }
}

/// The grid controller: keeps cell text and column widths in step and
/// dispatches exports.
#[derive(Debug)]
pub struct Spreadsheet {
    pub name: String,
    cells: CellStore,
    widths: ColumnWidths,
}

impl Spreadsheet {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_config(&GridConfig::new(rows, cols, DEFAULT_NAME))
    }

    pub fn from_config(config: &GridConfig) -> Self {
        let measure: Box<dyn TextMeasure> = if config.font_metrics {
            Box::new(FontMeasure)
        } else {
            Box::new(CharCountMeasure)
        };
        Spreadsheet {
            name: config.name.clone(),
            cells: CellStore::new(config.rows, config.cols),
            widths: ColumnWidths::with_measure(config.cols, measure),
        }
    }

    /// Use a custom text measurement strategy for auto-fit.
    pub fn with_measure(rows: usize, cols: usize, measure: Box<dyn TextMeasure>) -> Self {
        Spreadsheet {
            name: DEFAULT_NAME.to_string(),
            cells: CellStore::new(rows, cols),
            widths: ColumnWidths::with_measure(cols, measure),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<&str> {
        self.cells.get(row, col)
    }

    /// Store `text` and re-evaluate the width of `col`.
    ///
    /// Coordinates are validated before anything is touched, so either both
    /// the cell and its column width change or neither does.
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.cells.check(row, col)?;
        self.cells.set(row, col, text)?;
        self.widths.observe(col, text)?;
        debug!("set ({row}, {col}) to {} chars", text.chars().count());
        Ok(())
    }

    /// Manually size `col`; returns the width after clamping.
    pub fn resize_column(&mut self, col: usize, width: u32) -> Result<u32> {
        self.widths.set_manual(col, width)
    }

    pub fn width_of(&self, col: usize) -> Result<u32> {
        self.widths.width_of(col)
    }

    pub fn column_widths(&self) -> Vec<u32> {
        self.widths.snapshot()
    }

    /// Columns whose current width was set by [`Spreadsheet::resize_column`].
    pub fn manual_columns(&self) -> Vec<usize> {
        self.widths.manual_columns()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.widths.reset();
        debug!("cleared {}x{} grid", self.rows(), self.cols());
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of non-empty cells.
    pub fn filled_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            name: self.name.clone(),
            cells: self.cells.snapshot(),
            widths: self.widths.snapshot(),
        }
    }

    pub fn export_csv(&self) -> String {
        self.snapshot().to_csv()
    }

    pub fn export_image(&self) -> Result<Vec<u8>> {
        self.snapshot().to_png()
    }

    #[cfg(feature = "xlsx")]
    pub fn export_xlsx(&self) -> Result<Vec<u8>> {
        self.snapshot().to_xlsx()
    }

    pub fn to_payload(&self) -> TablePayload {
        self.snapshot().to_payload()
    }

    /// Replace the grid contents with a stored table.
    ///
    /// Keys that do not parse or fall outside the grid are skipped. Each
    /// applied value goes through [`Spreadsheet::set_cell`], so column widths
    /// auto-fit to the loaded text. Returns the number of cells applied.
    pub fn load_payload(&mut self, payload: &TablePayload) -> usize {
        self.clear();
        self.name = payload
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        let mut applied = 0;
        for (key, value) in &payload.data {
            let Some((row, col)) = parse_cell_key(key) else {
                warn!("skipping malformed cell key {key:?}");
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match self.set_cell(row, col, value) {
                Ok(()) => applied += 1,
                Err(err) => warn!("skipping cell {key:?}: {err}"),
            }
        }
        applied
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}
