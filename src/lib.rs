/*!
# RoboDesk Grid

The grid editor core of the RoboDesk productivity application, built in Rust.

## Overview

A fixed-size table (30 rows × 12 columns by default) of free-form text cells.
Column widths auto-fit to their widest content, and the whole grid can be
downloaded as CSV, as a PNG picture, or (feature `xlsx`) as an Excel workbook.
Saved tables are handed to a table storage collaborator as
`{name, data: {"row_col": text}}` payloads.

## Architecture

### Core
- **Cell Store** (`cell`) - Sparse `(row, col) -> text` map; unset cells read as `""`
- **Column Width Model** (`widths`) - Non-shrinking auto-fit clamped to 80..=260 px,
  manual resize, pluggable text measurement
- **CSV Serializer** (`downloader`) - BOM-prefixed CSV, every cell of every row
- **Raster Serializer** (`render`, `font`) - Deterministic PNG drawn with plotters
  and text rasterized by fontdue from an embedded DejaVu Sans Mono
- **Grid Controller** (`spreadsheet`) - Applies edits to the store and widths together,
  exports point-in-time snapshots

### Around the core
- **Table storage** (`tables`) - In-memory stand-in for the remote tables endpoint
- **Command interpreter** (`command`) - Line commands used by the `cli` binary
- **Web service** (`app`, feature `web`) - axum routes for editing, exporting and saving

## Data Flow

1. `Spreadsheet::set_cell` validates the coordinate, stores the text and lets the
   width model observe it
2. An export takes a `GridSnapshot` (cells, widths, name)
3. The snapshot is handed to a serializer; later edits never affect it

## Design Highlights

- Row-major traversal for every serializer, independent of insertion order
- Measurement failures degrade to a character-count estimate instead of rejecting edits
- Zero-sized grids fail image export explicitly instead of writing an empty file
*/

pub mod cell;
pub mod command;
pub mod config;
pub mod downloader;
pub mod error;
pub mod font;
pub mod render;
pub mod spreadsheet;
pub mod tables;
pub mod widths;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the main types to make them easier to use
pub use cell::{CellSnapshot, CellStore};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use font::FontMeasure;
pub use spreadsheet::{GridSnapshot, Spreadsheet};
pub use tables::{StoredTable, TablePayload, TableStore};
pub use widths::{CharCountMeasure, ColumnWidths, MAX_WIDTH, MIN_WIDTH, TextMeasure};
