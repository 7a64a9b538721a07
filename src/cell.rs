use crate::error::{GridError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

lazy_static! {
    static ref CELL_NAME_REGEX: Regex = Regex::new(r"^([A-Za-z]+)([0-9]+)$").unwrap();
    static ref CELL_KEY_REGEX: Regex = Regex::new(r"^([0-9]+)_([0-9]+)$").unwrap();
}

/// Sparse text storage for a fixed-size grid.
///
/// Only non-empty cells are materialized; reading an unset cell yields `""`.
/// Coordinates are 0-based and must lie inside `[0, rows) x [0, cols)`.
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    rows: usize,
    cols: usize,
    cells: HashMap<(usize, usize), String>,
}

impl CellStore {
    pub fn new(rows: usize, cols: usize) -> Self {
        CellStore {
            rows,
            cols,
            cells: HashMap::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Fails with `OutOfRange` unless `(row, col)` addresses a cell of this grid.
    pub fn check(&self, row: usize, col: usize) -> Result<()> {
        check_bounds(self.rows, self.cols, row, col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&str> {
        self.check(row, col)?;
        Ok(self.cells.get(&(row, col)).map_or("", String::as_str))
    }

    /// Stores `text` at `(row, col)`. An empty string removes the entry.
    pub fn set(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.check(row, col)?;
        if text.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), text.to_string());
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of materialized (non-empty) cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
        }
    }
}

/// Immutable point-in-time copy of a [`CellStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct CellSnapshot {
    rows: usize,
    cols: usize,
    cells: HashMap<(usize, usize), String>,
}

impl CellSnapshot {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&str> {
        check_bounds(self.rows, self.cols, row, col)?;
        Ok(self.text(row, col))
    }

    /// Unchecked read used by the serializers, which only walk in-range coordinates.
    pub(crate) fn text(&self, row: usize, col: usize) -> &str {
        self.cells.get(&(row, col)).map_or("", String::as_str)
    }

    /// Row-major iterator over every cell, empty ones included.
    pub fn iter_row_major(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c, self.text(r, c))))
    }

    /// Non-empty cells keyed as `"{row}_{col}"`, the format the table storage expects.
    pub fn to_keyed_map(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|(&(r, c), v)| (cell_key(r, c), v.clone()))
            .collect()
    }
}

fn check_bounds(rows: usize, cols: usize, row: usize, col: usize) -> Result<()> {
    if row >= rows || col >= cols {
        return Err(GridError::OutOfRange {
            row,
            col,
            rows,
            cols,
        });
    }
    Ok(())
}

/// Key used by the table storage payload: `"{row}_{col}"`.
pub fn cell_key(row: usize, col: usize) -> String {
    format!("{}_{}", row, col)
}

pub fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    let caps = CELL_KEY_REGEX.captures(key)?;
    let row = caps[1].parse().ok()?;
    let col = caps[2].parse().ok()?;
    Some((row, col))
}

/// Convert a 0-based column index to its letter label (0 = A, 25 = Z, 26 = AA).
pub fn col_to_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut result = String::new();
    while n > 0 {
        n -= 1;
        result.push(((n % 26) as u8 + b'A') as char);
        n /= 26;
    }
    result.chars().rev().collect()
}

/// Inverse of [`col_to_letter`]. Case-insensitive; `None` for non-letters.
pub fn letter_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc - 1)
}

/// Display name of a cell, e.g. `(2, 1)` -> `"B3"`.
pub fn cell_name(row: usize, col: usize) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Parse a cell name like `B3` into 0-based `(row, col)` within a `rows x cols` grid.
pub fn parse_cell_name(name: &str, rows: usize, cols: usize) -> Result<(usize, usize)> {
    let invalid = || GridError::InvalidCellName(name.to_string());
    let caps = CELL_NAME_REGEX.captures(name.trim()).ok_or_else(invalid)?;
    let col = letter_to_col(&caps[1]).ok_or_else(invalid)?;
    let row: usize = caps[2].parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    let row = row - 1;
    check_bounds(rows, cols, row, col)?;
    Ok((row, col))
}
