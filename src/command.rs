use crate::cell::{col_to_letter, letter_to_col, parse_cell_name};
use crate::error::{GridError, Result};
use crate::spreadsheet::Spreadsheet;
use std::fs;
use std::path::{Path, PathBuf};

/// One line of input to the interactive editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `B3=text`; an empty right-hand side empties the cell.
    Set { row: usize, col: usize, text: String },
    /// `resize B 120`
    Resize { col: usize, width: u32 },
    Clear,
    /// `name Quarterly report`
    Rename(String),
    /// `csv [dir]`
    ExportCsv(Option<PathBuf>),
    /// `png [dir]`
    ExportPng(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "Commands:
  <cell>=<text>       Set a cell, e.g. B3=hello (empty text clears it)
  resize <col> <px>   Set a column width, e.g. resize B 120
  clear               Empty every cell and reset widths
  name <title>        Rename the table
  csv [dir]           Write <name>.csv
  png [dir]           Write <name>.png
  show                Print the grid
  q                   Quit";

impl Command {
    pub fn parse(line: &str, sheet: &Spreadsheet) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        match word {
            "q" | "quit" if rest.is_empty() => return Ok(Command::Quit),
            "help" if rest.is_empty() => return Ok(Command::Help),
            "show" if rest.is_empty() => return Ok(Command::Show),
            "clear" if rest.is_empty() => return Ok(Command::Clear),
            "name" if !rest.is_empty() => return Ok(Command::Rename(rest.to_string())),
            "csv" => return Ok(Command::ExportCsv(optional_dir(rest))),
            "png" => return Ok(Command::ExportPng(optional_dir(rest))),
            "resize" => return parse_resize(rest, sheet),
            _ => {}
        }

        if let Some((cell, text)) = line.split_once('=') {
            let (row, col) = parse_cell_name(cell, sheet.rows(), sheet.cols())?;
            return Ok(Command::Set {
                row,
                col,
                text: text.to_string(),
            });
        }

        Err(GridError::InvalidCommand(trimmed.to_string()))
    }
}

fn optional_dir(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

fn parse_resize(rest: &str, sheet: &Spreadsheet) -> Result<Command> {
    let invalid = || GridError::InvalidCommand(format!("resize {}", rest));
    let mut parts = rest.split_whitespace();
    let (Some(letters), Some(width), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let col = letter_to_col(letters).ok_or_else(invalid)?;
    if col >= sheet.cols() {
        return Err(GridError::ColumnOutOfRange {
            col,
            cols: sheet.cols(),
        });
    }
    let width = width.parse().map_err(|_| invalid())?;
    Ok(Command::Resize { col, width })
}

/// What the caller should do after a command ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Status(String),
    Output(String),
    Quit,
}

/// Apply `command` to `sheet`. Exports are written to `dir` (or `default_dir`).
pub fn execute(sheet: &mut Spreadsheet, command: Command, default_dir: &Path) -> Result<Outcome> {
    let outcome = match command {
        Command::Set { row, col, text } => {
            sheet.set_cell(row, col, &text)?;
            Outcome::Status("ok".to_string())
        }
        Command::Resize { col, width } => {
            let applied = sheet.resize_column(col, width)?;
            Outcome::Status(format!("{} = {}px", col_to_letter(col), applied))
        }
        Command::Clear => {
            sheet.clear();
            Outcome::Status("ok".to_string())
        }
        Command::Rename(name) => {
            sheet.rename(&name);
            Outcome::Status("ok".to_string())
        }
        Command::ExportCsv(dir) => {
            let snapshot = sheet.snapshot();
            let path = dir.as_deref().unwrap_or(default_dir).join(snapshot.csv_filename());
            fs::write(&path, snapshot.to_csv())?;
            Outcome::Status(format!("wrote {}", path.display()))
        }
        Command::ExportPng(dir) => {
            let snapshot = sheet.snapshot();
            let path = dir.as_deref().unwrap_or(default_dir).join(snapshot.png_filename());
            fs::write(&path, snapshot.to_png()?)?;
            Outcome::Status(format!("wrote {}", path.display()))
        }
        Command::Show => Outcome::Output(display(sheet, 10)),
        Command::Help => Outcome::Output(HELP.to_string()),
        Command::Quit => Outcome::Quit,
    };
    Ok(outcome)
}

/// Plain-text view of the first `max_rows` rows, one fixed-width column per grid column.
pub fn display(sheet: &Spreadsheet, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for c in 0..sheet.cols() {
        out.push_str(&format!("{:<12}", col_to_letter(c)));
    }
    out.push('\n');

    for r in 0..sheet.rows().min(max_rows) {
        out.push_str(&format!("{:<4}", r + 1));
        for c in 0..sheet.cols() {
            let value = sheet.get_cell(r, c).unwrap_or_default();
            let clipped: String = value.chars().take(11).collect();
            out.push_str(&format!("{:<12}", clipped));
        }
        out.push('\n');
    }
    out
}
