use thiserror::Error;

/// Errors produced by the grid core and its export/storage layers.
#[derive(Error, Debug)]
pub enum GridError {
    /// A coordinate outside `[0, rows) x [0, cols)`.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("column {col} is outside a grid of {cols} columns")]
    ColumnOutOfRange { col: usize, cols: usize },

    /// The raster encoder could not produce an image.
    #[error("image export failed: {0}")]
    ExportEncoding(String),

    #[error("invalid cell name: {0}")]
    InvalidCellName(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("table with id {0} not found")]
    TableNotFound(u64),

    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX export failed: {0}")]
    Xlsx(String),
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for GridError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        GridError::Xlsx(err.to_string())
    }
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
