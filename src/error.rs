use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of failure, used by the CLIs and the tests to tell errors apart
/// without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    PathNotFound,
    IndexOutOfRange,
    InvalidData,
    Io,
    Render,
}

/// Errors raised while loading, selecting, assembling or rendering a chart
#[derive(Debug, Error)]
pub enum PlotError {
    /// Rejected CLI input (output extension, non-csv source, index syntax)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} not found: {}", .path.display())]
    PathNotFound { what: &'static str, path: PathBuf },

    #[error("column index {index} out of range for a table with {columns} column(s)")]
    ColumnOutOfRange { index: usize, columns: usize },

    /// Row numbers are 0-based, row 0 being the header row
    #[error("row {row} has {found} field(s) but the header row has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-numeric value {value:?} in column {label:?} at row {row}")]
    NonNumeric {
        label: String,
        row: usize,
        value: String,
    },

    #[error("surface grid needs a legend row and column around at least 2x2 values, found {rows}x{columns} cells")]
    GridTooSmall { rows: usize, columns: usize },

    #[error("x column {label:?} mixes datetimes and numbers with the other series of the chart")]
    MixedXAxis { label: String },

    #[error("nothing to plot: {0}")]
    EmptyPlot(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse csv {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("rendering failed: {0}")]
    Render(String),
}

impl PlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PlotError::PathNotFound { .. } => ErrorKind::PathNotFound,
            PlotError::ColumnOutOfRange { .. } | PlotError::RaggedRow { .. } => {
                ErrorKind::IndexOutOfRange
            }
            PlotError::NonNumeric { .. }
            | PlotError::GridTooSmall { .. }
            | PlotError::MixedXAxis { .. }
            | PlotError::EmptyPlot(_) => ErrorKind::InvalidData,
            PlotError::Io { .. } | PlotError::Csv { .. } => ErrorKind::Io,
            PlotError::Render(_) => ErrorKind::Render,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
