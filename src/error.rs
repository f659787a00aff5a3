//! Typed errors for table I/O, validation and report writing.
//!
//! Every failure that is not "the physics diverged" ends up here, so callers
//! can tell a missing reference file apart from a tolerance violation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a channel table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be opened, read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected a record.
    #[error("malformed record in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A token in the data section is not a number.
    #[error("{path}:{line}: expected a number, found {token:?}")]
    Parse {
        path: PathBuf,
        line: u64,
        token: String,
    },

    /// A data row has a different width than the first data row.
    #[error("{path}:{line}: row has {found} fields, expected {expected}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A row pushed to a writer does not match the header width.
    #[error("row has {found} values, header declares {expected}")]
    RowWidth { expected: usize, found: usize },
}

/// Errors that prevent a validation from producing meaningful norms.
///
/// These are reported as failed checks, never as a pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Table(#[from] TableError),

    /// The table has no data rows.
    #[error("{0} contains no samples")]
    Empty(PathBuf),

    /// The table has a time column only.
    #[error("{0} contains no data columns besides time")]
    NoColumns(PathBuf),

    /// Simulation and reference tables have different widths.
    #[error("column count mismatch: simulation has {sim}, reference has {reference}")]
    ColumnMismatch { sim: usize, reference: usize },

    /// Simulation and reference tables have different lengths.
    #[error("row count mismatch: simulation has {sim}, reference has {reference}")]
    RowMismatch { sim: usize, reference: usize },

    /// Sample times differ at some row.
    #[error("time grids differ at row {row}: simulation t={sim}, reference t={reference}")]
    TimeMismatch { row: usize, sim: f64, reference: f64 },
}

/// Errors raised while finalizing a test report.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize report {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `run` was called on a recorder that already finalized its report.
    #[error("test {0} has already been run")]
    AlreadyRun(String),
}
