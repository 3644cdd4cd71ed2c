//! Extraction errors.

use thiserror::Error as ThisError;

/// The result type returned by ampmeas library functions.
pub type Result<T> = std::result::Result<T, Error>;

/// Possible extraction errors.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    /// An input table violated its shape or ordering requirements.
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),
    /// Too few sample points for the requested interpolation degree.
    #[error("degree {degree} interpolation requires at least {required} points, found {found}")]
    Interpolation {
        /// The requested polynomial degree.
        degree: usize,
        /// The minimum number of points for that degree.
        required: usize,
        /// The number of points actually supplied.
        found: usize,
    },
}

/// Shape and ordering violations in an input table.
///
/// These are permanent input defects: the caller must supply corrected
/// data, nothing is retried.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum MalformedInput {
    /// The table could not be parsed as delimited numeric rows.
    #[error("error parsing numeric table")]
    Parse,
    /// The table has fewer data rows than required.
    #[error("expected at least {required} data rows, found {found}")]
    TooFewRows {
        /// The minimum number of data rows.
        required: usize,
        /// The number of data rows found.
        found: usize,
    },
    /// A data row has fewer columns than required.
    #[error("expected at least {required} columns in data row {row}, found {found}")]
    TooFewColumns {
        /// The minimum number of columns.
        required: usize,
        /// The 0-indexed data row at fault.
        row: usize,
        /// The number of columns found.
        found: usize,
    },
    /// A swept frequency was zero or negative.
    #[error("frequency in data row {row} must be positive, found {value}")]
    NonPositiveFrequency {
        /// The 0-indexed data row at fault.
        row: usize,
        /// The offending frequency value.
        value: f64,
    },
    /// Swept frequencies were not strictly increasing.
    #[error("frequencies must be strictly increasing (violated at data row {row})")]
    NonMonotonicFrequency {
        /// The 0-indexed data row at fault.
        row: usize,
    },
}
