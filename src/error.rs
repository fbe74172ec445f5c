//! Error types for loading case data and validating constraint sets.
//!
//! Malformed rows are never errors: the normalizer drops them and only
//! reports how many were skipped. The enums here cover the two conditions
//! that do reach the caller:
//!
//! - [`LoadError`]: the data source itself could not be read.
//! - [`EngineError`]: a constraint set referenced something outside the
//!   dataset's domains. Recoverable; the caller is expected to re-prompt.

use chrono::NaiveDate;
use thiserror::Error;

/// Fatal conditions while reading the raw data source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to decode header row with encoding {0}")]
    HeaderEncoding(&'static str),

    #[error("Required column '{0}' not found in header row")]
    MissingColumn(&'static str),
}

/// A constraint set that cannot be evaluated against the dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid constraint: status '{0}' does not occur in the dataset")]
    UnknownStatus(String),

    #[error("Invalid constraint: region '{0}' does not occur in the dataset")]
    UnknownRegion(String),

    #[error("Invalid constraint: province '{province}' is not selectable under {region}")]
    UnknownProvince { province: String, region: String },

    #[error("Invalid constraint: start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error(
        "Invalid constraint: date range {start}..={end} lies outside the dataset bounds {bounds}"
    )]
    DateRangeOutOfBounds {
        start: NaiveDate,
        end: NaiveDate,
        bounds: String,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
