//! Error types for the dashboard library.
//!
//! Only a missing input file is an expected, user-facing failure; every other
//! variant wraps something that went wrong while reading or drawing and ends
//! the current render.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// One or both input files are absent from the data directory.
    #[error(
        "Error: make sure '{}' and '{}' exist in the same folder as the dashboard",
        .day.display(),
        .hour.display()
    )]
    MissingInput { day: PathBuf, hour: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A date control value that is not `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A category value that has no entry in the chart's fixed color mapping.
    #[error("'{label}' has no color in the {palette} palette")]
    UnmappedCategory {
        label: String,
        palette: &'static str,
    },

    #[error("chart drawing error: {0}")]
    Chart(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for DashboardError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        DashboardError::Chart(e.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
