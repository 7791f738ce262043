//! Error types for rootstat.

use thiserror::Error;

/// Main error type for rootstat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error opening or navigating a ROOT file
    #[error("ROOT file error: {0}")]
    Root(#[from] RootError),

    /// Error reading a single branch
    #[error("Branch error: {0}")]
    Field(#[from] FieldError),

    /// Error during aggregation query execution
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Error rendering a figure
    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to opening a ROOT file and locating a tree.
#[derive(Error, Debug)]
pub enum RootError {
    /// File could not be opened or decoded
    #[error("cannot open {path}: {reason}")]
    Open { path: String, reason: String },

    /// Named tree does not exist in the file
    #[error("tree not found: {tree}")]
    TreeNotFound { tree: String },
}

/// Recoverable per-branch errors.
///
/// These never abort an aggregation pass: the offending branch is logged
/// and skipped, and processing continues with the remaining branches.
#[derive(Error, Debug)]
pub enum FieldError {
    /// Branch exists but its metadata could not be read
    #[error("{field}: metadata unavailable: {reason}")]
    Metadata { field: String, reason: String },

    /// Branch values could not be decoded
    #[error("{field}: cannot read values: {reason}")]
    Values { field: String, reason: String },

    /// Branch name not present in the container
    #[error("unknown branch: {field}")]
    UnknownField { field: String },
}

/// Errors related to the aggregation query layer.
#[derive(Error, Debug)]
pub enum QueryError {
    /// DataFusion error
    #[error("query execution error: {0}")]
    Execution(String),

    /// Arrow error
    #[error("arrow error: {0}")]
    Arrow(String),

    /// A result batch was missing an expected column or had a wrong type
    #[error("unexpected result shape: {0}")]
    ResultShape(String),
}

impl From<datafusion::error::DataFusionError> for QueryError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        QueryError::Execution(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QueryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QueryError::Arrow(err.to_string())
    }
}

/// Errors that can occur during figure generation.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
