//! Error types for the overlay engine.
//!
//! Viewport, resize and edit-mode operations never fail: out-of-range input
//! is clamped. Errors only come from the visualizer input boundary and from
//! loading replay files.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for overlay processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Event outside the configured grid (E100)
    CellOutOfBounds = 100,
    /// Snapshot grid does not match the configured grid (E101)
    GridShapeMismatch = 101,
    /// Unparseable color value (E200)
    InvalidColor = 200,
}

/// Main error type for the overlay engine.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Cut event at ({row}, {column}) is outside the {rows}x{columns} grid")]
    CellOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Snapshot grid is {got_rows}x{got_columns}, expected {rows}x{columns}")]
    GridShapeMismatch {
        rows: usize,
        columns: usize,
        got_rows: usize,
        got_columns: usize,
    },

    #[error("Invalid color '{value}': expected #rrggbb or #rrggbbaa")]
    InvalidColor { value: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OverlayError::CellOutOfBounds { .. } => ErrorCode::CellOutOfBounds,
            OverlayError::GridShapeMismatch { .. } => ErrorCode::GridShapeMismatch,
            OverlayError::InvalidColor { .. } => ErrorCode::InvalidColor,
            OverlayError::FileNotFound { .. } => ErrorCode::FileNotFound,
            OverlayError::EmptyFile { .. } => ErrorCode::EmptyFile,
            OverlayError::Json { .. } => ErrorCode::ParseError,
            OverlayError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for overlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = OverlayError::CellOutOfBounds {
            row: 4,
            column: 0,
            rows: 3,
            columns: 4,
        };
        assert_eq!(err.code(), ErrorCode::CellOutOfBounds);
        assert_eq!(err.code_value(), 100);

        let err = OverlayError::EmptyFile {
            path: PathBuf::from("cuts.json"),
        };
        assert_eq!(err.code_value(), -2);
    }

    #[test]
    fn test_error_message_names_grid() {
        let err = OverlayError::CellOutOfBounds {
            row: 4,
            column: 1,
            rows: 3,
            columns: 4,
        };
        assert_eq!(
            err.to_string(),
            "Cut event at (4, 1) is outside the 3x4 grid"
        );
    }
}
