//! Error types for the acmiview replay engine.
//!
//! Errors are split along the propagation policy of an import:
//! - [`ImportError`] aborts a whole import and is returned to the caller.
//! - [`RecordError`] describes a single skipped line and is collected into a report.
//! - [`GeoError`], [`ConfigError`] and [`IoError`] cover the remaining failure modes.
//!
//! All errors implement `std::error::Error` and are serializable for structured logging.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Result type alias using AcmiViewError as the error type.
pub type Result<T> = std::result::Result<T, AcmiViewError>;

/// Top-level error type for all acmiview operations.
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum AcmiViewError {
    /// Fatal import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Per-record errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Coordinate conversion errors
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

/// Errors that abort a whole import.
///
/// When one of these is returned no registry is produced, and a session keeps
/// whatever registry it held before the import started.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ImportError {
    /// The input had no non-empty line
    #[error("Input is empty")]
    EmptyInput,

    /// The first non-empty line does not declare a file type
    #[error("Missing FileType header, first line was '{line}'")]
    MissingFileType { line: String },

    /// The declared file type is not an ACMI family format
    #[error("Unsupported file type: {value}")]
    UnsupportedFileType { value: String },

    /// No ReferenceTime declaration before the first time frame
    #[error("Missing ReferenceTime declaration")]
    MissingReferenceTime,

    /// The ReferenceTime declaration could not be parsed
    #[error("Invalid ReferenceTime: {value}")]
    InvalidReferenceTime { value: String },

    /// The header was complete but no time frame followed
    #[error("No time frame found after header")]
    MissingDataSection,

    /// The import was cancelled by the caller
    #[error("Import cancelled at line {line_number}")]
    Cancelled { line_number: usize },
}

impl ImportError {
    /// Creates a missing file type error.
    pub fn missing_file_type(line: impl Into<String>) -> Self {
        Self::MissingFileType { line: line.into() }
    }

    /// Creates an unsupported file type error.
    pub fn unsupported_file_type(value: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            value: value.into(),
        }
    }

    /// Creates an invalid reference time error.
    pub fn invalid_reference_time(value: impl Into<String>) -> Self {
        Self::InvalidReferenceTime {
            value: value.into(),
        }
    }

    /// Returns true if the failure happened while reading the header.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            ImportError::MissingFileType { .. }
                | ImportError::UnsupportedFileType { .. }
                | ImportError::MissingReferenceTime
                | ImportError::InvalidReferenceTime { .. }
        )
    }
}

/// Errors that cause a single record line to be skipped.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RecordError {
    /// A time-frame line whose offset is not a finite number
    #[error("Malformed time frame: '{value}'")]
    MalformedFrame { value: String },

    /// A line that is neither a time frame nor an `id,key=value` entity line
    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// A `T=` attribute that could not be decoded
    #[error("Malformed position '{value}': {reason}")]
    MalformedPosition { value: String, reason: String },

    /// A decoded position that cannot be projected into the local frame
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),

    /// A sample that would precede the last sample already stored for its entity
    #[error("Sample at {time} precedes last sample at {previous}")]
    OutOfOrder { previous: String, time: String },
}

impl RecordError {
    /// Creates a malformed frame error.
    pub fn malformed_frame(value: impl Into<String>) -> Self {
        Self::MalformedFrame {
            value: value.into(),
        }
    }

    /// Creates a malformed record error.
    pub fn malformed_record(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Creates an out of order sample error.
    pub fn out_of_order(previous: impl ToString, time: impl ToString) -> Self {
        Self::OutOfOrder {
            previous: previous.to_string(),
            time: time.to_string(),
        }
    }

    /// Creates a malformed position error.
    pub fn malformed_position(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPosition {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the geodetic to local frame conversion.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GeoError {
    /// One of the inputs is NaN or infinite
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: String, value: f64 },

    /// Latitude is outside [-90, 90]
    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),
}

impl GeoError {
    /// Creates a non-finite input error.
    pub fn non_finite(field: impl Into<String>, value: f64) -> Self {
        Self::NonFinite {
            field: field.into(),
            value,
        }
    }
}

/// Errors related to configuration.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Wrapper for I/O errors to make them serializable.
#[derive(Debug, Error, Serialize, Deserialize)]
#[error("I/O error: {kind:?}: {message}")]
pub struct IoError {
    pub kind: IoErrorKind,
    pub message: String,
}

impl From<io::Error> for IoError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: err.kind().into(),
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for AcmiViewError {
    fn from(err: io::Error) -> Self {
        AcmiViewError::Io(err.into())
    }
}

/// Serializable subset of std::io::ErrorKind relevant for reading replay files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoErrorKind {
    NotFound,
    PermissionDenied,
    InvalidData,
    UnexpectedEof,
    Interrupted,
    Other,
}

impl From<io::ErrorKind> for IoErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => IoErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            io::ErrorKind::InvalidData => IoErrorKind::InvalidData,
            io::ErrorKind::UnexpectedEof => IoErrorKind::UnexpectedEof,
            io::ErrorKind::Interrupted => IoErrorKind::Interrupted,
            _ => IoErrorKind::Other,
        }
    }
}
