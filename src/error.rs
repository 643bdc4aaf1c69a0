//! Error types for the MySQL helper layer.

use std::panic::Location;
use thiserror::Error;

/// Result type alias for helper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the MySQL helper layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the database driver.
    #[error("MySQL error {code}: {message}")]
    Driver { code: u32, message: String },

    /// Operation requires an established connection.
    #[error("Not connected")]
    NotConnected,

    /// `connect` called on a connection that is already established.
    #[error("Already connected")]
    AlreadyConnected,

    /// Connection attempt timed out.
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectionTimeout {
        host: String,
        port: u16,
        timeout: std::time::Duration,
    },

    /// Invalid connect string.
    #[error("Invalid connect string: {message}")]
    InvalidConnectString { message: String },

    /// Column type the row materializer cannot cast.
    #[error("Unsupported MySQL field type: {type_num}")]
    UnsupportedType { type_num: u8 },

    /// A text cell could not be converted to its binary form.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Destination slot does not match the caster width.
    #[error("Buffer too small: need {needed} bytes, have {available} filed at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Row storage could not be allocated.
    #[error("Failed to allocate {size} bytes of row storage")]
    Allocation { size: usize },

    /// Materialized row count differs from the count the driver reported.
    #[error("Stored {stored} rows, driver reported {reported}")]
    RowCountMismatch { stored: u64, reported: u64 },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },
}

impl Error {
    /// Create a driver-reported error.
    pub fn driver(code: u32, message: impl Into<String>) -> Self {
        Self::Driver {
            code,
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create a buffer-size error tagged with the caller location.
    #[track_caller]
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall {
            needed,
            available,
            location: Location::caller(),
        }
    }
}
