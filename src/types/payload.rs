//! Result status and payload delivered for one execution.

use std::sync::Arc;

use crate::error::Error;

use super::layout::RowLayout;
use super::row::RowBuffer;

/// Terminal status of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStatus {
    /// Command or query completed.
    Success,
    /// Connection is not established; nothing was dispatched.
    NotConnected,
    /// A result column has a type that cannot be materialized.
    FailedToParseField,
    /// Rows could not be stored (allocation failure or row count mismatch).
    FailedToStoreDataset,
    /// The driver reported an error; see the payload error code.
    DriverError,
    /// Any other failure.
    UnknownError,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResultStatus::Success => "success",
            ResultStatus::NotConnected => "not connected",
            ResultStatus::FailedToParseField => "failed to parse field",
            ResultStatus::FailedToStoreDataset => "failed to store dataset",
            ResultStatus::DriverError => "driver error",
            ResultStatus::UnknownError => "unknown error",
        };
        f.write_str(name)
    }
}

/// Data returned by one execution.
#[derive(Debug, Clone, Default)]
pub struct ResultPayload {
    /// Driver error code (0 when the driver reported no error).
    pub error_code: u32,
    /// Driver error description, set only for driver-reported errors.
    pub error_desc: Option<String>,
    /// Affected rows for commands, dataset rows for queries.
    row_count: u64,
    /// Materialized rows in fetch order.
    pub rows: Vec<RowBuffer>,
    /// Layout of `rows` (queries only).
    pub layout: Option<Arc<RowLayout>>,
}

impl ResultPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows affected by an UPDATE / INSERT / DELETE command.
    pub fn affected_rows(&self) -> u64 {
        self.row_count
    }

    /// Rows in the result set of a query, as reported by the driver.
    pub fn dataset_rows(&self) -> u64 {
        self.row_count
    }

    /// Set the affected or dataset row count.
    pub fn set_row_count(&mut self, count: u64) {
        self.row_count = count;
    }

    /// Record a driver error.
    ///
    /// Driver errors keep their code and message; other errors are
    /// described with code 0.
    pub fn set_error(&mut self, err: &Error) {
        match err {
            Error::Driver { code, message } => {
                self.error_code = *code;
                self.error_desc = Some(message.clone());
            }
            other => {
                self.error_code = 0;
                self.error_desc = Some(other.to_string());
            }
        }
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were materialized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &RowBuffer> {
        self.rows.iter()
    }
}

impl IntoIterator for ResultPayload {
    type Item = RowBuffer;
    type IntoIter = std::vec::IntoIter<RowBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultPayload {
    type Item = &'a RowBuffer;
    type IntoIter = std::slice::Iter<'a, RowBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Status and payload of one execution.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: ResultStatus,
    pub payload: ResultPayload,
}

impl Outcome {
    pub fn new(status: ResultStatus, payload: ResultPayload) -> Self {
        Self { status, payload }
    }

    /// Check if the execution succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}
