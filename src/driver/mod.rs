//! Database driver boundary.
//!
//! The helper layer does not speak the MySQL wire protocol itself. It drives
//! an implementation of [`Driver`], which connects, dispatches statements and
//! hands back stored result sets whose rows are text cells.
//!
//! [`memory::MemoryDriver`] is a scripted in-process implementation.

pub mod connect;
pub mod constants;
pub mod memory;

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;
use crate::types::ColumnDescriptor;

pub use connect::ConnectParams;

/// One fetched row: text cells in column order, `None` for SQL NULL.
pub type TextRow = Vec<Option<Bytes>>;

/// A connection-level database driver.
///
/// Methods are called sequentially by one execution path at a time; errors
/// reported by the server should be returned as `Error::Driver`.
pub trait Driver: Send {
    /// Stored result set type.
    type ResultSet: ResultSet;

    /// Establish the connection.
    fn connect(&mut self, params: &ConnectParams) -> impl Future<Output = Result<()>> + Send;

    /// Dispatch one statement (query or command).
    fn query(&mut self, sql: &str) -> impl Future<Output = Result<()>> + Send;

    /// Rows affected by the last dispatched command.
    fn affected_rows(&self) -> u64;

    /// Transfer the result set of the last dispatched statement.
    ///
    /// Returns `Ok(None)` when the statement produced no result set.
    fn store_result(&mut self) -> impl Future<Output = Result<Option<Self::ResultSet>>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// A stored result set.
///
/// Driver-side resources are released when the value is dropped.
pub trait ResultSet {
    /// Column metadata in column order.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Row count reported by the driver.
    fn num_rows(&self) -> u64;

    /// Next row, or `None` when exhausted.
    fn fetch_row(&mut self) -> Option<TextRow>;
}
