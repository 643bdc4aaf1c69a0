//! Scripted in-memory driver.
//!
//! `MemoryDriver` answers statements from a table of canned responses keyed
//! by the exact SQL text. It is used by the test suite and by applications
//! that want to exercise the helper layer without a server.
//!
//! ## Example
//!
//! ```
//! use mysql_helper_rs::driver::constants::MYSQL_TYPE_LONG;
//! use mysql_helper_rs::driver::memory::{MemoryDriver, MemoryResponse};
//! use mysql_helper_rs::{Action, ColumnDescriptor, ConnectParams, Connection};
//!
//! # tokio_test::block_on(async {
//! let driver = MemoryDriver::builder()
//!     .with_response(
//!         "SELECT 1",
//!         MemoryResponse::rows(
//!             vec![ColumnDescriptor::new("1", MYSQL_TYPE_LONG, 1)],
//!             vec![vec![Some("1")]],
//!         ),
//!     )
//!     .build();
//!
//! let mut conn = Connection::new(driver);
//! conn.connect(&ConnectParams::new("localhost", "test")).await.unwrap();
//!
//! let outcome = conn.execute(Action::Query, "SELECT 1").await;
//! assert!(outcome.is_success());
//! assert_eq!(outcome.payload.rows[0].get_i32(0).unwrap(), 1);
//! # });
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::ColumnDescriptor;

use super::{ConnectParams, Driver, ResultSet, TextRow};

// Client / server error numbers used by the scripted responses.
pub const ER_ACCESS_DENIED_ERROR: u32 = 1045;
pub const ER_PARSE_ERROR: u32 = 1064;
pub const CR_CONN_HOST_ERROR: u32 = 2003;
pub const CR_SERVER_GONE_ERROR: u32 = 2006;

/// Canned response for one statement.
#[derive(Debug, Clone)]
pub enum MemoryResponse {
    /// Result set with columns and rows.
    Rows {
        /// Column metadata.
        columns: Vec<ColumnDescriptor>,
        /// Row data.
        rows: Vec<TextRow>,
        /// Row count reported by the result set; defaults to `rows.len()`.
        reported_rows: Option<u64>,
    },
    /// Command without a result set.
    Affected(u64),
    /// Driver error.
    Error {
        /// Error number.
        code: u32,
        /// Error message.
        message: String,
    },
}

impl MemoryResponse {
    /// Result set from string cells.
    pub fn rows(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<Option<&str>>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|s| Bytes::copy_from_slice(s.as_bytes())))
                    .collect()
            })
            .collect();
        Self::Rows {
            columns,
            rows,
            reported_rows: None,
        }
    }

    /// Command response with an affected-row count.
    pub fn affected(count: u64) -> Self {
        Self::Affected(count)
    }

    /// Driver error response.
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    /// Override the row count the result set reports.
    ///
    /// Has no effect on non-row responses.
    pub fn with_reported_rows(mut self, count: u64) -> Self {
        if let Self::Rows { reported_rows, .. } = &mut self {
            *reported_rows = Some(count);
        }
        self
    }
}

/// Counters shared between a driver and its result sets.
#[derive(Debug, Default)]
pub struct MemoryStats {
    connects: AtomicUsize,
    statements: AtomicUsize,
    results_stored: AtomicUsize,
    results_released: AtomicUsize,
    closes: AtomicUsize,
}

impl MemoryStats {
    /// Successful connects.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Statements dispatched through `query`.
    pub fn statements(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }

    /// Result sets handed out by `store_result`.
    pub fn results_stored(&self) -> usize {
        self.results_stored.load(Ordering::SeqCst)
    }

    /// Result sets dropped.
    pub fn results_released(&self) -> usize {
        self.results_released.load(Ordering::SeqCst)
    }

    /// Calls to `close`.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Builder for [`MemoryDriver`].
#[derive(Debug, Default)]
pub struct MemoryDriverBuilder {
    responses: HashMap<String, MemoryResponse>,
    refuse: Option<String>,
    credentials: Option<(String, String)>,
    connect_delay: Option<Duration>,
}

impl MemoryDriverBuilder {
    /// Register the response for an exact SQL text.
    pub fn with_response(mut self, sql: impl Into<String>, response: MemoryResponse) -> Self {
        self.responses.insert(sql.into(), response);
        self
    }

    /// Refuse every connection attempt with the given message.
    pub fn refuse_connections(mut self, message: impl Into<String>) -> Self {
        self.refuse = Some(message.into());
        self
    }

    /// Only accept logins with these credentials.
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    /// Delay every connection attempt.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Build the driver.
    pub fn build(self) -> MemoryDriver {
        MemoryDriver {
            responses: self.responses,
            refuse: self.refuse,
            credentials: self.credentials,
            connect_delay: self.connect_delay,
            connected: false,
            pending: None,
            affected_rows: 0,
            stats: Arc::new(MemoryStats::default()),
        }
    }
}

/// Scripted in-memory driver.
#[derive(Debug)]
pub struct MemoryDriver {
    responses: HashMap<String, MemoryResponse>,
    refuse: Option<String>,
    credentials: Option<(String, String)>,
    connect_delay: Option<Duration>,
    connected: bool,
    /// Result set of the last statement, until stored.
    pending: Option<MemoryResultSet>,
    affected_rows: u64,
    stats: Arc<MemoryStats>,
}

impl MemoryDriver {
    /// Create a builder.
    pub fn builder() -> MemoryDriverBuilder {
        MemoryDriverBuilder::default()
    }

    /// Shared counters; stays valid after the driver moves into a connection.
    pub fn stats(&self) -> Arc<MemoryStats> {
        Arc::clone(&self.stats)
    }
}

impl Driver for MemoryDriver {
    type ResultSet = MemoryResultSet;

    async fn connect(&mut self, params: &ConnectParams) -> Result<()> {
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.refuse {
            return Err(Error::driver(
                CR_CONN_HOST_ERROR,
                format!(
                    "Can't connect to MySQL server on '{}:{}' ({})",
                    params.host, params.port, message
                ),
            ));
        }

        if let Some((user, password)) = &self.credentials {
            if *user != params.user || *password != params.password {
                return Err(Error::driver(
                    ER_ACCESS_DENIED_ERROR,
                    format!("Access denied for user '{}'@'{}'", params.user, params.host),
                ));
            }
        }

        self.connected = true;
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&mut self, sql: &str) -> Result<()> {
        if !self.connected {
            return Err(Error::driver(CR_SERVER_GONE_ERROR, "MySQL server has gone away"));
        }

        self.stats.statements.fetch_add(1, Ordering::SeqCst);
        // An unconsumed result set from the previous statement is discarded here.
        self.pending = None;
        self.affected_rows = 0;

        match self.responses.get(sql) {
            Some(MemoryResponse::Rows {
                columns,
                rows,
                reported_rows,
            }) => {
                self.pending = Some(MemoryResultSet {
                    columns: columns.clone(),
                    reported_rows: reported_rows.unwrap_or(rows.len() as u64),
                    rows: rows.iter().cloned().collect(),
                    stats: None,
                });
                Ok(())
            }
            Some(MemoryResponse::Affected(count)) => {
                self.affected_rows = *count;
                Ok(())
            }
            Some(MemoryResponse::Error { code, message }) => {
                Err(Error::driver(*code, message.clone()))
            }
            None => Err(Error::driver(
                ER_PARSE_ERROR,
                format!("You have an error in your SQL syntax near '{}'", sql),
            )),
        }
    }

    fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    async fn store_result(&mut self) -> Result<Option<MemoryResultSet>> {
        Ok(self.pending.take().map(|mut result| {
            self.stats.results_stored.fetch_add(1, Ordering::SeqCst);
            result.stats = Some(Arc::clone(&self.stats));
            result
        }))
    }

    async fn close(&mut self) {
        self.connected = false;
        self.pending = None;
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Result set handed out by [`MemoryDriver`].
#[derive(Debug)]
pub struct MemoryResultSet {
    columns: Vec<ColumnDescriptor>,
    rows: VecDeque<TextRow>,
    reported_rows: u64,
    /// Set once the result set is handed to the caller.
    stats: Option<Arc<MemoryStats>>,
}

impl MemoryResultSet {
    /// Build a standalone result set.
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<TextRow>) -> Self {
        Self {
            columns,
            reported_rows: rows.len() as u64,
            rows: rows.into(),
            stats: None,
        }
    }
}

impl ResultSet for MemoryResultSet {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn num_rows(&self) -> u64 {
        self.reported_rows
    }

    fn fetch_row(&mut self) -> Option<TextRow> {
        self.rows.pop_front()
    }
}

impl Drop for MemoryResultSet {
    fn drop(&mut self) {
        if let Some(stats) = &self.stats {
            stats.results_released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
