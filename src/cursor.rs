//! Statement execution.
//!
//! A `Cursor` runs one statement at a time on its connection and reports a
//! single terminal [`ResultStatus`] together with a [`ResultPayload`]:
//!
//! | Outcome | Status |
//! |---------|--------|
//! | connection not established | `NotConnected` |
//! | driver rejected the statement | `DriverError` |
//! | command executed | `Success` (affected rows) |
//! | query rows materialized | `Success` (rows, dataset rows) |
//! | unsupported column type | `FailedToParseField` |
//! | row storage failed | `FailedToStoreDataset` |
//! | query produced no result set | `UnknownError` |

use std::sync::Arc;

use crate::connection::Connection;
use crate::driver::{Driver, ResultSet};
use crate::materialize::materialize_with_layout;
use crate::types::{resolve_columns, Outcome, ResultPayload, ResultStatus, RowLayout};

/// Kind of statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Statement returning a result set (SELECT, SHOW, ...).
    Query,
    /// Statement returning an affected-row count (INSERT, UPDATE, DELETE, ...).
    Command,
}

/// Executes statements on a connection.
///
/// Holds a mutable reference to the connection, ensuring only one active
/// cursor per connection at a time.
///
/// # Example
///
/// ```
/// use mysql_helper_rs::driver::memory::{MemoryDriver, MemoryResponse};
/// use mysql_helper_rs::{Action, ConnectParams, Connection, ResultStatus};
///
/// # tokio_test::block_on(async {
/// let driver = MemoryDriver::builder()
///     .with_response("UPDATE player SET gold = 0", MemoryResponse::affected(3))
///     .build();
/// let mut conn = Connection::new(driver);
/// conn.connect(&ConnectParams::new("localhost", "game")).await.unwrap();
///
/// let mut cursor = conn.cursor();
/// let affected = cursor
///     .execute_with(Action::Command, "UPDATE player SET gold = 0", |status, payload| {
///         assert_eq!(status, ResultStatus::Success);
///         payload.affected_rows()
///     })
///     .await;
/// assert_eq!(affected, 3);
/// # });
/// ```
pub struct Cursor<'conn, D: Driver> {
    /// Mutable reference to connection.
    conn: &'conn mut Connection<D>,
}

impl<'conn, D: Driver> Cursor<'conn, D> {
    /// Create a cursor on a connection.
    ///
    /// This is called by `Connection::cursor()`.
    pub(crate) fn new(conn: &'conn mut Connection<D>) -> Self {
        Self { conn }
    }

    /// Get the connection this cursor executes on.
    pub fn connection(&self) -> &Connection<D> {
        self.conn
    }

    /// Execute a statement and return its status and payload.
    pub async fn execute(&mut self, action: Action, sql: &str) -> Outcome {
        let mut payload = ResultPayload::new();

        if !self.conn.is_connected() {
            return Outcome::new(ResultStatus::NotConnected, payload);
        }

        let driver = self.conn.driver_mut();
        tracing::debug!(?action, sql, "dispatching statement");

        if let Err(e) = driver.query(sql).await {
            tracing::debug!(error = %e, "statement failed");
            payload.set_error(&e);
            return Outcome::new(ResultStatus::DriverError, payload);
        }

        let status = match action {
            Action::Command => {
                payload.set_row_count(driver.affected_rows());
                ResultStatus::Success
            }
            Action::Query => store_dataset(driver, &mut payload).await,
        };

        tracing::debug!(%status, rows = payload.len(), "statement finished");
        Outcome::new(status, payload)
    }

    /// Execute a statement and hand the outcome to `handler`.
    ///
    /// The handler is called exactly once and takes ownership of the
    /// payload, rows included. Its return value is returned.
    pub async fn execute_with<H, T>(&mut self, action: Action, sql: &str, handler: H) -> T
    where
        H: FnOnce(ResultStatus, ResultPayload) -> T,
    {
        let Outcome { status, payload } = self.execute(action, sql).await;
        handler(status, payload)
    }

    /// Execute a statement without observing its outcome.
    ///
    /// Driver errors are written to the diagnostic log; every other outcome,
    /// including the rows of a query, is discarded.
    pub async fn execute_detached(&mut self, action: Action, sql: &str) {
        let outcome = self.execute(action, sql).await;
        if outcome.status == ResultStatus::DriverError && outcome.payload.error_code != 0 {
            tracing::error!(
                code = outcome.payload.error_code,
                desc = outcome.payload.error_desc.as_deref().unwrap_or(""),
                "mysql error"
            );
        }
    }
}

/// Store and materialize the result set of the last query.
///
/// The driver result set is released before this returns, on every path.
async fn store_dataset<D: Driver>(driver: &mut D, payload: &mut ResultPayload) -> ResultStatus {
    let mut result = match driver.store_result().await {
        Ok(Some(result)) => result,
        Ok(None) => {
            tracing::warn!("query produced no result set");
            return ResultStatus::UnknownError;
        }
        Err(e) => {
            payload.set_error(&e);
            return ResultStatus::DriverError;
        }
    };

    payload.set_row_count(result.num_rows());

    let casters = match resolve_columns(result.columns()) {
        Ok(casters) => casters,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse result columns");
            return ResultStatus::FailedToParseField;
        }
    };

    let layout = Arc::new(RowLayout::new(&casters));
    let stored = materialize_with_layout(&mut result, &casters, &layout);
    drop(result);

    match stored {
        Ok(rows) => {
            payload.rows = rows;
            payload.layout = Some(layout);
            ResultStatus::Success
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to store dataset");
            ResultStatus::FailedToStoreDataset
        }
    }
}
