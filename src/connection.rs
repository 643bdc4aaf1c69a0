//! Connection handle owning the driver and its connected state.

use tokio::time::timeout;

use crate::cursor::{Action, Cursor};
use crate::driver::{ConnectParams, Driver};
use crate::error::{Error, Result};
use crate::types::Outcome;

/// A database connection.
///
/// Owns the driver exclusively; executions borrow the connection mutably, so
/// only one statement can be in flight per connection. Share work across
/// tasks by giving each task its own connection.
pub struct Connection<D: Driver> {
    /// Underlying driver.
    driver: D,
    /// Whether `connect` succeeded and `close` has not been called since.
    connected: bool,
}

impl<D: Driver> Connection<D> {
    /// Wrap a driver in a disconnected handle.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            connected: false,
        }
    }

    /// Connect to the database.
    ///
    /// Connecting an already connected handle is a caller bug and returns
    /// `Error::AlreadyConnected` without touching the existing session.
    ///
    /// # Example
    ///
    /// ```
    /// use mysql_helper_rs::driver::memory::MemoryDriver;
    /// use mysql_helper_rs::{ConnectParams, Connection};
    ///
    /// # tokio_test::block_on(async {
    /// let mut conn = Connection::new(MemoryDriver::builder().build());
    /// let params = ConnectParams::parse("app:secret@localhost:3306/game?charset=utf8").unwrap();
    /// conn.connect(&params).await.unwrap();
    /// assert!(conn.is_connected());
    /// # });
    /// ```
    pub async fn connect(&mut self, params: &ConnectParams) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }

        tracing::debug!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            charset = %params.charset,
            flags = params.client_flags(),
            "connecting"
        );

        match timeout(params.connect_timeout, self.driver.connect(params)).await {
            Ok(Ok(())) => {
                self.connected = true;
                tracing::info!(host = %params.host, port = params.port, "connected");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(
                    host = %params.host,
                    port = params.port,
                    error = %e,
                    "failed to connect"
                );
                Err(e)
            }
            Err(_) => {
                tracing::error!(host = %params.host, port = params.port, "connect timed out");
                Err(Error::ConnectionTimeout {
                    host: params.host.clone(),
                    port: params.port,
                    timeout: params.connect_timeout,
                })
            }
        }
    }

    /// Close the connection. Closing a closed connection does nothing.
    pub async fn close(&mut self) {
        if self.connected {
            self.connected = false;
            self.driver.close().await;
            tracing::debug!("connection closed");
        }
    }

    /// Check if the connection is established.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Open a cursor for executing statements.
    pub fn cursor(&mut self) -> Cursor<'_, D> {
        Cursor::new(self)
    }

    /// Execute one statement on a fresh cursor.
    pub async fn execute(&mut self, action: Action, sql: &str) -> Outcome {
        self.cursor().execute(action, sql).await
    }

    /// Get the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the driver for dispatching statements.
    pub(crate) fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
