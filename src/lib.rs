//! MySQL helper layer for Rust
//!
//! Executes queries and commands through a database driver and packs the
//! text rows of each result set into fixed-layout binary records: every
//! column occupies a fixed-width slot (4 bytes for INT, 8 for BIGINT, the
//! declared length for CHAR/VARCHAR, ...) and each row is one contiguous
//! block of `stride` bytes.
//!
//! # Example
//!
//! ```
//! use mysql_helper_rs::driver::constants::{MYSQL_TYPE_LONG, MYSQL_TYPE_VAR_STRING};
//! use mysql_helper_rs::driver::memory::{MemoryDriver, MemoryResponse};
//! use mysql_helper_rs::{Action, ColumnDescriptor, ConnectParams, Connection};
//!
//! # tokio_test::block_on(async {
//! let driver = MemoryDriver::builder()
//!     .with_response(
//!         "SELECT id, name FROM player",
//!         MemoryResponse::rows(
//!             vec![
//!                 ColumnDescriptor::new("id", MYSQL_TYPE_LONG, 11),
//!                 ColumnDescriptor::new("name", MYSQL_TYPE_VAR_STRING, 16),
//!             ],
//!             vec![vec![Some("1"), Some("alice")], vec![Some("2"), Some("bob")]],
//!         ),
//!     )
//!     .build();
//!
//! // Connect to the database
//! let mut conn = Connection::new(driver);
//! conn.connect(&ConnectParams::new("localhost", "game")).await?;
//!
//! let outcome = conn.execute(Action::Query, "SELECT id, name FROM player").await;
//! for row in &outcome.payload {
//!     println!("{} {}", row.get_i32(0)?, row.get_str(1)?);
//! }
//!
//! // Close connection
//! conn.close().await;
//! # Ok::<(), mysql_helper_rs::Error>(())
//! # }).unwrap();
//! ```

pub mod connection;
pub mod cursor;
pub mod decode;
pub mod driver;
pub mod error;
pub mod materialize;
pub mod types;

// Re-export main types
pub use connection::Connection;
pub use cursor::{Action, Cursor};
pub use driver::{ConnectParams, Driver, ResultSet, TextRow};
pub use error::{Error, Result};
pub use materialize::materialize;
pub use types::{
    ColumnDescriptor, FieldCaster, FieldType, Outcome, ResultPayload, ResultStatus, RowBuffer,
    RowLayout,
};
