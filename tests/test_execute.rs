//! Integration tests for query / command execution against the memory driver.

use mysql_helper_rs::driver::constants::*;
use mysql_helper_rs::driver::memory::{MemoryDriver, MemoryResponse, MemoryStats, ER_PARSE_ERROR};
use mysql_helper_rs::{Action, ColumnDescriptor, ConnectParams, Connection, ResultStatus};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

const SELECT_PLAYERS: &str = "SELECT id, name FROM player";

fn player_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("id", MYSQL_TYPE_LONG, 11),
        ColumnDescriptor::new("name", MYSQL_TYPE_STRING, 8),
    ]
}

fn players() -> MemoryResponse {
    MemoryResponse::rows(
        player_columns(),
        vec![
            vec![Some("42"), Some("hello")],
            vec![Some("7"), Some("world!!")],
        ],
    )
}

async fn connect(driver: MemoryDriver) -> (Connection<MemoryDriver>, Arc<MemoryStats>) {
    let stats = driver.stats();
    let mut conn = Connection::new(driver);
    conn.connect(&ConnectParams::new("localhost", "game"))
        .await
        .unwrap();
    (conn, stats)
}

#[tokio::test]
async fn test_query_packs_rows() {
    let driver = MemoryDriver::builder()
        .with_response(SELECT_PLAYERS, players())
        .build();
    let (mut conn, stats) = connect(driver).await;

    let outcome = conn.execute(Action::Query, SELECT_PLAYERS).await;
    assert_eq!(outcome.status, ResultStatus::Success);

    let payload = &outcome.payload;
    assert_eq!(payload.dataset_rows(), 2);
    assert_eq!(payload.len(), 2);
    assert_eq!(payload.layout.as_ref().unwrap().stride(), 12);

    let mut expected = 42i32.to_ne_bytes().to_vec();
    expected.extend_from_slice(b"hello\0\0\0");
    assert_eq!(payload.rows[0].as_bytes(), &expected[..]);

    let mut expected = 7i32.to_ne_bytes().to_vec();
    expected.extend_from_slice(b"world!!\0");
    assert_eq!(payload.rows[1].as_bytes(), &expected[..]);

    assert_eq!(payload.rows[1].get_i32(0).unwrap(), 7);
    assert_eq!(payload.rows[1].get_str(1).unwrap(), "world!!");
    assert_eq!(payload.error_code, 0);
    assert!(payload.error_desc.is_none());

    assert_eq!(stats.results_stored(), 1);
    assert_eq!(stats.results_released(), 1);
}

#[tokio::test]
async fn test_all_supported_widths() {
    let columns = vec![
        ColumnDescriptor::new("l", MYSQL_TYPE_LONG, 11),
        ColumnDescriptor::new("ll", MYSQL_TYPE_LONGLONG, 20),
        ColumnDescriptor::new("s", MYSQL_TYPE_SHORT, 6),
        ColumnDescriptor::new("t", MYSQL_TYPE_TINY, 4),
        ColumnDescriptor::new("c", MYSQL_TYPE_STRING, 3),
        ColumnDescriptor::new("v", MYSQL_TYPE_VAR_STRING, 5),
    ];
    let driver = MemoryDriver::builder()
        .with_response(
            "SELECT * FROM wide",
            MemoryResponse::rows(
                columns,
                vec![vec![
                    Some("-2"),
                    Some("12345678901"),
                    Some("-300"),
                    Some("-7"),
                    Some("abc"),
                    Some("xy"),
                ]],
            ),
        )
        .build();
    let (mut conn, _) = connect(driver).await;

    let outcome = conn.execute(Action::Query, "SELECT * FROM wide").await;
    assert!(outcome.is_success());

    let layout = outcome.payload.layout.as_ref().unwrap();
    let widths: Vec<usize> = layout.slots().iter().map(|s| s.width).collect();
    assert_eq!(widths, vec![4, 8, 2, 1, 3, 5]);
    assert_eq!(layout.stride(), 23);

    let row = &outcome.payload.rows[0];
    assert_eq!(row.get_i32(0).unwrap(), -2);
    assert_eq!(row.get_i64(1).unwrap(), 12_345_678_901);
    assert_eq!(row.get_i16(2).unwrap(), -300);
    assert_eq!(row.get_i8(3).unwrap(), -7);
    assert_eq!(row.get_str(4).unwrap(), "abc");
    assert_eq!(row.get(5).unwrap(), b"xy\0\0\0");
}

#[tokio::test]
async fn test_unparsable_cell_keeps_row() {
    let driver = MemoryDriver::builder()
        .with_response(
            SELECT_PLAYERS,
            MemoryResponse::rows(
                player_columns(),
                vec![vec![None, Some("ok")], vec![Some("5"), Some("too long!")]],
            ),
        )
        .build();
    let (mut conn, _) = connect(driver).await;

    let outcome = conn.execute(Action::Query, SELECT_PLAYERS).await;
    assert_eq!(outcome.status, ResultStatus::Success);
    assert_eq!(outcome.payload.len(), 2);

    let first = &outcome.payload.rows[0];
    assert_eq!(first.get(0).unwrap(), &[0, 0, 0, 0]);
    assert_eq!(first.get_str(1).unwrap(), "ok");
    assert_eq!(first.unconverted_columns(), &[0]);

    let second = &outcome.payload.rows[1];
    assert_eq!(second.get_i32(0).unwrap(), 5);
    assert_eq!(second.get(1).unwrap(), &[0u8; 8]);
    assert_eq!(second.unconverted_columns(), &[1]);
}

#[tokio::test]
async fn test_row_count_mismatch_fails_store() {
    let driver = MemoryDriver::builder()
        .with_response(SELECT_PLAYERS, players().with_reported_rows(5))
        .build();
    let (mut conn, stats) = connect(driver).await;

    let outcome = conn.execute(Action::Query, SELECT_PLAYERS).await;
    assert_eq!(outcome.status, ResultStatus::FailedToStoreDataset);
    assert_eq!(outcome.payload.dataset_rows(), 5);
    assert!(outcome.payload.rows.is_empty());
    assert_eq!(stats.results_released(), 1);
}

#[tokio::test]
async fn test_unsupported_type_fails_parse() {
    let driver = MemoryDriver::builder()
        .with_response(
            "SELECT created_at FROM player",
            MemoryResponse::rows(
                vec![ColumnDescriptor::new("created_at", MYSQL_TYPE_DATETIME, 19)],
                vec![vec![Some("2024-01-01 00:00:00")]],
            ),
        )
        .build();
    let (mut conn, stats) = connect(driver).await;

    let outcome = conn
        .execute(Action::Query, "SELECT created_at FROM player")
        .await;
    assert_eq!(outcome.status, ResultStatus::FailedToParseField);
    assert!(outcome.payload.rows.is_empty());
    assert!(outcome.payload.layout.is_none());
    assert_eq!(stats.results_stored(), 1);
    assert_eq!(stats.results_released(), 1);
}

#[tokio::test]
async fn test_empty_result_set() {
    let driver = MemoryDriver::builder()
        .with_response(
            SELECT_PLAYERS,
            MemoryResponse::rows(player_columns(), vec![]),
        )
        .build();
    let (mut conn, _) = connect(driver).await;

    let outcome = conn.execute(Action::Query, SELECT_PLAYERS).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.payload.dataset_rows(), 0);
    assert!(outcome.payload.is_empty());
}

#[tokio::test]
async fn test_command_reports_affected_rows() {
    let driver = MemoryDriver::builder()
        .with_response(
            "UPDATE player SET gold = gold + 1",
            MemoryResponse::affected(12),
        )
        .build();
    let (mut conn, stats) = connect(driver).await;

    let outcome = conn
        .execute(Action::Command, "UPDATE player SET gold = gold + 1")
        .await;
    assert_eq!(outcome.status, ResultStatus::Success);
    assert_eq!(outcome.payload.affected_rows(), 12);
    assert!(outcome.payload.rows.is_empty());
    assert_eq!(stats.results_stored(), 0);
}

#[tokio::test]
async fn test_driver_error_is_captured() {
    let driver = MemoryDriver::builder()
        .with_response(
            "SELECT * FROM nope",
            MemoryResponse::error(1146, "Table 'game.nope' doesn't exist"),
        )
        .build();
    let (mut conn, _) = connect(driver).await;

    let outcome = conn.execute(Action::Query, "SELECT * FROM nope").await;
    assert_eq!(outcome.status, ResultStatus::DriverError);
    assert_eq!(outcome.payload.error_code, 1146);
    assert_eq!(
        outcome.payload.error_desc.as_deref(),
        Some("Table 'game.nope' doesn't exist")
    );

    let outcome = conn.execute(Action::Command, "DROP TABEL x").await;
    assert_eq!(outcome.status, ResultStatus::DriverError);
    assert_eq!(outcome.payload.error_code, ER_PARSE_ERROR);
}

#[tokio::test]
async fn test_handler_called_exactly_once() {
    let driver = MemoryDriver::builder()
        .with_response(SELECT_PLAYERS, players())
        .build();
    let (mut conn, _) = connect(driver).await;

    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let rows = conn
        .cursor()
        .execute_with(Action::Query, SELECT_PLAYERS, move |status, payload| {
            seen.lock().unwrap().push(status);
            payload.rows
        })
        .await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_i32(0).unwrap(), 42);
    assert_eq!(*calls.lock().unwrap(), vec![ResultStatus::Success]);
}

/// Log sink collecting formatted events in memory.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_detached_execution_logs_driver_errors_only() {
    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let driver = MemoryDriver::builder()
        .with_response("DELETE FROM session", MemoryResponse::affected(3))
        .with_response("DELETE FROM nope", MemoryResponse::error(1146, "no table"))
        .build();
    let (mut conn, stats) = connect(driver).await;

    let mut cursor = conn.cursor();
    cursor
        .execute_detached(Action::Command, "DELETE FROM session")
        .await;
    assert!(log.contents().is_empty(), "{}", log.contents());

    cursor
        .execute_detached(Action::Command, "DELETE FROM nope")
        .await;
    let logged = log.contents();
    assert!(logged.contains("ERROR"), "{}", logged);
    assert!(logged.contains("mysql error"), "{}", logged);
    assert!(logged.contains("code=1146"), "{}", logged);
    assert!(logged.contains("no table"), "{}", logged);
    assert_eq!(logged.lines().count(), 1);

    assert_eq!(stats.statements(), 2);
}

#[tokio::test]
async fn test_not_connected_after_close() {
    let driver = MemoryDriver::builder()
        .with_response(SELECT_PLAYERS, players())
        .build();
    let (mut conn, stats) = connect(driver).await;

    conn.close().await;
    let outcome = conn.execute(Action::Query, SELECT_PLAYERS).await;
    assert_eq!(outcome.status, ResultStatus::NotConnected);
    assert!(outcome.payload.rows.is_empty());
    assert_eq!(stats.statements(), 0);
}
