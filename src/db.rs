use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::dates::{Cursor, DEFAULT_CURSOR};
use crate::error::Result;
use crate::models::Order;
use crate::query::Query;

pub const DB_FILE: &str = "basket.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    order_id TEXT NOT NULL,
    order_date TEXT NOT NULL,
    grand_total REAL NOT NULL,
    message_id TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_orders_date ON orders(order_date);

CREATE TABLE IF NOT EXISTS scanned_messages (
    id INTEGER PRIMARY KEY,
    message_id TEXT NOT NULL,
    checksum TEXT NOT NULL UNIQUE,
    order_id TEXT,
    outcome TEXT NOT NULL,
    scanned_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const CURSOR_KEY: &str = "last_update";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn get_metadata(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |r| r.get(0))
        .optional()?;
    Ok(value)
}

pub fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

/// Stored sync watermark, or the default epoch when none has been saved.
pub fn load_cursor(conn: &Connection) -> Result<Cursor> {
    match get_metadata(conn, CURSOR_KEY)? {
        Some(raw) => Ok(Cursor::parse(&raw)?),
        None => Ok(Cursor::parse(DEFAULT_CURSOR)?),
    }
}

pub fn save_cursor(conn: &Connection, cursor: &Cursor) -> Result<()> {
    set_metadata(conn, CURSOR_KEY, &cursor.to_string())
}

pub fn insert_order(conn: &Connection, order: &Order, message_id: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO orders (order_id, order_date, grand_total, message_id) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![order.id, order.date, order.total, message_id],
    )?;
    let key = conn.last_insert_rowid();
    debug!(key, order_id = %order.id, "stored order");
    Ok(key)
}

pub fn is_scanned(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM scanned_messages WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}

pub fn record_scan(
    conn: &Connection,
    message_id: &str,
    checksum: &str,
    order_id: Option<&str>,
    outcome: &str,
) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO scanned_messages (message_id, checksum, order_id, outcome) \
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![message_id, checksum, order_id, outcome],
    )?;
    Ok(())
}

/// Run a range query and rebuild the orders it returns.
pub fn query_orders(conn: &Connection, query: &Query) -> Result<Vec<Order>> {
    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt
        .query_map(query.bind(), Order::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_orders(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM orders", [], |r| r.get(0))?)
}
