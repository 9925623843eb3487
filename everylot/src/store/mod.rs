//! SQLite storage for lot records.
//!
//! A run issues exactly two statements against the `lots` table: one
//! `SELECT` to load the lot and, once the post has gone out, one `UPDATE`
//! that stores the post identifier in the `tweeted` column. Both
//! auto-commit; nothing spans the read and the write.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use thiserror::Error;
use tracing::debug;

use crate::lot::{format_coordinate, Lot, LotSelector};

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or updating lots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No lot matched the selector.
    #[error("no lot found ({0})")]
    NotFound(LotSelector),

    /// A column holds a value that cannot be used.
    #[error("invalid value in column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Underlying SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SELECT_BY_ID: &str = "SELECT * FROM lots WHERE id = ?1 ORDER BY id ASC LIMIT 1";

const SELECT_NEXT_UNPOSTED: &str =
    "SELECT * FROM lots WHERE COALESCE(tweeted, 0) = 0 ORDER BY id ASC LIMIT 1";

const MARK_POSTED: &str = "UPDATE lots SET tweeted = ?1 WHERE id = ?2";

/// Handle on the lots database.
pub struct LotStore {
    conn: Connection,
}

impl LotStore {
    /// Opens the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened lots database");
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads the single lot matching `selector`.
    pub fn select(&self, selector: LotSelector) -> StoreResult<Lot> {
        let (sql, value) = match selector {
            LotSelector::ById(id) => (SELECT_BY_ID, Some(id)),
            LotSelector::NextUnposted => (SELECT_NEXT_UNPOSTED, None),
        };

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = match value {
            Some(id) => stmt.query(params![id])?,
            None => stmt.query([])?,
        };

        let row = rows.next()?.ok_or(StoreError::NotFound(selector))?;
        let lot = lot_from_row(row, &columns)?;
        debug!(lot_id = lot.id, %selector, "Selected lot");
        Ok(lot)
    }

    /// Records `post_id` as the publication of lot `lot_id`.
    pub fn mark_as_tweeted(&self, lot_id: i64, post_id: i64) -> StoreResult<()> {
        let changed = self.conn.execute(MARK_POSTED, params![post_id, lot_id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(LotSelector::ById(lot_id)));
        }
        debug!(lot_id, post_id, "Marked lot as posted");
        Ok(())
    }
}

/// Converts a `lots` row into a [`Lot`], column by column.
fn lot_from_row(row: &Row<'_>, columns: &[String]) -> StoreResult<Lot> {
    let mut lot = Lot::default();
    let mut has_id = false;

    for (index, column) in columns.iter().enumerate() {
        let value: Value = row.get(index)?;
        match column.as_str() {
            "id" => {
                lot.id = integer(&value).ok_or_else(|| StoreError::InvalidColumn {
                    column: column.clone(),
                    reason: format!("expected an integer, found {}", type_name(&value)),
                })?;
                has_id = true;
            }
            "address" => lot.address = text(&value),
            "city" => lot.city = text(&value),
            "state" => lot.state = text(&value),
            "zip" => lot.zip = text(&value),
            "lat" => lot.lat = real(&value),
            "lon" => lot.lon = real(&value),
            "geometry" => lot.geometry = blob(value),
            "floors" => lot.floors = real(&value),
            "tweeted" => lot.tweeted = integer(&value),
            _ => {
                if let Some(text) = text(&value) {
                    lot.extra.insert(column.clone(), text);
                }
            }
        }
    }

    if !has_id {
        return Err(StoreError::InvalidColumn {
            column: "id".to_string(),
            reason: "column missing from lots table".to_string(),
        });
    }

    Ok(lot)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(format_coordinate(*f)),
        Value::Null | Value::Blob(_) => None,
    }
}

fn real(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(f) => Some(*f),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn blob(value: Value) -> Option<Vec<u8>> {
    match value {
        Value::Blob(bytes) => Some(bytes),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Integer(_) => "INTEGER",
        Value::Real(_) => "REAL",
        Value::Text(_) => "TEXT",
        Value::Blob(_) => "BLOB",
    }
}
