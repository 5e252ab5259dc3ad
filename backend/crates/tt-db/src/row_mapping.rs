use crate::{DbError, Result};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use error_location::ErrorLocation;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

#[track_caller]
fn decode_error(column: &'static str, message: String) -> DbError {
    DbError::Decode {
        column,
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}

pub(crate) fn uuid(row: &SqliteRow, column: &'static str) -> Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(column, format!("'{}': {}", raw, e)))
}

pub(crate) fn timestamp(row: &SqliteRow, column: &'static str) -> Result<DateTime<Utc>> {
    let secs: i64 = row.try_get(column)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| decode_error(column, format!("timestamp {} out of range", secs)))
}

pub(crate) fn opt_timestamp(row: &SqliteRow, column: &'static str) -> Result<Option<DateTime<Utc>>> {
    let secs: Option<i64> = row.try_get(column)?;
    secs.map(|s| {
        DateTime::from_timestamp(s, 0)
            .ok_or_else(|| decode_error(column, format!("timestamp {} out of range", s)))
    })
    .transpose()
}

pub(crate) fn date(row: &SqliteRow, column: &'static str) -> Result<NaiveDate> {
    let raw: String = row.try_get(column)?;
    NaiveDate::from_str(&raw).map_err(|e| decode_error(column, format!("'{}': {}", raw, e)))
}

pub(crate) fn decimal(row: &SqliteRow, column: &'static str) -> Result<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| decode_error(column, format!("'{}': {}", raw, e)))
}

pub(crate) fn opt_decimal(row: &SqliteRow, column: &'static str) -> Result<Option<Decimal>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|r| {
        Decimal::from_str(&r).map_err(|e| decode_error(column, format!("'{}': {}", r, e)))
    })
    .transpose()
}

/// Parse a text column through the model's own `FromStr`.
pub(crate) fn parsed<T>(row: &SqliteRow, column: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    T::from_str(&raw).map_err(|e| decode_error(column, e.to_string()))
}
