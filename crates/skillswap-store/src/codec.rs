//! Column conversions shared by the row mappers.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn uuid_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn timestamp_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn optional_timestamp_at(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_failure(idx, e))
    })
    .transpose()
}

pub(crate) fn json_list_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_failure(idx, e))
}

#[derive(Debug)]
struct UnknownVariant(String);

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown enum value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Decode a text column through one of the shared enums' `parse` functions.
pub(crate) fn enum_at<T>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_failure(idx, UnknownVariant(raw)))
}

/// Map "no rows" to [`crate::StoreError::NotFound`].
pub(crate) fn not_found(e: rusqlite::Error) -> crate::StoreError {
    match e {
        rusqlite::Error::QueryReturnedNoRows => crate::StoreError::NotFound,
        other => crate::StoreError::Sqlite(other),
    }
}
