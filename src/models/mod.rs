pub mod booking;
pub mod bus;
pub mod bus_route;
pub mod dashboard;
pub mod feedback;
pub mod user;

use serde::de::DeserializeOwned;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use std::str::FromStr;

// Enum columns are stored as their snake_case names
pub(crate) fn enum_column<T>(row: &MySqlRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

// List columns are stored as JSON text
pub(crate) fn json_column<T: DeserializeOwned>(row: &MySqlRow, column: &str) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}
