use crate::models::{enum_column, json_column};
use crate::utils::validation::validate_not_blank;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BusType {
    Luxury,
    SemiLuxury,
    Normal,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: i32,
    pub bus_number: String,
    pub bus_type: BusType,
    pub capacity: i32,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub route_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for Bus {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Bus {
            id: row.try_get("id")?,
            bus_number: row.try_get("bus_number")?,
            bus_type: enum_column(row, "bus_type")?,
            capacity: row.try_get("capacity")?,
            amenities: json_column(row, "amenities")?,
            is_active: row.try_get("is_active")?,
            route_id: row.try_get("route_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 20))]
    pub bus_number: String,
    pub bus_type: BusType,
    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub is_active: Option<bool>,
    pub route_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusRequest {
    #[validate(length(min = 1, max = 20))]
    pub bus_number: Option<String>,
    pub bus_type: Option<BusType>,
    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub route_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct BusFilter {
    pub route_id: Option<i32>,
    pub bus_type: Option<BusType>,
    pub active_only: bool,
}
