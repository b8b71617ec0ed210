use crate::models::json_column;
use crate::utils::validation::validate_not_blank;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusRoute {
    pub id: i32,
    pub from_location: String,
    pub to_location: String,
    pub price: Decimal,
    pub distance_km: i32,
    pub duration_minutes: i32,
    pub pickup_locations: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl BusRoute {
    /// Routes without a configured pickup list accept any pickup point.
    pub fn accepts_pickup(&self, pickup: &str) -> bool {
        self.pickup_locations.is_empty()
            || self
                .pickup_locations
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(pickup.trim()))
    }
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for BusRoute {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(BusRoute {
            id: row.try_get("id")?,
            from_location: row.try_get("from_location")?,
            to_location: row.try_get("to_location")?,
            price: row.try_get("price")?,
            distance_km: row.try_get("distance_km")?,
            duration_minutes: row.try_get("duration_minutes")?,
            pickup_locations: json_column(row, "pickup_locations")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub from_location: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub to_location: String,
    pub price: Decimal,
    #[validate(range(min = 1, message = "Distance must be positive"))]
    pub distance_km: i32,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_minutes: i32,
    #[serde(default)]
    pub pickup_locations: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub from_location: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub to_location: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "Distance must be positive"))]
    pub distance_km: Option<i32>,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_minutes: Option<i32>,
    pub pickup_locations: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    pub active_only: bool,
}
