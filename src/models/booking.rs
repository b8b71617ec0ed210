use crate::models::{enum_column, json_column};
use crate::utils::validation::{validate_not_blank, validate_phone};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    pub booking_reference: String,
    /// `None` for guest bookings made through the public site.
    pub user_id: Option<i32>,
    pub bus_id: i32,
    pub route_id: i32,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub pickup_location: Option<String>,
    pub seat_numbers: Vec<i32>,
    pub travel_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for Booking {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Booking {
            id: row.try_get("id")?,
            booking_reference: row.try_get("booking_reference")?,
            user_id: row.try_get("user_id")?,
            bus_id: row.try_get("bus_id")?,
            route_id: row.try_get("route_id")?,
            passenger_name: row.try_get("passenger_name")?,
            passenger_email: row.try_get("passenger_email")?,
            passenger_phone: row.try_get("passenger_phone")?,
            pickup_location: row.try_get("pickup_location")?,
            seat_numbers: json_column(row, "seat_numbers")?,
            travel_date: row.try_get("travel_date")?,
            total_amount: row.try_get("total_amount")?,
            status: enum_column(row, "status")?,
            payment_status: enum_column(row, "payment_status")?,
            booking_date: row.try_get("booking_date")?,
            notes: row.try_get("notes")?,
        })
    }
}

/// Booking row joined with its bus and route, for listings.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub bus_number: String,
    pub from_location: String,
    pub to_location: String,
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for BookingDetail {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(BookingDetail {
            booking: Booking::from_row(row)?,
            bus_number: row.try_get("bus_number")?,
            from_location: row.try_get("from_location")?,
            to_location: row.try_get("to_location")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub bus_id: i32,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; only the day is kept.
    #[validate(custom(function = "validate_not_blank"))]
    pub travel_date: String,
    #[validate(length(min = 1, message = "At least one seat must be selected"))]
    pub seat_numbers: Vec<i32>,
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub passenger_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub passenger_email: String,
    #[validate(custom(function = "validate_phone"))]
    pub passenger_phone: String,
    #[validate(length(min = 1, max = 200))]
    pub pickup_location: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 500))]
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub bus_id: Option<i32>,
    pub travel_date: Option<NaiveDate>,
    /// Restricts the listing to one rider's bookings.
    pub user_id: Option<i32>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSeatsResponse {
    pub bus_id: i32,
    pub travel_date: NaiveDate,
    pub capacity: i32,
    pub booked_seats: Vec<i32>,
    pub available_seats: Vec<i32>,
}
