use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
    pub completed_bookings: i64,
    pub total_revenue: Decimal,
    pub total_buses: i64,
    pub active_buses: i64,
    pub total_routes: i64,
    pub total_users: i64,
    pub pending_inquiries: i64,
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub route_id: i32,
    pub from_location: String,
    pub to_location: String,
    pub bookings: i64,
    pub revenue: Decimal,
}
