use crate::models::booking::BookingDetail;
use crate::models::dashboard::{DashboardStats, RouteStats};
use crate::services::dashboard_service::DashboardService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Dashboard")]
#[get("/dashboard/stats")]
pub async fn stats(
    auth: AuthenticatedUser,
    dashboard_service: &State<DashboardService>,
) -> Result<JsonResponse<DashboardStats>, AppError> {
    auth.require(Permission::DashboardRead)?;
    let stats = dashboard_service.stats().await?;
    Ok(ApiResponse::ok("Dashboard statistics", stats))
}

/// Latest bookings, newest first. `limit` defaults to 10.
#[openapi(tag = "Dashboard")]
#[get("/dashboard/recent-bookings?<limit>")]
pub async fn recent_bookings(
    limit: Option<i64>,
    auth: AuthenticatedUser,
    dashboard_service: &State<DashboardService>,
) -> Result<JsonResponse<Vec<BookingDetail>>, AppError> {
    auth.require(Permission::DashboardRead)?;
    let bookings = dashboard_service
        .recent_bookings(limit.unwrap_or(10))
        .await?;
    Ok(ApiResponse::ok(format!("{} booking(s)", bookings.len()), bookings))
}

#[openapi(tag = "Dashboard")]
#[get("/dashboard/route-stats")]
pub async fn route_stats(
    auth: AuthenticatedUser,
    dashboard_service: &State<DashboardService>,
) -> Result<JsonResponse<Vec<RouteStats>>, AppError> {
    auth.require(Permission::DashboardRead)?;
    let stats = dashboard_service.route_stats().await?;
    Ok(ApiResponse::ok(format!("{} route(s)", stats.len()), stats))
}
