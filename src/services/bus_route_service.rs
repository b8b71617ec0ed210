use crate::models::bus_route::{BusRoute, CreateRouteRequest, RouteFilter, UpdateRouteRequest};
use crate::models::to_json_text;
use crate::utils::error::{AppError, AppResult, FieldError};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use validator::Validate;

const ROUTE_COLUMNS: &str = "id, from_location, to_location, price, distance_km, duration_minutes, \
    pickup_locations, is_active, created_at";

#[derive(Clone)]
pub struct BusRouteService {
    pool: MySqlPool,
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::ValidationFailed(vec![FieldError {
            field: "price".into(),
            message: "Price must be greater than zero".into(),
        }]));
    }
    Ok(())
}

fn clean_pickups(pickups: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for pickup in pickups {
        let pickup = pickup.trim().to_string();
        if !pickup.is_empty() && !cleaned.iter().any(|p| p.eq_ignore_ascii_case(&pickup)) {
            cleaned.push(pickup);
        }
    }
    cleaned
}

impl BusRouteService {
    pub fn new(pool: MySqlPool) -> Self {
        BusRouteService { pool }
    }

    pub async fn list_routes(&self, filter: RouteFilter) -> AppResult<Vec<BusRoute>> {
        let mut query =
            QueryBuilder::<MySql>::new(format!("SELECT {} FROM bus_routes WHERE 1 = 1", ROUTE_COLUMNS));
        if let Some(from) = filter.from.filter(|f| !f.trim().is_empty()) {
            query
                .push(" AND from_location LIKE ")
                .push_bind(format!("%{}%", from.trim()));
        }
        if let Some(to) = filter.to.filter(|t| !t.trim().is_empty()) {
            query
                .push(" AND to_location LIKE ")
                .push_bind(format!("%{}%", to.trim()));
        }
        if filter.active_only {
            query.push(" AND is_active = TRUE");
        }
        query.push(" ORDER BY from_location, to_location");

        let routes = query.build_query_as::<BusRoute>().fetch_all(&self.pool).await?;
        Ok(routes)
    }

    pub async fn get_route(&self, route_id: i32) -> AppResult<BusRoute> {
        sqlx::query_as::<_, BusRoute>(&format!("SELECT {} FROM bus_routes WHERE id = ?", ROUTE_COLUMNS))
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".into()))
    }

    pub async fn create_route(&self, request: CreateRouteRequest) -> AppResult<BusRoute> {
        request.validate()?;
        check_price(request.price)?;

        let from = request.from_location.trim();
        let to = request.to_location.trim();
        if from.eq_ignore_ascii_case(to) {
            return Err(AppError::BadRequest("Origin and destination must differ".into()));
        }

        let pickups = clean_pickups(request.pickup_locations);
        let result = sqlx::query(
            "INSERT INTO bus_routes
             (from_location, to_location, price, distance_km, duration_minutes, pickup_locations, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(from)
        .bind(to)
        .bind(request.price)
        .bind(request.distance_km)
        .bind(request.duration_minutes)
        .bind(to_json_text(&pickups))
        .bind(request.is_active.unwrap_or(true))
        .execute(&self.pool)
        .await?;

        let route_id = result.last_insert_id() as i32;
        tracing::info!(route_id, from, to, "route created");
        self.get_route(route_id).await
    }

    pub async fn update_route(&self, route_id: i32, request: UpdateRouteRequest) -> AppResult<BusRoute> {
        request.validate()?;
        let mut route = self.get_route(route_id).await?;

        if let Some(from) = request.from_location {
            route.from_location = from.trim().to_string();
        }
        if let Some(to) = request.to_location {
            route.to_location = to.trim().to_string();
        }
        if let Some(price) = request.price {
            check_price(price)?;
            route.price = price;
        }
        if let Some(distance) = request.distance_km {
            route.distance_km = distance;
        }
        if let Some(duration) = request.duration_minutes {
            route.duration_minutes = duration;
        }
        if let Some(pickups) = request.pickup_locations {
            route.pickup_locations = clean_pickups(pickups);
        }
        if let Some(is_active) = request.is_active {
            route.is_active = is_active;
        }
        if route.from_location.eq_ignore_ascii_case(&route.to_location) {
            return Err(AppError::BadRequest("Origin and destination must differ".into()));
        }

        sqlx::query(
            "UPDATE bus_routes
             SET from_location = ?, to_location = ?, price = ?, distance_km = ?,
                 duration_minutes = ?, pickup_locations = ?, is_active = ?
             WHERE id = ?",
        )
        .bind(&route.from_location)
        .bind(&route.to_location)
        .bind(route.price)
        .bind(route.distance_km)
        .bind(route.duration_minutes)
        .bind(to_json_text(&route.pickup_locations))
        .bind(route.is_active)
        .bind(route_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(route_id, "route updated");
        self.get_route(route_id).await
    }

    pub async fn delete_route(&self, route_id: i32) -> AppResult<()> {
        self.get_route(route_id).await?;

        let (bus_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM buses WHERE route_id = ?")
            .bind(route_id)
            .fetch_one(&self.pool)
            .await?;
        if bus_count > 0 {
            return Err(AppError::BadRequest(format!(
                "Route is still assigned to {} bus(es)",
                bus_count
            )));
        }

        let (booking_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE route_id = ?")
            .bind(route_id)
            .fetch_one(&self.pool)
            .await?;
        if booking_count > 0 {
            return Err(AppError::BadRequest(
                "Route has bookings; deactivate it instead".into(),
            ));
        }

        sqlx::query("DELETE FROM bus_routes WHERE id = ?")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(route_id, "route deleted");
        Ok(())
    }
}
