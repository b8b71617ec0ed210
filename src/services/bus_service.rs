use crate::db::is_unique_violation;
use crate::models::bus::{Bus, BusFilter, CreateBusRequest, UpdateBusRequest};
use crate::models::to_json_text;
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use validator::Validate;

const BUS_COLUMNS: &str = "id, bus_number, bus_type, capacity, amenities, is_active, route_id, created_at";

#[derive(Clone)]
pub struct BusService {
    pool: MySqlPool,
}

fn clean_amenities(amenities: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = amenities
        .into_iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    cleaned.sort();
    cleaned.dedup();
    cleaned
}

fn duplicate_bus_number(bus_number: &str) -> AppError {
    AppError::BadRequest(format!("Bus number {} already exists", bus_number))
}

impl BusService {
    pub fn new(pool: MySqlPool) -> Self {
        BusService { pool }
    }

    pub async fn list_buses(&self, filter: BusFilter) -> AppResult<Vec<Bus>> {
        let mut query = QueryBuilder::<MySql>::new(format!("SELECT {} FROM buses WHERE 1 = 1", BUS_COLUMNS));
        if let Some(route_id) = filter.route_id {
            query.push(" AND route_id = ").push_bind(route_id);
        }
        if let Some(bus_type) = filter.bus_type {
            query.push(" AND bus_type = ").push_bind(bus_type.to_string());
        }
        if filter.active_only {
            query.push(" AND is_active = TRUE");
        }
        query.push(" ORDER BY bus_number");

        let buses = query.build_query_as::<Bus>().fetch_all(&self.pool).await?;
        Ok(buses)
    }

    pub async fn get_bus(&self, bus_id: i32) -> AppResult<Bus> {
        sqlx::query_as::<_, Bus>(&format!("SELECT {} FROM buses WHERE id = ?", BUS_COLUMNS))
            .bind(bus_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus not found".into()))
    }

    async fn bus_number_taken(&self, bus_number: &str, except: Option<i32>) -> AppResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM buses WHERE bus_number = ? AND id <> ?")
            .bind(bus_number)
            .bind(except.unwrap_or(0))
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn ensure_route_exists(&self, route_id: i32) -> AppResult<()> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bus_routes WHERE id = ?")
            .bind(route_id)
            .fetch_one(&self.pool)
            .await?;
        if count == 0 {
            return Err(AppError::BadRequest(format!("Route {} does not exist", route_id)));
        }
        Ok(())
    }

    pub async fn create_bus(&self, request: CreateBusRequest) -> AppResult<Bus> {
        request.validate()?;
        let bus_number = request.bus_number.trim().to_uppercase();

        if self.bus_number_taken(&bus_number, None).await? {
            return Err(duplicate_bus_number(&bus_number));
        }
        if let Some(route_id) = request.route_id {
            self.ensure_route_exists(route_id).await?;
        }

        let result = sqlx::query(
            "INSERT INTO buses (bus_number, bus_type, capacity, amenities, is_active, route_id)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&bus_number)
        .bind(request.bus_type.to_string())
        .bind(request.capacity)
        .bind(to_json_text(&clean_amenities(request.amenities)))
        .bind(request.is_active.unwrap_or(true))
        .bind(request.route_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_bus_number(&bus_number)
            } else {
                e.into()
            }
        })?;

        let bus_id = result.last_insert_id() as i32;
        tracing::info!(bus_id, bus_number = %bus_number, capacity = request.capacity, "bus created");
        self.get_bus(bus_id).await
    }

    /// Highest seat number held by any upcoming booking on this bus.
    async fn highest_upcoming_seat(&self, bus_id: i32) -> AppResult<Option<i32>> {
        let (seat,): (Option<i32>,) = sqlx::query_as(
            "SELECT MAX(s.seat_number) FROM booking_seats s WHERE s.bus_id = ? AND s.travel_date >= ?",
        )
        .bind(bus_id)
        .bind(Utc::now().date_naive())
        .fetch_one(&self.pool)
        .await?;
        Ok(seat)
    }

    pub async fn update_bus(&self, bus_id: i32, request: UpdateBusRequest) -> AppResult<Bus> {
        request.validate()?;
        let mut bus = self.get_bus(bus_id).await?;

        if let Some(bus_number) = request.bus_number {
            let bus_number = bus_number.trim().to_uppercase();
            if bus_number != bus.bus_number && self.bus_number_taken(&bus_number, Some(bus_id)).await? {
                return Err(duplicate_bus_number(&bus_number));
            }
            bus.bus_number = bus_number;
        }
        if let Some(bus_type) = request.bus_type {
            bus.bus_type = bus_type;
        }
        if let Some(capacity) = request.capacity {
            if capacity < bus.capacity {
                if let Some(highest) = self.highest_upcoming_seat(bus_id).await? {
                    if highest > capacity {
                        return Err(AppError::BadRequest(format!(
                            "Cannot reduce capacity to {}: seat {} is booked on an upcoming trip",
                            capacity, highest
                        )));
                    }
                }
            }
            bus.capacity = capacity;
        }
        if let Some(amenities) = request.amenities {
            bus.amenities = clean_amenities(amenities);
        }
        if let Some(is_active) = request.is_active {
            bus.is_active = is_active;
        }
        if let Some(route_id) = request.route_id {
            self.ensure_route_exists(route_id).await?;
            bus.route_id = Some(route_id);
        }

        sqlx::query(
            "UPDATE buses
             SET bus_number = ?, bus_type = ?, capacity = ?, amenities = ?, is_active = ?, route_id = ?
             WHERE id = ?",
        )
        .bind(&bus.bus_number)
        .bind(bus.bus_type.to_string())
        .bind(bus.capacity)
        .bind(to_json_text(&bus.amenities))
        .bind(bus.is_active)
        .bind(bus.route_id)
        .bind(bus_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_bus_number(&bus.bus_number)
            } else {
                e.into()
            }
        })?;

        tracing::info!(bus_id, "bus updated");
        self.get_bus(bus_id).await
    }

    pub async fn delete_bus(&self, bus_id: i32) -> AppResult<()> {
        self.get_bus(bus_id).await?;

        let (upcoming,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings WHERE bus_id = ? AND status = 'confirmed' AND travel_date >= ?",
        )
        .bind(bus_id)
        .bind(Utc::now().date_naive())
        .fetch_one(&self.pool)
        .await?;
        if upcoming > 0 {
            return Err(AppError::BadRequest(format!(
                "Bus has {} upcoming confirmed booking(s)",
                upcoming
            )));
        }

        let (history,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE bus_id = ?")
            .bind(bus_id)
            .fetch_one(&self.pool)
            .await?;
        if history > 0 {
            return Err(AppError::BadRequest(
                "Bus has booking history; deactivate it instead".into(),
            ));
        }

        sqlx::query("DELETE FROM buses WHERE id = ?")
            .bind(bus_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(bus_id, "bus deleted");
        Ok(())
    }
}
