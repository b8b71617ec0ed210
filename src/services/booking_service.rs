use crate::db::is_unique_violation;
use crate::models::booking::{
    AvailableSeatsResponse, Booking, BookingDetail, BookingFilter, BookingStatus,
    CreateBookingRequest, PaymentStatus, RefundRequest,
};
use crate::models::bus::Bus;
use crate::models::bus_route::BusRoute;
use crate::models::to_json_text;
use crate::utils::error::{AppError, AppResult, FieldError};
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::refund_policy::{check_refund_eligibility, refund_note};
use crate::utils::seat_allocation::{
    available_seats, booked_seats, check_requested_seats, parse_travel_date,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

const BOOKING_COLUMNS: &str = "b.id, b.booking_reference, b.user_id, b.bus_id, b.route_id, \
    b.passenger_name, b.passenger_email, b.passenger_phone, b.pickup_location, b.seat_numbers, \
    b.travel_date, b.total_amount, b.status, b.payment_status, b.booking_date, b.notes";

/// Where a booking request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingChannel {
    /// Signed-in rider or staff member.
    Account { user_id: i32, staff: bool },
    /// Guest checkout on the public site.
    Public,
}

#[derive(Clone)]
pub struct BookingService {
    pool: MySqlPool,
    refund_window_days: i64,
}

/// Seats held by non-cancelled bookings of `bus_id` on `travel_date`.
async fn load_booked_seats(
    conn: &mut MySqlConnection,
    bus_id: i32,
    travel_date: NaiveDate,
) -> AppResult<BTreeSet<i32>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT seat_numbers FROM bookings WHERE bus_id = ? AND travel_date = ? AND status <> 'cancelled'",
    )
    .bind(bus_id)
    .bind(travel_date)
    .fetch_all(&mut *conn)
    .await?;

    let mut seat_lists = Vec::with_capacity(rows.len());
    for (raw,) in rows {
        let seats: Vec<i32> = serde_json::from_str(&raw)
            .map_err(|e| AppError::InternalError(format!("corrupt seat list: {}", e)))?;
        seat_lists.push(seats);
    }
    Ok(booked_seats(seat_lists.iter().map(|s| s.as_slice())))
}

fn travel_date_field(travel_date: &str) -> AppResult<NaiveDate> {
    parse_travel_date(travel_date).ok_or_else(|| {
        AppError::ValidationFailed(vec![FieldError {
            field: "travelDate".into(),
            message: "Travel date must be YYYY-MM-DD or an ISO 8601 timestamp".into(),
        }])
    })
}

impl BookingService {
    pub fn new(pool: MySqlPool, refund_window_days: i64) -> Self {
        BookingService {
            pool,
            refund_window_days,
        }
    }

    pub async fn list_bookings(&self, filter: BookingFilter) -> AppResult<Vec<BookingDetail>> {
        let mut query = QueryBuilder::<MySql>::new(format!(
            "SELECT {}, bus.bus_number, r.from_location, r.to_location
             FROM bookings b
             JOIN buses bus ON bus.id = b.bus_id
             JOIN bus_routes r ON r.id = b.route_id
             WHERE 1 = 1",
            BOOKING_COLUMNS
        ));
        if let Some(status) = filter.status {
            query.push(" AND b.status = ").push_bind(status.to_string());
        }
        if let Some(payment_status) = filter.payment_status {
            query
                .push(" AND b.payment_status = ")
                .push_bind(payment_status.to_string());
        }
        if let Some(bus_id) = filter.bus_id {
            query.push(" AND b.bus_id = ").push_bind(bus_id);
        }
        if let Some(travel_date) = filter.travel_date {
            query.push(" AND b.travel_date = ").push_bind(travel_date);
        }
        if let Some(user_id) = filter.user_id {
            query.push(" AND b.user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY b.booking_date DESC, b.id DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let bookings = query
            .build_query_as::<BookingDetail>()
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Listing as seen by `actor`: riders without `bookings:read` only see their own.
    pub async fn list_bookings_for(
        &self,
        actor: &AuthenticatedUser,
        mut filter: BookingFilter,
    ) -> AppResult<Vec<BookingDetail>> {
        if !actor.can(Permission::BookingsRead) {
            filter.user_id = Some(actor.user_id);
        }
        self.list_bookings(filter).await
    }

    pub async fn get_booking(&self, booking_id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!("SELECT {} FROM bookings b WHERE b.id = ?", BOOKING_COLUMNS))
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    pub async fn get_booking_for(&self, actor: &AuthenticatedUser, booking_id: i32) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if !actor.can(Permission::BookingsRead) && booking.user_id != Some(actor.user_id) {
            return Err(AppError::Forbidden("You can only view your own bookings".into()));
        }
        Ok(booking)
    }

    pub async fn available_seats(&self, bus_id: i32, travel_date: &str) -> AppResult<AvailableSeatsResponse> {
        let travel_date = travel_date_field(travel_date)?;

        let bus = sqlx::query_as::<_, Bus>(
            "SELECT id, bus_number, bus_type, capacity, amenities, is_active, route_id, created_at
             FROM buses WHERE id = ?",
        )
        .bind(bus_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Bus not found".into()))?;

        let mut conn = self.pool.acquire().await?;
        let booked = load_booked_seats(&mut conn, bus_id, travel_date).await?;

        Ok(AvailableSeatsResponse {
            bus_id,
            travel_date,
            capacity: bus.capacity,
            available_seats: available_seats(bus.capacity, &booked),
            booked_seats: booked.into_iter().collect(),
        })
    }

    pub async fn create_booking(&self, actor: &AuthenticatedUser, request: CreateBookingRequest) -> AppResult<Booking> {
        let channel = BookingChannel::Account {
            user_id: actor.user_id,
            staff: actor.can(Permission::BookingsWrite),
        };
        self.create(channel, request).await
    }

    pub async fn create_public_booking(&self, request: CreateBookingRequest) -> AppResult<Booking> {
        self.create(BookingChannel::Public, request).await
    }

    /// Validates the request, then checks and claims the seats inside one
    /// transaction. The bus row is locked for the duration so concurrent
    /// requests for the same bus queue up behind each other; the unique key
    /// on `booking_seats` rejects anything that still overlaps.
    async fn create(&self, channel: BookingChannel, request: CreateBookingRequest) -> AppResult<Booking> {
        request.validate()?;
        let travel_date = travel_date_field(&request.travel_date)?;

        let pickup = request
            .pickup_location
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if channel == BookingChannel::Public && pickup.is_none() {
            return Err(AppError::ValidationFailed(vec![FieldError {
                field: "pickupLocation".into(),
                message: "Pickup location is required".into(),
            }]));
        }

        if travel_date < Utc::now().date_naive() {
            return Err(AppError::BadRequest("Travel date cannot be in the past".into()));
        }

        let (user_id, payment_status) = match channel {
            BookingChannel::Account { user_id, staff } => {
                let payment = if staff {
                    request.payment_status.unwrap_or(PaymentStatus::Pending)
                } else {
                    PaymentStatus::Pending
                };
                (Some(user_id), payment)
            }
            BookingChannel::Public => (None, PaymentStatus::Pending),
        };
        if payment_status == PaymentStatus::Refunded {
            return Err(AppError::BadRequest(
                "A new booking cannot start out refunded".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let bus = sqlx::query_as::<_, Bus>(
            "SELECT id, bus_number, bus_type, capacity, amenities, is_active, route_id, created_at
             FROM buses WHERE id = ? FOR UPDATE",
        )
        .bind(request.bus_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Bus not found".into()))?;

        if !bus.is_active {
            return Err(AppError::BadRequest("Bus is not available for booking".into()));
        }
        let route_id = bus
            .route_id
            .ok_or_else(|| AppError::BadRequest("Bus is not assigned to a route".into()))?;

        let route = sqlx::query_as::<_, BusRoute>(
            "SELECT id, from_location, to_location, price, distance_km, duration_minutes,
                    pickup_locations, is_active, created_at
             FROM bus_routes WHERE id = ?",
        )
        .bind(route_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".into()))?;

        if !route.is_active {
            return Err(AppError::BadRequest("Route is not currently operating".into()));
        }
        if let Some(pickup) = pickup {
            if !route.accepts_pickup(pickup) {
                return Err(AppError::BadRequest(format!(
                    "Invalid pickup location '{}'. Available: {}",
                    pickup,
                    route.pickup_locations.join(", ")
                )));
            }
        }

        let booked = load_booked_seats(&mut tx, bus.id, travel_date).await?;
        if let Err(rejection) = check_requested_seats(bus.capacity, &booked, &request.seat_numbers) {
            tracing::info!(
                bus_id = bus.id,
                %travel_date,
                seats = ?rejection.seats(),
                "seat request rejected"
            );
            return Err(AppError::BadRequest(rejection.to_string()));
        }

        let mut seats = request.seat_numbers.clone();
        seats.sort_unstable();
        let total_amount = route.price * Decimal::from(seats.len() as i64);
        let reference = Uuid::new_v4().to_string();

        let result = sqlx::query(
            "INSERT INTO bookings
             (booking_reference, user_id, bus_id, route_id, passenger_name, passenger_email,
              passenger_phone, pickup_location, seat_numbers, travel_date, total_amount,
              status, payment_status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&reference)
        .bind(user_id)
        .bind(bus.id)
        .bind(route.id)
        .bind(request.passenger_name.trim())
        .bind(request.passenger_email.trim().to_lowercase())
        .bind(request.passenger_phone.trim())
        .bind(pickup)
        .bind(to_json_text(&seats))
        .bind(travel_date)
        .bind(total_amount)
        .bind(BookingStatus::Confirmed.to_string())
        .bind(payment_status.to_string())
        .execute(&mut *tx)
        .await?;
        let booking_id = result.last_insert_id() as i32;

        for seat in &seats {
            sqlx::query(
                "INSERT INTO booking_seats (booking_id, bus_id, travel_date, seat_number) VALUES (?, ?, ?, ?)",
            )
            .bind(booking_id)
            .bind(bus.id)
            .bind(travel_date)
            .bind(seat)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::BadRequest(format!("Seats already booked: {}", seat))
                } else {
                    e.into()
                }
            })?;
        }

        tx.commit().await?;

        tracing::info!(
            booking_id,
            reference = %reference,
            bus_id = bus.id,
            %travel_date,
            seats = ?seats,
            guest = user_id.is_none(),
            "booking confirmed"
        );
        self.get_booking(booking_id).await
    }

    pub async fn update_status(&self, booking_id: i32, status: BookingStatus) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.status == status {
            return Ok(booking);
        }
        if !booking.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change booking status from {} to {}",
                booking.status, status
            )));
        }

        // Conditional on the status we checked, so a concurrent change wins cleanly
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
            .bind(status.to_string())
            .bind(booking_id)
            .bind(booking.status.to_string())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest(format!(
                "Booking status changed concurrently; it is no longer {}",
                booking.status
            )));
        }
        if status == BookingStatus::Cancelled {
            release_seats(&mut tx, booking_id).await?;
        }
        tx.commit().await?;

        tracing::info!(booking_id, from = %booking.status, to = %status, "booking status changed");
        self.get_booking(booking_id).await
    }

    pub async fn update_payment_status(&self, booking_id: i32, payment_status: PaymentStatus) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.payment_status == payment_status {
            return Ok(booking);
        }

        match (booking.payment_status, payment_status) {
            (PaymentStatus::Pending, PaymentStatus::Paid) => {}
            (_, PaymentStatus::Refunded) => {
                return Err(AppError::BadRequest(
                    "Use the refund endpoint to refund a booking".into(),
                ))
            }
            (from, to) => {
                return Err(AppError::BadRequest(format!(
                    "Cannot change payment status from {} to {}",
                    from, to
                )))
            }
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::BadRequest("Cancelled bookings cannot be paid".into()));
        }

        let result = sqlx::query(
            "UPDATE bookings SET payment_status = ?
             WHERE id = ? AND payment_status = 'pending' AND status <> 'cancelled'",
        )
        .bind(payment_status.to_string())
        .bind(booking_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest(
                "Booking was cancelled or paid concurrently".into(),
            ));
        }

        tracing::info!(booking_id, payment_status = %payment_status, "payment status changed");
        self.get_booking(booking_id).await
    }

    /// Riders may cancel their own bookings; staff with `bookings:write` any booking.
    pub async fn cancel_booking(&self, actor: &AuthenticatedUser, booking_id: i32) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if !actor.can(Permission::BookingsWrite) && booking.user_id != Some(actor.user_id) {
            return Err(AppError::Forbidden("You can only cancel your own bookings".into()));
        }
        self.update_status(booking_id, BookingStatus::Cancelled).await
    }

    pub async fn refund_booking(&self, booking_id: i32, request: RefundRequest) -> AppResult<Booking> {
        request.validate()?;
        let booking = self.get_booking(booking_id).await?;
        let now = Utc::now();

        check_refund_eligibility(
            booking.payment_status,
            booking.status,
            booking.booking_date,
            now,
            self.refund_window_days,
        )
        .map_err(|rejection| AppError::BadRequest(rejection.to_string()))?;

        let note = refund_note(now, &request.reason);
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE bookings
             SET payment_status = ?, status = ?, notes = CONCAT_WS('\\n', notes, ?)
             WHERE id = ? AND payment_status = 'paid'",
        )
        .bind(PaymentStatus::Refunded.to_string())
        .bind(BookingStatus::Cancelled.to_string())
        .bind(&note)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Booking has already been refunded".into()));
        }
        release_seats(&mut tx, booking_id).await?;
        tx.commit().await?;

        tracing::info!(booking_id, amount = %booking.total_amount, "booking refunded");
        self.get_booking(booking_id).await
    }
}

async fn release_seats(conn: &mut MySqlConnection, booking_id: i32) -> AppResult<()> {
    sqlx::query("DELETE FROM booking_seats WHERE booking_id = ?")
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
