use crate::models::booking::{
    AvailableSeatsResponse, Booking, BookingDetail, BookingFilter, BookingStatus,
    CreateBookingRequest, PaymentStatus, RefundRequest, UpdateBookingStatusRequest,
    UpdatePaymentStatusRequest,
};
use crate::routes::parse_param;
use crate::services::booking_service::BookingService;
use crate::utils::error::{AppError, FieldError};
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::response::{ApiResponse, JsonResponse};
use crate::utils::seat_allocation::parse_travel_date;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use schemars::JsonSchema;

#[derive(Debug, FromForm, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub status: Option<String>,
    #[field(name = "paymentStatus")]
    pub payment_status: Option<String>,
    #[field(name = "busId")]
    pub bus_id: Option<i32>,
    #[field(name = "travelDate")]
    pub travel_date: Option<String>,
}

#[derive(Debug, FromForm, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatQuery {
    #[field(name = "busId")]
    pub bus_id: i32,
    #[field(name = "travelDate")]
    pub travel_date: String,
}

impl BookingQuery {
    fn into_filter(self) -> Result<BookingFilter, AppError> {
        let travel_date = match self.travel_date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => Some(parse_travel_date(raw).ok_or_else(|| {
                AppError::ValidationFailed(vec![FieldError {
                    field: "travelDate".into(),
                    message: format!("Invalid date '{}'", raw),
                }])
            })?),
            None => None,
        };
        Ok(BookingFilter {
            status: parse_param::<BookingStatus>("status", self.status.as_deref())?,
            payment_status: parse_param::<PaymentStatus>("paymentStatus", self.payment_status.as_deref())?,
            bus_id: self.bus_id,
            travel_date,
            ..BookingFilter::default()
        })
    }
}

/// Staff see every booking; riders see their own
#[openapi(tag = "Bookings")]
#[get("/bookings?<query..>")]
pub async fn list_bookings(
    query: BookingQuery,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Vec<BookingDetail>>, AppError> {
    let filter = query.into_filter()?;
    let bookings = booking_service.list_bookings_for(&auth, filter).await?;
    Ok(ApiResponse::ok(format!("{} booking(s)", bookings.len()), bookings))
}

#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<CreateBookingRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    auth.require(Permission::BookingsCreate)?;
    let booking = booking_service
        .create_booking(&auth, request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Booking confirmed", booking))
}

#[openapi(tag = "Bookings")]
#[get("/bookings/available-seats?<query..>")]
pub async fn available_seats(
    query: SeatQuery,
    _auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<AvailableSeatsResponse>, AppError> {
    let seats = booking_service
        .available_seats(query.bus_id, &query.travel_date)
        .await?;
    Ok(ApiResponse::ok(
        format!("{} seat(s) available", seats.available_seats.len()),
        seats,
    ))
}

#[openapi(tag = "Bookings")]
#[get("/bookings/<id>")]
pub async fn get_booking(
    id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    let booking = booking_service.get_booking_for(&auth, id).await?;
    Ok(ApiResponse::ok("Booking loaded", booking))
}

#[openapi(tag = "Bookings")]
#[put("/bookings/<id>/status", format = "json", data = "<request>")]
pub async fn update_booking_status(
    id: i32,
    request: Json<UpdateBookingStatusRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    auth.require(Permission::BookingsWrite)?;
    let booking = booking_service.update_status(id, request.status).await?;
    Ok(ApiResponse::ok("Booking status updated", booking))
}

#[openapi(tag = "Bookings")]
#[put("/bookings/<id>/payment", format = "json", data = "<request>")]
pub async fn update_payment_status(
    id: i32,
    request: Json<UpdatePaymentStatusRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    auth.require(Permission::BookingsWrite)?;
    let booking = booking_service
        .update_payment_status(id, request.payment_status)
        .await?;
    Ok(ApiResponse::ok("Payment status updated", booking))
}

#[openapi(tag = "Bookings")]
#[post("/bookings/<id>/cancel")]
pub async fn cancel_booking(
    id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    let booking = booking_service.cancel_booking(&auth, id).await?;
    Ok(ApiResponse::ok("Booking cancelled", booking))
}

#[openapi(tag = "Bookings")]
#[post("/bookings/<id>/refund", format = "json", data = "<request>")]
pub async fn refund_booking(
    id: i32,
    request: Json<RefundRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    auth.require(Permission::BookingsRefund)?;
    let booking = booking_service
        .refund_booking(id, request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Booking refunded", booking))
}
