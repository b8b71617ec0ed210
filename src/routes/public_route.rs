use crate::models::booking::{AvailableSeatsResponse, Booking, CreateBookingRequest};
use crate::models::bus::{Bus, BusFilter};
use crate::models::bus_route::{BusRoute, RouteFilter};
use crate::models::feedback::{Feedback, Inquiry, SubmitFeedbackRequest, SubmitInquiryRequest};
use crate::routes::bookings_route::SeatQuery;
use crate::services::booking_service::BookingService;
use crate::services::bus_route_service::BusRouteService;
use crate::services::bus_service::BusService;
use crate::services::feedback_service::FeedbackService;
use crate::utils::error::AppError;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

// Customer-facing endpoints. No token is required for any of these.

#[openapi(tag = "Public")]
#[get("/public/routes?<from>&<to>")]
pub async fn list_public_routes(
    from: Option<String>,
    to: Option<String>,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<Vec<BusRoute>>, AppError> {
    let routes = route_service
        .list_routes(RouteFilter {
            from,
            to,
            active_only: true,
        })
        .await?;
    Ok(ApiResponse::ok(format!("{} route(s)", routes.len()), routes))
}

#[openapi(tag = "Public")]
#[get("/public/routes/<id>/buses")]
pub async fn list_route_buses(
    id: i32,
    route_service: &State<BusRouteService>,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<Vec<Bus>>, AppError> {
    let route = route_service.get_route(id).await?;
    if !route.is_active {
        return Err(AppError::NotFound("Route not found".into()));
    }
    let buses = bus_service
        .list_buses(BusFilter {
            route_id: Some(route.id),
            active_only: true,
            ..BusFilter::default()
        })
        .await?;
    Ok(ApiResponse::ok(format!("{} bus(es)", buses.len()), buses))
}

#[openapi(tag = "Public")]
#[get("/public/available-seats?<query..>")]
pub async fn public_available_seats(
    query: SeatQuery,
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

#[openapi(tag = "Public")]
#[post("/public/bookings", format = "json", data = "<request>")]
pub async fn create_public_booking(
    request: Json<CreateBookingRequest>,
    booking_service: &State<BookingService>,
) -> Result<JsonResponse<Booking>, AppError> {
    let booking = booking_service
        .create_public_booking(request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Booking confirmed", booking))
}

#[openapi(tag = "Public")]
#[post("/public/feedback", format = "json", data = "<request>")]
pub async fn submit_feedback(
    request: Json<SubmitFeedbackRequest>,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Feedback>, AppError> {
    let feedback = feedback_service
        .submit_feedback(request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Thank you for your feedback", feedback))
}

#[openapi(tag = "Public")]
#[post("/public/inquiries", format = "json", data = "<request>")]
pub async fn submit_inquiry(
    request: Json<SubmitInquiryRequest>,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Inquiry>, AppError> {
    let inquiry = feedback_service
        .submit_inquiry(request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Inquiry received", inquiry))
}
