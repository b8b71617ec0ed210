#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::booking_service::BookingService;
use crate::services::bus_route_service::BusRouteService;
use crate::services::bus_service::BusService;
use crate::services::dashboard_service::DashboardService;
use crate::services::feedback_service::FeedbackService;
use crate::services::user_service::UserService;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use sqlx::MySqlPool;

fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        ..Default::default()
    }
}

/// Assembles the server: managed services, the `/api` routes, Swagger UI
/// and the JSON catchers. Does not touch the database.
pub fn build_rocket(pool: MySqlPool, config: AppConfig) -> Rocket<Build> {
    let user_service = UserService::new(pool.clone(), config.clone());
    let route_service = BusRouteService::new(pool.clone());
    let bus_service = BusService::new(pool.clone());
    let booking_service = BookingService::new(pool.clone(), config.refund_window_days);
    let feedback_service = FeedbackService::new(pool.clone());
    let dashboard_service = DashboardService::new(pool, booking_service.clone());

    rocket::build()
        .manage(config)
        .manage(user_service)
        .manage(route_service)
        .manage(bus_service)
        .manage(booking_service)
        .manage(feedback_service)
        .manage(dashboard_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::auth_route::register,
                routes::auth_route::login,
                routes::auth_route::logout,
                routes::auth_route::me,
                routes::auth_route::change_password,
                routes::auth_route::setup_two_factor,
                routes::auth_route::disable_two_factor,
                routes::users_route::list_users,
                routes::users_route::get_user,
                routes::users_route::create_user,
                routes::users_route::update_user,
                routes::users_route::delete_user,
                routes::routes_route::list_routes,
                routes::routes_route::get_route,
                routes::routes_route::create_route,
                routes::routes_route::update_route,
                routes::routes_route::delete_route,
                routes::buses_route::list_buses,
                routes::buses_route::get_bus,
                routes::buses_route::create_bus,
                routes::buses_route::update_bus,
                routes::buses_route::delete_bus,
                routes::bookings_route::list_bookings,
                routes::bookings_route::create_booking,
                routes::bookings_route::available_seats,
                routes::bookings_route::get_booking,
                routes::bookings_route::update_booking_status,
                routes::bookings_route::update_payment_status,
                routes::bookings_route::cancel_booking,
                routes::bookings_route::refund_booking,
                routes::public_route::list_public_routes,
                routes::public_route::list_route_buses,
                routes::public_route::public_available_seats,
                routes::public_route::create_public_booking,
                routes::public_route::submit_feedback,
                routes::public_route::submit_inquiry,
                routes::feedback_route::list_feedback,
                routes::feedback_route::update_feedback_status,
                routes::feedback_route::list_inquiries,
                routes::feedback_route::update_inquiry_status,
                routes::dashboard_route::stats,
                routes::dashboard_route::recent_bookings,
                routes::dashboard_route::route_stats,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register("/", routes::catchers::all())
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
