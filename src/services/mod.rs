pub mod booking_service;
pub mod bus_route_service;
pub mod bus_service;
pub mod dashboard_service;
pub mod feedback_service;
pub mod user_service;
