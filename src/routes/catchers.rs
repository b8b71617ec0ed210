use rocket::http::Status;
use rocket::serde::json::{json, Value};
use rocket::{Catcher, Request};

fn envelope(message: &str) -> Value {
    json!({
        "success": false,
        "message": message,
    })
}

#[catch(400)]
pub fn bad_request() -> Value {
    envelope("Malformed request")
}

#[catch(401)]
pub fn unauthorized() -> Value {
    envelope("Authentication required")
}

#[catch(403)]
pub fn forbidden() -> Value {
    envelope("Insufficient permissions")
}

#[catch(404)]
pub fn not_found(request: &Request) -> Value {
    envelope(&format!("No resource at {}", request.uri().path()))
}

#[catch(422)]
pub fn unprocessable() -> Value {
    envelope("Request body could not be parsed")
}

#[catch(500)]
pub fn internal_error() -> Value {
    envelope("Internal server error")
}

#[catch(default)]
pub fn fallback(status: Status, _request: &Request) -> Value {
    envelope(status.reason().unwrap_or("Request failed"))
}

pub fn all() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        forbidden,
        not_found,
        unprocessable,
        internal_error,
        fallback
    ]
}
