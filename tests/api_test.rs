//! HTTP-level checks for everything decided before the database is reached:
//! authentication, permissions, request validation and the catchers.

use bus_booking_system::build_rocket;
use bus_booking_system::config::AppConfig;
use bus_booking_system::utils::jwt::{generate_token, AUTH_COOKIE};
use bus_booking_system::utils::permissions::Role;
use rocket::http::{ContentType, Cookie, Header, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::{json, Value};
use sqlx::MySqlPool;

const SECRET: &str = "api-test-secret";

async fn client() -> Client {
    // Never connects unless a handler actually runs a query.
    let pool = MySqlPool::connect_lazy("mysql://root@127.0.0.1:3306/bus_booking_unused")
        .expect("lazy pool");
    let config = AppConfig::new("mysql://root@127.0.0.1:3306/bus_booking_unused", SECRET);
    Client::tracked(build_rocket(pool, config))
        .await
        .expect("valid rocket instance")
}

fn bearer(role: Role) -> Header<'static> {
    let config = AppConfig::new("unused", SECRET);
    let token = generate_token(1, "staff@example.com", role, &config).expect("token");
    Header::new("Authorization", format!("Bearer {}", token))
}

async fn body(response: LocalResponse<'_>) -> Value {
    response.into_json::<Value>().await.expect("json body")
}

fn booking_body() -> Value {
    json!({
        "busId": 1,
        "travelDate": "2099-01-15",
        "seatNumbers": [5, 7],
        "passengerName": "Ada Rider",
        "passengerEmail": "ada@example.com",
        "passengerPhone": "+15551234567",
        "pickupLocation": "Central Station"
    })
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let client = client().await;
    let response = client.get("/api/bookings").dispatch().await;

    assert_eq!(response.status(), Status::Unauthorized);
    let body = body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let client = client().await;
    let response = client
        .get("/api/dashboard/stats")
        .header(Header::new("Authorization", "Bearer not-a-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_token_signed_elsewhere_is_unauthorized() {
    let client = client().await;
    let foreign = AppConfig::new("unused", "some-other-secret");
    let token = generate_token(1, "x@example.com", Role::SuperAdmin, &foreign).unwrap();
    let response = client
        .get("/api/users")
        .header(Header::new("Authorization", format!("Bearer {}", token)))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_manager_cannot_list_users() {
    let client = client().await;
    let response = client
        .get("/api/users")
        .header(bearer(Role::Manager))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Forbidden);
    let body = body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Insufficient permissions: users:read required");
}

#[tokio::test]
async fn test_rider_cannot_refund_or_write_routes() {
    let client = client().await;

    let refund = client
        .post("/api/bookings/3/refund")
        .header(bearer(Role::User))
        .header(ContentType::JSON)
        .body(json!({ "reason": "changed plans" }).to_string())
        .dispatch()
        .await;
    assert_eq!(refund.status(), Status::Forbidden);

    let route = client
        .delete("/api/routes/1")
        .header(bearer(Role::User))
        .dispatch()
        .await;
    assert_eq!(route.status(), Status::Forbidden);

    let dashboard = client
        .get("/api/dashboard/stats")
        .header(bearer(Role::User))
        .dispatch()
        .await;
    assert_eq!(dashboard.status(), Status::Forbidden);
}

#[tokio::test]
async fn test_admin_cannot_create_users() {
    let client = client().await;
    let response = client
        .post("/api/users")
        .header(bearer(Role::Admin))
        .header(ContentType::JSON)
        .body(
            json!({
                "name": "New Manager",
                "email": "manager@example.com",
                "password": "longenough",
                "role": "manager"
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[tokio::test]
async fn test_cookie_token_is_accepted() {
    let client = client().await;
    let config = AppConfig::new("unused", SECRET);
    let token = generate_token(9, "rider@example.com", Role::User, &config).unwrap();

    let response = client
        .post("/api/auth/logout")
        .cookie(Cookie::new(AUTH_COOKIE, token))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body = body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out");
}

#[tokio::test]
async fn test_cookie_used_when_authorization_is_not_bearer() {
    let client = client().await;
    let config = AppConfig::new("unused", SECRET);
    let token = generate_token(9, "rider@example.com", Role::User, &config).unwrap();

    let response = client
        .post("/api/auth/logout")
        .header(Header::new("Authorization", "Basic cmlkZXI6c2VjcmV0"))
        .cookie(Cookie::new(AUTH_COOKIE, token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post("/api/auth/logout")
        .header(Header::new("Authorization", "Basic cmlkZXI6c2VjcmV0"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_booking_validation_lists_fields() {
    let client = client().await;
    let mut request = booking_body();
    request["passengerEmail"] = json!("not-an-email");
    request["passengerPhone"] = json!("12");

    let response = client
        .post("/api/bookings")
        .header(bearer(Role::User))
        .header(ContentType::JSON)
        .body(request.to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body = body(response).await;
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["passengerEmail", "passengerPhone"]);
}

#[tokio::test]
async fn test_public_booking_requires_pickup_location() {
    let client = client().await;
    let mut request = booking_body();
    request.as_object_mut().unwrap().remove("pickupLocation");

    let response = client
        .post("/api/public/bookings")
        .header(ContentType::JSON)
        .body(request.to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body = body(response).await;
    assert_eq!(body["errors"][0]["field"], "pickupLocation");
}

#[tokio::test]
async fn test_past_travel_date_rejected() {
    let client = client().await;
    let mut request = booking_body();
    request["travelDate"] = json!("2001-01-01");

    let response = client
        .post("/api/public/bookings")
        .header(ContentType::JSON)
        .body(request.to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["message"], "Travel date cannot be in the past");
}

#[tokio::test]
async fn test_feedback_rating_out_of_range() {
    let client = client().await;
    let response = client
        .post("/api/public/feedback")
        .header(ContentType::JSON)
        .body(
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "rating": 9,
                "message": "Great ride"
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["errors"][0]["field"], "rating");
}

#[tokio::test]
async fn test_unknown_enum_filter_rejected() {
    let client = client().await;
    let response = client
        .get("/api/bookings?status=lost")
        .header(bearer(Role::Admin))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["errors"][0]["field"], "status");
}

#[tokio::test]
async fn test_unknown_path_uses_envelope() {
    let client = client().await;
    let response = client.get("/api/nowhere").dispatch().await;

    assert_eq!(response.status(), Status::NotFound);
    let body = body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No resource at /api/nowhere");
}

#[tokio::test]
async fn test_body_missing_fields_uses_envelope() {
    let client = client().await;
    let response = client
        .post("/api/public/inquiries")
        .header(ContentType::JSON)
        .body(json!({ "name": "Ada" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    assert_eq!(body(response).await["success"], false);
}

#[tokio::test]
async fn test_openapi_document_and_cors() {
    let client = client().await;
    let response = client.get("/api/openapi.json").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
    let document = body(response).await;
    assert!(document["openapi"].is_string());
    assert!(!document["paths"].as_object().expect("paths").is_empty());
}
