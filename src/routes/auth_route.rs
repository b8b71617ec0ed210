use crate::models::user::{
    ChangePasswordRequest, TwoFactorDisableRequest, TwoFactorSetupResponse, UserLoginRequest,
    UserLoginResponse, UserProfile, UserRegistrationRequest,
};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new rider account
#[openapi(tag = "Auth")]
#[post("/auth/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<UserRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserProfile>, AppError> {
    let user = user_service.register_user(request.into_inner()).await?;
    Ok(ApiResponse::ok("Registration successful", user))
}

/// Login and receive a bearer token
#[openapi(tag = "Auth")]
#[post("/auth/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserLoginResponse>, AppError> {
    let response = user_service.login_user(request.into_inner()).await?;
    Ok(ApiResponse::ok("Login successful", response))
}

/// Tokens are stateless; the client discards its copy.
#[openapi(tag = "Auth")]
#[post("/auth/logout")]
pub async fn logout(auth: AuthenticatedUser) -> JsonResponse<()> {
    tracing::info!(user_id = auth.user_id, "user logged out");
    ApiResponse::message("Logged out")
}

#[openapi(tag = "Auth")]
#[get("/auth/me")]
pub async fn me(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserProfile>, AppError> {
    let profile = user_service.get_profile(auth.user_id).await?;
    Ok(ApiResponse::ok("Profile loaded", profile))
}

#[openapi(tag = "Auth")]
#[post("/auth/change-password", format = "json", data = "<request>")]
pub async fn change_password(
    request: Json<ChangePasswordRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<()>, AppError> {
    user_service
        .change_password(auth.user_id, request.into_inner())
        .await?;
    Ok(ApiResponse::message("Password changed"))
}

#[openapi(tag = "Auth")]
#[post("/auth/two-factor/setup")]
pub async fn setup_two_factor(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<TwoFactorSetupResponse>, AppError> {
    let response = user_service.setup_two_factor(auth.user_id).await?;
    Ok(ApiResponse::ok(
        "Two-factor authentication enabled. Store this code safely; it will not be shown again",
        response,
    ))
}

#[openapi(tag = "Auth")]
#[post("/auth/two-factor/disable", format = "json", data = "<request>")]
pub async fn disable_two_factor(
    request: Json<TwoFactorDisableRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<()>, AppError> {
    user_service
        .disable_two_factor(auth.user_id, request.into_inner())
        .await?;
    Ok(ApiResponse::message("Two-factor authentication disabled"))
}
