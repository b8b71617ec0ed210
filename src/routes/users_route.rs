use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserProfile};
use crate::routes::parse_param;
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::{Permission, Role};
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List accounts, optionally by role
#[openapi(tag = "Users")]
#[get("/users?<role>")]
pub async fn list_users(
    role: Option<String>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<Vec<UserProfile>>, AppError> {
    auth.require(Permission::UsersRead)?;
    let role = parse_param::<Role>("role", role.as_deref())?;
    let users = user_service.list_users(role).await?;
    Ok(ApiResponse::ok(format!("{} user(s)", users.len()), users))
}

#[openapi(tag = "Users")]
#[get("/users/<id>")]
pub async fn get_user(
    id: i32,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserProfile>, AppError> {
    auth.require(Permission::UsersRead)?;
    let user = user_service.get_profile(id).await?;
    Ok(ApiResponse::ok("User loaded", user))
}

#[openapi(tag = "Users")]
#[post("/users", format = "json", data = "<request>")]
pub async fn create_user(
    request: Json<CreateUserRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserProfile>, AppError> {
    auth.require(Permission::UsersWrite)?;
    let user = user_service.create_user(request.into_inner()).await?;
    Ok(ApiResponse::ok("User created", user))
}

#[openapi(tag = "Users")]
#[put("/users/<id>", format = "json", data = "<request>")]
pub async fn update_user(
    id: i32,
    request: Json<UpdateUserRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<UserProfile>, AppError> {
    auth.require(Permission::UsersWrite)?;
    let user = user_service
        .update_user(auth.user_id, id, request.into_inner())
        .await?;
    Ok(ApiResponse::ok("User updated", user))
}

#[openapi(tag = "Users")]
#[delete("/users/<id>")]
pub async fn delete_user(
    id: i32,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<JsonResponse<()>, AppError> {
    auth.require(Permission::UsersWrite)?;
    user_service.delete_user(auth.user_id, id).await?;
    Ok(ApiResponse::message("User deleted"))
}
