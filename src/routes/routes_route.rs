use crate::models::bus_route::{BusRoute, CreateRouteRequest, RouteFilter, UpdateRouteRequest};
use crate::services::bus_route_service::BusRouteService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Routes")]
#[get("/routes?<from>&<to>&<active>")]
pub async fn list_routes(
    from: Option<String>,
    to: Option<String>,
    active: Option<bool>,
    auth: AuthenticatedUser,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<Vec<BusRoute>>, AppError> {
    auth.require(Permission::RoutesRead)?;
    let routes = route_service
        .list_routes(RouteFilter {
            from,
            to,
            active_only: active.unwrap_or(false),
        })
        .await?;
    Ok(ApiResponse::ok(format!("{} route(s)", routes.len()), routes))
}

#[openapi(tag = "Routes")]
#[get("/routes/<id>")]
pub async fn get_route(
    id: i32,
    auth: AuthenticatedUser,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<BusRoute>, AppError> {
    auth.require(Permission::RoutesRead)?;
    let route = route_service.get_route(id).await?;
    Ok(ApiResponse::ok("Route loaded", route))
}

#[openapi(tag = "Routes")]
#[post("/routes", format = "json", data = "<request>")]
pub async fn create_route(
    request: Json<CreateRouteRequest>,
    auth: AuthenticatedUser,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<BusRoute>, AppError> {
    auth.require(Permission::RoutesWrite)?;
    let route = route_service.create_route(request.into_inner()).await?;
    Ok(ApiResponse::ok("Route created", route))
}

#[openapi(tag = "Routes")]
#[put("/routes/<id>", format = "json", data = "<request>")]
pub async fn update_route(
    id: i32,
    request: Json<UpdateRouteRequest>,
    auth: AuthenticatedUser,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<BusRoute>, AppError> {
    auth.require(Permission::RoutesWrite)?;
    let route = route_service.update_route(id, request.into_inner()).await?;
    Ok(ApiResponse::ok("Route updated", route))
}

#[openapi(tag = "Routes")]
#[delete("/routes/<id>")]
pub async fn delete_route(
    id: i32,
    auth: AuthenticatedUser,
    route_service: &State<BusRouteService>,
) -> Result<JsonResponse<()>, AppError> {
    auth.require(Permission::RoutesWrite)?;
    route_service.delete_route(id).await?;
    Ok(ApiResponse::message("Route deleted"))
}
