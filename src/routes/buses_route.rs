use crate::models::bus::{Bus, BusFilter, BusType, CreateBusRequest, UpdateBusRequest};
use crate::routes::parse_param;
use crate::services::bus_service::BusService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use schemars::JsonSchema;

#[derive(Debug, FromForm, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusQuery {
    #[field(name = "routeId")]
    pub route_id: Option<i32>,
    #[field(name = "busType")]
    pub bus_type: Option<String>,
    pub active: Option<bool>,
}

#[openapi(tag = "Buses")]
#[get("/buses?<query..>")]
pub async fn list_buses(
    query: BusQuery,
    auth: AuthenticatedUser,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<Vec<Bus>>, AppError> {
    auth.require(Permission::BusesRead)?;
    let filter = BusFilter {
        route_id: query.route_id,
        bus_type: parse_param::<BusType>("busType", query.bus_type.as_deref())?,
        active_only: query.active.unwrap_or(false),
    };
    let buses = bus_service.list_buses(filter).await?;
    Ok(ApiResponse::ok(format!("{} bus(es)", buses.len()), buses))
}

#[openapi(tag = "Buses")]
#[get("/buses/<id>")]
pub async fn get_bus(
    id: i32,
    auth: AuthenticatedUser,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<Bus>, AppError> {
    auth.require(Permission::BusesRead)?;
    let bus = bus_service.get_bus(id).await?;
    Ok(ApiResponse::ok("Bus loaded", bus))
}

#[openapi(tag = "Buses")]
#[post("/buses", format = "json", data = "<request>")]
pub async fn create_bus(
    request: Json<CreateBusRequest>,
    auth: AuthenticatedUser,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<Bus>, AppError> {
    auth.require(Permission::BusesWrite)?;
    let bus = bus_service.create_bus(request.into_inner()).await?;
    Ok(ApiResponse::ok("Bus created", bus))
}

#[openapi(tag = "Buses")]
#[put("/buses/<id>", format = "json", data = "<request>")]
pub async fn update_bus(
    id: i32,
    request: Json<UpdateBusRequest>,
    auth: AuthenticatedUser,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<Bus>, AppError> {
    auth.require(Permission::BusesWrite)?;
    let bus = bus_service.update_bus(id, request.into_inner()).await?;
    Ok(ApiResponse::ok("Bus updated", bus))
}

#[openapi(tag = "Buses")]
#[delete("/buses/<id>")]
pub async fn delete_bus(
    id: i32,
    auth: AuthenticatedUser,
    bus_service: &State<BusService>,
) -> Result<JsonResponse<()>, AppError> {
    auth.require(Permission::BusesWrite)?;
    bus_service.delete_bus(id).await?;
    Ok(ApiResponse::message("Bus deleted"))
}
