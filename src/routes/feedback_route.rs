use crate::models::feedback::{
    Feedback, FeedbackStatus, Inquiry, InquiryStatus, UpdateFeedbackStatusRequest,
    UpdateInquiryStatusRequest,
};
use crate::routes::parse_param;
use crate::services::feedback_service::FeedbackService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::permissions::Permission;
use crate::utils::response::{ApiResponse, JsonResponse};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Feedback")]
#[get("/feedback?<status>")]
pub async fn list_feedback(
    status: Option<String>,
    auth: AuthenticatedUser,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Vec<Feedback>>, AppError> {
    auth.require(Permission::FeedbackRead)?;
    let status = parse_param::<FeedbackStatus>("status", status.as_deref())?;
    let feedback = feedback_service.list_feedback(status).await?;
    Ok(ApiResponse::ok(format!("{} feedback item(s)", feedback.len()), feedback))
}

#[openapi(tag = "Feedback")]
#[put("/feedback/<id>/status", format = "json", data = "<request>")]
pub async fn update_feedback_status(
    id: i32,
    request: Json<UpdateFeedbackStatusRequest>,
    auth: AuthenticatedUser,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Feedback>, AppError> {
    auth.require(Permission::FeedbackWrite)?;
    let feedback = feedback_service
        .update_feedback_status(id, request.status)
        .await?;
    Ok(ApiResponse::ok("Feedback updated", feedback))
}

#[openapi(tag = "Feedback")]
#[get("/inquiries?<status>")]
pub async fn list_inquiries(
    status: Option<String>,
    auth: AuthenticatedUser,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Vec<Inquiry>>, AppError> {
    auth.require(Permission::FeedbackRead)?;
    let status = parse_param::<InquiryStatus>("status", status.as_deref())?;
    let inquiries = feedback_service.list_inquiries(status).await?;
    Ok(ApiResponse::ok(format!("{} inquiry item(s)", inquiries.len()), inquiries))
}

#[openapi(tag = "Feedback")]
#[put("/inquiries/<id>/status", format = "json", data = "<request>")]
pub async fn update_inquiry_status(
    id: i32,
    request: Json<UpdateInquiryStatusRequest>,
    auth: AuthenticatedUser,
    feedback_service: &State<FeedbackService>,
) -> Result<JsonResponse<Inquiry>, AppError> {
    auth.require(Permission::FeedbackWrite)?;
    let inquiry = feedback_service
        .update_inquiry_status(id, request.status)
        .await?;
    Ok(ApiResponse::ok("Inquiry updated", inquiry))
}
