use crate::utils::error::FieldError;
use rocket::serde::json::Json;
use schemars::JsonSchema;
use serde::Serialize;

/// Envelope wrapped around every JSON response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        })
    }
}

pub type JsonResponse<T> = Json<ApiResponse<T>>;
