use crate::utils::error::{AppError, FieldError};
use okapi::openapi3::SchemaObject;
use rocket::http::Status;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::okapi::Map;
use rocket_okapi::response::OpenApiResponderInner;
use serde_json::json;

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        let error_responses = [
            (
                Status::BadRequest,
                "Bad Request",
                AppError::ValidationFailed(vec![FieldError {
                    field: "passengerEmail".to_string(),
                    message: "Invalid email address".to_string(),
                }]),
            ),
            (
                Status::Unauthorized,
                "Unauthorized",
                AppError::AuthError("Authentication required".to_string()),
            ),
            (
                Status::Forbidden,
                "Forbidden",
                AppError::Forbidden("Insufficient permissions: bookings:write required".to_string()),
            ),
            (
                Status::NotFound,
                "Not Found",
                AppError::NotFound("Booking not found".to_string()),
            ),
            (
                Status::InternalServerError,
                "Internal Server Error",
                AppError::InternalError("Internal server error".to_string()),
            ),
        ];

        for (status, description, error) in error_responses {
            let mut example = json!({
                "success": false,
                "message": error.to_string(),
            });
            if let Some(errors) = error.field_errors() {
                example["errors"] = json!(errors);
            }

            responses.responses.insert(
                status.code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = Map::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(example),
                                ..Default::default()
                            },
                        );
                        content
                    },
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}
