pub mod auth_route;
pub mod bookings_route;
pub mod buses_route;
pub mod catchers;
pub mod dashboard_route;
pub mod feedback_route;
pub mod public_route;
pub mod routes_route;
pub mod users_route;

use crate::utils::error::{AppError, AppResult, FieldError};
use std::str::FromStr;

/// Parses an optional enum-valued query parameter, naming the parameter on failure.
pub(crate) fn parse_param<T: FromStr>(name: &str, value: Option<&str>) -> AppResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            AppError::ValidationFailed(vec![FieldError {
                field: name.to_string(),
                message: format!("Unsupported value '{}'", raw),
            }])
        }),
    }
}
