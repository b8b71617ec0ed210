use crate::models::enum_column;
use crate::utils::validation::{validate_not_blank, validate_phone};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InquiryStatus {
    New,
    InProgress,
    Resolved,
}

impl FeedbackStatus {
    pub fn can_transition_to(self, next: FeedbackStatus) -> bool {
        matches!(
            (self, next),
            (FeedbackStatus::Pending, FeedbackStatus::Reviewed)
                | (FeedbackStatus::Pending, FeedbackStatus::Published)
                | (FeedbackStatus::Reviewed, FeedbackStatus::Published)
        )
    }
}

impl InquiryStatus {
    /// Inquiries only move forward; a resolved inquiry is closed.
    pub fn can_transition_to(self, next: InquiryStatus) -> bool {
        matches!(
            (self, next),
            (InquiryStatus::New, InquiryStatus::InProgress)
                | (InquiryStatus::New, InquiryStatus::Resolved)
                | (InquiryStatus::InProgress, InquiryStatus::Resolved)
        )
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub message: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for Feedback {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Feedback {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            rating: row.try_get("rating")?,
            message: row.try_get("message")?,
            status: enum_column(row, "status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for Inquiry {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Inquiry {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            status: enum_column(row, "status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(custom(function = "validate_not_blank"), length(max = 2000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInquiryRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub subject: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 2000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackStatusRequest {
    pub status: FeedbackStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInquiryStatusRequest {
    pub status: InquiryStatus,
}
