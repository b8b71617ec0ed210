use crate::models::feedback::{
    Feedback, FeedbackStatus, Inquiry, InquiryStatus, SubmitFeedbackRequest, SubmitInquiryRequest,
};
use crate::utils::error::{AppError, AppResult};
use sqlx::MySqlPool;
use validator::Validate;

/// Customer feedback (ratings) and contact-form inquiries.
#[derive(Clone)]
pub struct FeedbackService {
    pool: MySqlPool,
}

impl FeedbackService {
    pub fn new(pool: MySqlPool) -> Self {
        FeedbackService { pool }
    }

    pub async fn submit_feedback(&self, request: SubmitFeedbackRequest) -> AppResult<Feedback> {
        request.validate()?;
        let result = sqlx::query(
            "INSERT INTO feedback (name, email, rating, message, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.name.trim())
        .bind(request.email.trim().to_lowercase())
        .bind(request.rating)
        .bind(request.message.trim())
        .bind(FeedbackStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        let feedback_id = result.last_insert_id() as i32;
        tracing::info!(feedback_id, rating = request.rating, "feedback received");
        self.get_feedback(feedback_id).await
    }

    async fn get_feedback(&self, feedback_id: i32) -> AppResult<Feedback> {
        sqlx::query_as::<_, Feedback>(
            "SELECT id, name, email, rating, message, status, created_at FROM feedback WHERE id = ?",
        )
        .bind(feedback_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".into()))
    }

    pub async fn list_feedback(&self, status: Option<FeedbackStatus>) -> AppResult<Vec<Feedback>> {
        let feedback = match status {
            Some(status) => {
                sqlx::query_as::<_, Feedback>(
                    "SELECT id, name, email, rating, message, status, created_at
                     FROM feedback WHERE status = ? ORDER BY created_at DESC",
                )
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Feedback>(
                    "SELECT id, name, email, rating, message, status, created_at
                     FROM feedback ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(feedback)
    }

    pub async fn update_feedback_status(&self, feedback_id: i32, status: FeedbackStatus) -> AppResult<Feedback> {
        let feedback = self.get_feedback(feedback_id).await?;
        if feedback.status == status {
            return Ok(feedback);
        }
        if !feedback.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change feedback status from {} to {}",
                feedback.status, status
            )));
        }

        let result = sqlx::query("UPDATE feedback SET status = ? WHERE id = ? AND status = ?")
            .bind(status.to_string())
            .bind(feedback_id)
            .bind(feedback.status.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Feedback status changed concurrently".into()));
        }

        tracing::info!(feedback_id, status = %status, "feedback status changed");
        self.get_feedback(feedback_id).await
    }

    pub async fn submit_inquiry(&self, request: SubmitInquiryRequest) -> AppResult<Inquiry> {
        request.validate()?;
        let result = sqlx::query(
            "INSERT INTO inquiries (name, email, phone, subject, message, status) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(request.name.trim())
        .bind(request.email.trim().to_lowercase())
        .bind(request.phone.as_deref().map(str::trim))
        .bind(request.subject.trim())
        .bind(request.message.trim())
        .bind(InquiryStatus::New.to_string())
        .execute(&self.pool)
        .await?;

        let inquiry_id = result.last_insert_id() as i32;
        tracing::info!(inquiry_id, "inquiry received");
        self.get_inquiry(inquiry_id).await
    }

    async fn get_inquiry(&self, inquiry_id: i32) -> AppResult<Inquiry> {
        sqlx::query_as::<_, Inquiry>(
            "SELECT id, name, email, phone, subject, message, status, created_at FROM inquiries WHERE id = ?",
        )
        .bind(inquiry_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".into()))
    }

    pub async fn list_inquiries(&self, status: Option<InquiryStatus>) -> AppResult<Vec<Inquiry>> {
        let inquiries = match status {
            Some(status) => {
                sqlx::query_as::<_, Inquiry>(
                    "SELECT id, name, email, phone, subject, message, status, created_at
                     FROM inquiries WHERE status = ? ORDER BY created_at DESC",
                )
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Inquiry>(
                    "SELECT id, name, email, phone, subject, message, status, created_at
                     FROM inquiries ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(inquiries)
    }

    pub async fn update_inquiry_status(&self, inquiry_id: i32, status: InquiryStatus) -> AppResult<Inquiry> {
        let inquiry = self.get_inquiry(inquiry_id).await?;
        if inquiry.status == status {
            return Ok(inquiry);
        }
        if inquiry.status == InquiryStatus::Resolved {
            return Err(AppError::BadRequest("Resolved inquiries cannot be reopened".into()));
        }
        if !inquiry.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change inquiry status from {} to {}",
                inquiry.status, status
            )));
        }

        let result = sqlx::query("UPDATE inquiries SET status = ? WHERE id = ? AND status = ?")
            .bind(status.to_string())
            .bind(inquiry_id)
            .bind(inquiry.status.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Inquiry status changed concurrently".into()));
        }

        tracing::info!(inquiry_id, status = %status, "inquiry status changed");
        self.get_inquiry(inquiry_id).await
    }
}
