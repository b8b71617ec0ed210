use crate::models::booking::{BookingStatus, PaymentStatus};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundRejection {
    AlreadyRefunded,
    NotPaid(PaymentStatus),
    Completed,
    WindowExpired { window_days: i64 },
}

impl fmt::Display for RefundRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefundRejection::AlreadyRefunded => write!(f, "Booking has already been refunded"),
            RefundRejection::NotPaid(status) => write!(
                f,
                "Only paid bookings can be refunded (payment status is {})",
                status
            ),
            RefundRejection::Completed => write!(f, "Completed bookings cannot be refunded"),
            RefundRejection::WindowExpired { window_days } => write!(
                f,
                "Refund window of {} days from the booking date has expired",
                window_days
            ),
        }
    }
}

/// Gates are evaluated in order; the first violated one is reported.
pub fn check_refund_eligibility(
    payment_status: PaymentStatus,
    status: BookingStatus,
    booking_date: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<(), RefundRejection> {
    match payment_status {
        PaymentStatus::Paid => {}
        PaymentStatus::Refunded => return Err(RefundRejection::AlreadyRefunded),
        other => return Err(RefundRejection::NotPaid(other)),
    }

    if status == BookingStatus::Completed {
        return Err(RefundRejection::Completed);
    }

    if now - booking_date > Duration::days(window_days) {
        return Err(RefundRejection::WindowExpired { window_days });
    }

    Ok(())
}

/// Line appended to the booking notes when a refund goes through.
pub fn refund_note(now: DateTime<Utc>, reason: &str) -> String {
    format!("[{}] Refunded: {}", now.to_rfc3339(), reason.trim())
}
