use crate::models::booking::{BookingDetail, BookingFilter};
use crate::models::dashboard::{DashboardStats, RouteStats};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppResult;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

pub const MAX_RECENT_BOOKINGS: i64 = 50;

#[derive(Clone)]
pub struct DashboardService {
    pool: MySqlPool,
    bookings: BookingService,
}

impl DashboardService {
    pub fn new(pool: MySqlPool, bookings: BookingService) -> Self {
        DashboardService { pool, bookings }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let booking_counts = sqlx::query_as::<_, (i64, i64, i64, i64, Decimal)>(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN status = 'confirmed' THEN 1 END),
                    COUNT(CASE WHEN status = 'cancelled' THEN 1 END),
                    COUNT(CASE WHEN status = 'completed' THEN 1 END),
                    COALESCE(SUM(CASE WHEN payment_status = 'paid' THEN total_amount END), 0)
             FROM bookings",
        )
        .fetch_one(&self.pool);
        let bus_counts = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(CASE WHEN is_active THEN 1 END) FROM buses",
        )
        .fetch_one(&self.pool);
        let route_count = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM bus_routes").fetch_one(&self.pool);
        let user_count = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users").fetch_one(&self.pool);
        let pending_inquiries =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM inquiries WHERE status <> 'resolved'")
                .fetch_one(&self.pool);

        let (
            (total_bookings, confirmed_bookings, cancelled_bookings, completed_bookings, total_revenue),
            (total_buses, active_buses),
            (total_routes,),
            (total_users,),
            (pending_inquiries,),
        ) = tokio::try_join!(booking_counts, bus_counts, route_count, user_count, pending_inquiries)?;

        Ok(DashboardStats {
            total_bookings,
            confirmed_bookings,
            cancelled_bookings,
            completed_bookings,
            total_revenue,
            total_buses,
            active_buses,
            total_routes,
            total_users,
            pending_inquiries,
        })
    }

    pub async fn recent_bookings(&self, limit: i64) -> AppResult<Vec<BookingDetail>> {
        self.bookings
            .list_bookings(BookingFilter {
                limit: Some(limit.clamp(1, MAX_RECENT_BOOKINGS)),
                ..BookingFilter::default()
            })
            .await
    }

    pub async fn route_stats(&self) -> AppResult<Vec<RouteStats>> {
        let stats = sqlx::query_as::<_, RouteStats>(
            "SELECT r.id AS route_id, r.from_location, r.to_location,
                    COUNT(b.id) AS bookings,
                    COALESCE(SUM(CASE WHEN b.payment_status = 'paid' THEN b.total_amount END), 0) AS revenue
             FROM bus_routes r
             LEFT JOIN bookings b ON b.route_id = r.id AND b.status <> 'cancelled'
             GROUP BY r.id, r.from_location, r.to_location
             ORDER BY bookings DESC, r.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}
