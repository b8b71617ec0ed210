use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

// Database connection manager
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    // Get a reference to the connection pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Tables in dependency order. `booking_seats` holds one row per seat of
/// every booking that still occupies its seats; its unique key is what keeps
/// two bookings from sharing a seat on the same bus and day.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL,
        role VARCHAR(32) NOT NULL DEFAULT 'user',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        two_factor_enabled BOOLEAN NOT NULL DEFAULT FALSE,
        two_factor_secret VARCHAR(255) NULL,
        last_login TIMESTAMP NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT users_email_uindex UNIQUE (email)
    )",
    "CREATE TABLE IF NOT EXISTS bus_routes (
        id INT AUTO_INCREMENT PRIMARY KEY,
        from_location VARCHAR(100) NOT NULL,
        to_location VARCHAR(100) NOT NULL,
        price DECIMAL(10,2) NOT NULL,
        distance_km INT NOT NULL,
        duration_minutes INT NOT NULL,
        pickup_locations TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS buses (
        id INT AUTO_INCREMENT PRIMARY KEY,
        bus_number VARCHAR(20) NOT NULL,
        bus_type VARCHAR(20) NOT NULL,
        capacity INT NOT NULL,
        amenities TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        route_id INT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT buses_bus_number_uindex UNIQUE (bus_number),
        CONSTRAINT buses_route_id_fk
            FOREIGN KEY (route_id) REFERENCES bus_routes(id)
    )",
    "CREATE TABLE IF NOT EXISTS bookings (
        id INT AUTO_INCREMENT PRIMARY KEY,
        booking_reference VARCHAR(36) NOT NULL,
        user_id INT NULL,
        bus_id INT NOT NULL,
        route_id INT NOT NULL,
        passenger_name VARCHAR(100) NOT NULL,
        passenger_email VARCHAR(255) NOT NULL,
        passenger_phone VARCHAR(32) NOT NULL,
        pickup_location VARCHAR(200) NULL,
        seat_numbers TEXT NOT NULL,
        travel_date DATE NOT NULL,
        total_amount DECIMAL(10,2) NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'confirmed',
        payment_status VARCHAR(20) NOT NULL DEFAULT 'pending',
        booking_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        notes TEXT NULL,
        CONSTRAINT bookings_reference_uindex UNIQUE (booking_reference),
        INDEX bookings_bus_date_index (bus_id, travel_date),
        CONSTRAINT bookings_user_id_fk
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL,
        CONSTRAINT bookings_bus_id_fk
            FOREIGN KEY (bus_id) REFERENCES buses(id),
        CONSTRAINT bookings_route_id_fk
            FOREIGN KEY (route_id) REFERENCES bus_routes(id)
    )",
    "CREATE TABLE IF NOT EXISTS booking_seats (
        booking_id INT NOT NULL,
        bus_id INT NOT NULL,
        travel_date DATE NOT NULL,
        seat_number INT NOT NULL,
        PRIMARY KEY (booking_id, seat_number),
        CONSTRAINT booking_seats_bus_date_seat_uindex UNIQUE (bus_id, travel_date, seat_number),
        CONSTRAINT booking_seats_booking_id_fk
            FOREIGN KEY (booking_id) REFERENCES bookings(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS feedback (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        rating INT NOT NULL,
        message TEXT NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'pending',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS inquiries (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(32) NULL,
        subject VARCHAR(200) NOT NULL,
        message TEXT NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'new',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
];

pub async fn init_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for create_sql in SCHEMA {
        sqlx::query(create_sql).execute(pool).await?;
    }
    tracing::info!(tables = SCHEMA.len(), "database schema ready");
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
