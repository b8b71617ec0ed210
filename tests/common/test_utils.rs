use bus_booking_system::db;
use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

// Name of the database once it has been created for this test binary
static TEST_DB: OnceCell<Mutex<Option<String>>> = OnceCell::new();

#[macro_export]
macro_rules! test_println {
    ($name:expr, $($arg:tt)*) => {
        println!("[{}] {}", $name, format!($($arg)*))
    };
}

pub struct TestDb;

// Server part of ADMIN_DATABASE_URL, without the database name
fn server_url() -> Option<String> {
    dotenv().ok();
    let db_url = env::var("ADMIN_DATABASE_URL").ok()?;
    Some(db_url.split('/').take(3).collect::<Vec<&str>>().join("/"))
}

async fn create_connection_pool(url: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new().max_connections(20).connect(url).await
}

impl TestDb {
    /// Pool on a throwaway database shared by every test of the binary.
    /// The database is created on first use; each test runs on its own
    /// runtime, so each call opens its own pool. Database tests are
    /// `#[ignore]`d and run with `cargo test -- --ignored`.
    pub async fn get_instance() -> Result<Pool, Error> {
        let server = server_url().ok_or_else(|| {
            Error::Configuration("ADMIN_DATABASE_URL must be set for database tests".into())
        })?;

        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        // Only create one database for all tests in one run
        if let Some(db_name) = guard.as_ref() {
            let pool = create_connection_pool(&format!("{}/{}", server, db_name)).await?;
            return Ok(pool);
        }

        let db_name = Self::database_name();
        println!("Creating test database {}", db_name);
        let admin_pool = create_connection_pool(&server).await?;
        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = create_connection_pool(&format!("{}/{}", server, db_name)).await?;
        db::init_schema(&pool).await?;
        *guard = Some(db_name);
        Ok(pool)
    }

    fn database_name() -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("bus_booking_test_{}_{}", std::process::id(), nanos % 1_000_000)
    }

    // Drop the database after the test binary finishes (not after each test)
    pub async fn cleanup_database() -> Result<(), Error> {
        let Some(server) = server_url() else {
            return Ok(());
        };
        if let Some(test_db) = TEST_DB.get() {
            if let Some(db_name) = test_db.lock().await.take() {
                println!("Dropping database: {}", db_name);
                let admin_pool = create_connection_pool(&server).await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db_name))
                    .execute(&admin_pool)
                    .await?;
            }
        }
        Ok(())
    }

    /// Blocking variant for `#[dtor]` hooks, which run outside any runtime.
    pub fn cleanup_database_sync() -> Result<(), Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;
        runtime.block_on(Self::cleanup_database())
    }
}
