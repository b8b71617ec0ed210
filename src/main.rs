use bus_booking_system::config::AppConfig;
use bus_booking_system::db::{self, Database};
use dotenv::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_booking_system=info,rocket=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Connect to the database
    let database = Database::new(&config.database_url, config.db_max_connections).await?;
    db::init_schema(database.get_pool()).await?;
    tracing::info!(max_connections = config.db_max_connections, "connected to database");

    let _rocket = bus_booking_system::build_rocket(database.get_pool().clone(), config)
        .launch()
        .await?;
    Ok(())
}
