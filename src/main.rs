use std::net::TcpListener;
use booking_api::configuration::get_configuration;
use booking_api::startup::{run, Stores};
use booking_api::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    // Bad configuration (e.g. missing or shared JWT secrets) aborts startup
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let stores = match &configuration.database {
        Some(database) => {
            tracing::info!("Connecting to database");
            Stores::postgres(database).await.map_err(|e| {
                tracing::error!("Failed to set up database: {}", e);
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "Database connection error",
                )
            })?
        }
        None => {
            tracing::warn!("No database configured, using in-memory store");
            Stores::in_memory()
        }
    };

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, stores, &configuration.jwt)?;
    server.await
}
