//! Connection feasibility HTTP microservice.
//!
//! # Configuration
//!
//! - `TELECOM_DATA_PATH` - Path to the inventory database (default: /data/telecom.db)
//! - `TELECOM_ALLOW_DEFAULT_POINT` - Answer for the default point when coordinates are omitted (default: true)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use tracing::{error, info};

use telecom_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("connection");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(
        data_path = %config.data_path.display(),
        port = config.port,
        allow_default_point = config.allow_default_point,
        "starting connection service"
    );

    let state = AppState::load(&config.data_path)
        .map_err(|e| {
            error!(error = %e, path = %config.data_path.display(), "failed to load application state");
            e
        })?
        .with_default_point(config.allow_default_point);

    let app = telecom_service_connection::app(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
