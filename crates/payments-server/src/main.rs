use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments_server::{routes, PaymentMetrics, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let metrics = match PaymentMetrics::new() {
        Ok(metrics) => web::Data::new(metrics),
        Err(e) => {
            tracing::error!("failed to register metrics: {e}");
            std::process::exit(1);
        }
    };

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(metrics.clone())
            .configure(routes::configure)
    });

    let server = match server.bind((config.bind_host.as_str(), config.port)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(
                "failed to bind {}:{}: {e}",
                config.bind_host,
                config.port
            );
            return Err(e);
        }
    };

    tracing::info!(
        "payments server listening on {}:{}",
        config.bind_host,
        config.port
    );
    tracing::info!("  POST /payments");
    tracing::info!("  GET  /metrics");

    server.run().await
}
