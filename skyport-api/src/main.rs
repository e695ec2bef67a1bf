use anyhow::Context;
use skyport_api::{app, AppState};
use skyport_core::{
    EventPublisher, FlightService, FlightStore, InMemoryFlightStore, LoggingEventPublisher,
};
use skyport_store::{app_config::Config, seed, DbClient, EventProducer, PostgresFlightStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str =
    "skyport_api=debug,skyport_core=debug,tower_http=debug,axum::rejection=trace";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Skyport API on port {}", config.server.port);

    let store: Arc<dyn FlightStore> = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url).await.context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            Arc::new(PostgresFlightStore::new(db.pool.clone()))
        }
        None => {
            tracing::warn!("No database configured, flights are kept in memory");
            Arc::new(InMemoryFlightStore::new())
        }
    };

    let publisher: Arc<dyn EventPublisher> = match &config.kafka.brokers {
        Some(brokers) => Arc::new(
            EventProducer::new(brokers).context("Failed to create Kafka producer")?,
        ),
        None => Arc::new(LoggingEventPublisher),
    };

    if config.seed.enabled {
        seed::seed_sample_flights(store.as_ref())
            .await
            .context("Failed to seed sample flights")?;
    }

    let service = FlightService::new(store, publisher)
        .with_rules(config.business_rules.service_rules());
    let app = app(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
