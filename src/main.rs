//! Real-Time Recommendation Engine
//!
//! Event-driven recommendation update pipeline handling:
//! - Learner interaction event ingestion with validation and backpressure
//! - Session/state tracking with debounced recommendation recomputation
//! - TTL and version-stamped recommendation cache
//! - Best-effort update fan-out to subscribers

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use connectors::{
    AnalyticsConfig, HttpAnalyticsClient, HttpPersonalizationClient, PersonalizationConfig,
};
use pipeline::{EngineConfig, RecommendationEngine};
use telemetry::{init_tracing_from_env, metrics};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    engine: EngineConfig,

    #[serde(default)]
    analytics: AnalyticsConfig,

    #[serde(default)]
    personalization: PersonalizationConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!(
        "Starting recommendation engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = load_config()?;

    info!(
        analytics_url = %config.analytics.base_url,
        personalization_url = %config.personalization.base_url,
        queue_capacity = config.engine.queue_capacity,
        debounce_secs = config.engine.trigger.debounce_secs,
        "Loaded configuration"
    );

    // Collaborator clients (mock mode unless URLs are configured)
    let analytics = Arc::new(
        HttpAnalyticsClient::new(config.analytics.clone())
            .context("Failed to create analytics client")?,
    );
    let personalization = Arc::new(
        HttpPersonalizationClient::new(config.personalization.clone())
            .context("Failed to create personalization client")?,
    );

    // Build and start the engine
    let engine = RecommendationEngine::new(config.engine.clone(), analytics, personalization);
    let _handles = engine.start();

    // Run until a shutdown signal arrives
    shutdown_signal().await;

    info!("Shutting down...");
    info!(snapshot = ?metrics().snapshot(), "Final engine metrics");
    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("RECOMMENDER")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested collaborator URLs from environment
    // The config crate's nested parsing doesn't work reliably with
    // underscored field names
    if let Ok(url) = std::env::var("RECOMMENDER_ANALYTICS_URL") {
        config.analytics.base_url = url;
    }
    if let Ok(url) = std::env::var("RECOMMENDER_PERSONALIZATION_URL") {
        config.personalization.base_url = url;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
