mod classification;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::classification::index::build_index;
use crate::classification::matcher::TitleClassifier;
use crate::classification::taxonomy::Taxonomy;
use crate::classification::tuning::MatchTuning;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Qualmap API v{}", env!("CARGO_PKG_VERSION"));

    // Load the taxonomy and build the index once; an invalid document aborts startup
    let taxonomy = Taxonomy::load(&config.taxonomy_path)
        .with_context(|| format!("Failed to load taxonomy from {}", config.taxonomy_path))?;
    let index = build_index(&taxonomy);

    let tuning = MatchTuning::default()
        .with_thresholds(config.fuzzy_threshold, config.rematch_threshold);
    info!(
        "Matcher tuning {}: fuzzy threshold {}, re-match threshold {}",
        tuning.version, tuning.fuzzy_threshold, tuning.rematch_threshold
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        classifier: Arc::new(TitleClassifier::new(index, tuning)),
        categories: Arc::new(taxonomy.summaries()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
