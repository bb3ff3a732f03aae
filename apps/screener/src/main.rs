mod config;
mod errors;
mod extraction;
mod inference_client;
mod models;
mod routes;
mod scoring;
mod screening;
mod sections;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::inference_client::InferenceClient;
use crate::routes::build_router;
use crate::scoring::build_scorer;
use crate::screening::MatchPipeline;
use crate::sections::{HttpEntityClassifier, SectionResolver};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the shared inference client
    let inference = InferenceClient::new(config.collaborator_timeout, config.inference_max_retries)?;

    // Initialize collaborators (constructed once, injected into the pipeline)
    let classifier = Arc::new(HttpEntityClassifier::new(
        inference.clone(),
        config.ner_service_url.clone(),
    ));
    info!("Entity classifier: {}", config.ner_service_url);

    let scorer = build_scorer(&config, inference);
    info!(
        "Similarity scorer: {} via {} (score range {:?})",
        config.scoring_strategy,
        config.scoring_service_url,
        config.scoring_strategy.score_range()
    );

    let pipeline = MatchPipeline::new(
        classifier,
        SectionResolver::new(config.drop_blank_spans),
        scorer,
        config.collaborator_timeout,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
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
