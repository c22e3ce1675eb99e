//! Feed Ranker — Binary Entrypoint
//! Boots the Axum HTTP server, the in-memory item store, and the background
//! feed-polling sweep that keeps the ranking fresh.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_ranker::api::{create_router, AppState};
use feed_ranker::config::{self, ConfigHandle};
use feed_ranker::ingest::providers::feed_rss::FeedRssProvider;
use feed_ranker::ingest::scheduler::spawn_poll_loop;
use feed_ranker::ingest::types::FeedProvider;
use feed_ranker::metrics::Metrics;
use feed_ranker::store::{ItemStore, MemoryStore};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - RANKER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("RANKER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ranker=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_providers(feeds: &[String]) -> Vec<Box<dyn FeedProvider>> {
    let mut providers: Vec<Box<dyn FeedProvider>> = Vec::new();

    #[cfg(feature = "ingest-http")]
    for url in feeds {
        providers.push(Box::new(FeedRssProvider::from_url(url.clone())));
    }
    #[cfg(not(feature = "ingest-http"))]
    let _ = feeds;

    // Fall back to the embedded sample feed when no HTTP feeds are wired up.
    #[cfg(feature = "ingest-fixtures")]
    if providers.is_empty() {
        let sample: &str = include_str!("../tests/fixtures/sample_rss.xml");
        providers.push(Box::new(FeedRssProvider::from_fixture(sample)));
    }

    providers
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = config::load_default().expect("Failed to load ranker config");
    let metrics = Metrics::init(cfg.exposure_limit);

    let store: Arc<dyn ItemStore> = Arc::new(MemoryStore::new());
    let config = ConfigHandle::new(cfg.clone());

    // Periodic producer: poll feeds, ingest, rescore. First tick fires
    // immediately, which doubles as the startup rescoring pass.
    let providers = Arc::new(build_providers(&cfg.feeds));
    spawn_poll_loop(store.clone(), config.clone(), providers);

    let state = AppState { store, config };
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
