// src/ingest/scheduler.rs
// The periodic producer half of the system: poll all feeds, push candidates
// through the Ingestion Gate, then run one rescoring pass over the whole
// store. Long-lived; coordinates with request handlers only through the
// store's atomic operations.

use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::config::ConfigHandle;
use crate::ingest::types::FeedProvider;
use crate::ranking;
use crate::store::ItemStore;

/// Spawn the background ingest+rescore sweep. Never exits under normal
/// operation.
pub fn spawn_poll_loop(
    store: Arc<dyn ItemStore>,
    config: ConfigHandle,
    providers: Arc<Vec<Box<dyn FeedProvider>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval_secs = config.snapshot().interval_secs;
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            run_sweep_once(store.as_ref(), &config, &providers).await;
        }
    })
}

/// One full sweep: fetch from every provider, ingest the batch, rescore.
/// Provider failures are logged and skipped; one dead feed must not stall
/// the others.
pub async fn run_sweep_once(
    store: &dyn ItemStore,
    config: &ConfigHandle,
    providers: &[Box<dyn FeedProvider>],
) {
    let mut candidates = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => candidates.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    let report = crate::ingest::ingest_batch(store, candidates).await;
    let updated = ranking::rescore_all(store, &config.snapshot().fit_params()).await;

    counter!("ingest_sweeps_total").increment(1);
    gauge!("ingest_last_sweep_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    tracing::info!(
        target: "ingest",
        created = report.created,
        skipped = report.skipped,
        rescored = updated,
        "sweep complete"
    );
}
