// src/ranking.rs
// Ranking Orchestrator: the single entry point behind which the
// full-sweep rescoring strategy lives. Runs after a batch ingest, after
// every label-feedback event, and on explicit rebuild requests. If an
// incremental strategy ever replaces the full sweep, only this module
// changes.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::classifier::{self, FitParams};
use crate::scoring;
use crate::store::ItemStore;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ranking_passes_total", "Rescoring passes attempted.");
        describe_counter!(
            "ranking_skipped_total",
            "Passes skipped because the classifier could not be fit."
        );
        describe_gauge!("ranking_scored_items", "Items scored in the last pass.");
        describe_gauge!("ranking_train_samples", "Labeled items in the last fit.");
    });
}

/// Retrain from all labeled items and recompute every item's score.
///
/// Labeled and unlabeled items are both rescored, so the distribution stays
/// meaningful if a label is later changed. On `InsufficientData` every
/// existing score is left untouched and 0 is reported: a transient loss of
/// label diversity must not wipe a working ranking back to neutral.
///
/// The fit runs on a snapshot with no store lock held, so serving reads are
/// never blocked by a retrain.
pub async fn rescore_all(store: &dyn ItemStore, params: &FitParams) -> usize {
    ensure_metrics_described();
    counter!("ranking_passes_total").increment(1);

    let labeled = store.list_labeled().await;
    let samples: Vec<_> = labeled
        .iter()
        .filter_map(|it| it.label.map(|l| (it.normalized_title.clone(), l)))
        .collect();
    gauge!("ranking_train_samples").set(samples.len() as f64);

    let model = match classifier::fit(&samples, params) {
        Ok(m) => m,
        Err(e) => {
            info!(target: "ranking", reason = %e, "rescoring skipped, keeping prior scores");
            counter!("ranking_skipped_total").increment(1);
            return 0;
        }
    };

    let all = store.list_all().await;
    let updates: Vec<(i64, f64)> = all
        .iter()
        .map(|it| (it.id, scoring::score(&it.normalized_title, &model)))
        .collect();

    let updated = store.apply_scores(updates).await;
    gauge!("ranking_scored_items").set(updated as f64);
    info!(
        target: "ranking",
        trained_on = samples.len(),
        updated,
        "rescoring pass complete"
    );
    updated
}
