// tests/ranking_loop.rs
//
// The feedback loop end to end at the orchestrator level: neutral fallback
// below the training threshold, full-store rescoring once the threshold is
// crossed, and score stability on transient label-diversity loss.

use feed_ranker::classifier::FitParams;
use feed_ranker::ingest::{self, types::Candidate, IngestOutcome};
use feed_ranker::item::Label;
use feed_ranker::ranking;
use feed_ranker::store::{ItemStore, MemoryStore};

async fn seed(store: &MemoryStore, titles: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for t in titles {
        let c = Candidate {
            title: t.to_string(),
            link: format!("https://example.org/{}", ids.len()),
            published_raw: None,
            normalized_title: t.to_string(),
        };
        let IngestOutcome::Created(item) = ingest::ingest(store, c).await else {
            panic!("seed titles must be unique");
        };
        ids.push(item.id);
    }
    ids
}

const TITLES: &[&str] = &[
    "rust compiler release announced",
    "tokio async runtime update",
    "rust borrow checker explained",
    "celebrity gossip scandal erupts",
    "gossip drama feud continues",
    "celebrity scandal drama deepens",
    "rust web framework benchmarks",
    "weekend gossip roundup special",
];

#[tokio::test]
async fn below_threshold_leaves_every_score_unset() {
    let store = MemoryStore::new();
    let ids = seed(&store, TITLES).await;

    // 4 labels < min_train_samples (5): no model, no scores.
    store.set_label(ids[0], Label::Positive).await.unwrap();
    store.set_label(ids[1], Label::Positive).await.unwrap();
    store.set_label(ids[3], Label::Negative).await.unwrap();
    store.set_label(ids[4], Label::Negative).await.unwrap();

    let updated = ranking::rescore_all(&store, &FitParams::default()).await;
    assert_eq!(updated, 0);
    for it in store.list_all().await {
        assert!(it.score.is_none(), "no score expected for {}", it.title);
    }
}

#[tokio::test]
async fn fifth_label_triggers_scoring_of_every_item() {
    let store = MemoryStore::new();
    let ids = seed(&store, TITLES).await;

    store.set_label(ids[0], Label::Positive).await.unwrap();
    store.set_label(ids[1], Label::Positive).await.unwrap();
    store.set_label(ids[2], Label::Positive).await.unwrap();
    store.set_label(ids[3], Label::Negative).await.unwrap();
    assert_eq!(ranking::rescore_all(&store, &FitParams::default()).await, 0);

    // The 5th distinct label crosses the threshold; the pass must rescore
    // every item, labeled and unlabeled alike.
    store.set_label(ids[4], Label::Negative).await.unwrap();
    let updated = ranking::rescore_all(&store, &FitParams::default()).await;
    assert_eq!(updated, TITLES.len());

    let all = store.list_all().await;
    for it in &all {
        let s = it.score.expect("every item should be scored now");
        assert!((0.0..=100.0).contains(&s), "score out of bounds: {s}");
    }

    // Items the user never touched changed observably (None -> Some).
    let untouched = all.iter().find(|it| it.id == ids[6]).unwrap();
    assert!(untouched.score.is_some());

    // The learned ranking separates the two vocabularies.
    let rusty = all.iter().find(|it| it.id == ids[6]).unwrap();
    let gossipy = all.iter().find(|it| it.id == ids[7]).unwrap();
    assert!(
        rusty.score.unwrap() > gossipy.score.unwrap(),
        "expected {} > {}",
        rusty.score.unwrap(),
        gossipy.score.unwrap()
    );
}

#[tokio::test]
async fn uniform_labels_keep_prior_scores_intact() {
    let store = MemoryStore::new();
    let ids = seed(&store, TITLES).await;

    // Train a working model first.
    for &id in &ids[0..3] {
        store.set_label(id, Label::Positive).await.unwrap();
    }
    store.set_label(ids[3], Label::Negative).await.unwrap();
    store.set_label(ids[4], Label::Negative).await.unwrap();
    assert!(ranking::rescore_all(&store, &FitParams::default()).await > 0);
    let before: Vec<_> = store
        .list_all()
        .await
        .into_iter()
        .map(|it| (it.id, it.score))
        .collect();

    // Collapse label diversity: everything positive. Fitting now fails, and
    // the pass must not wipe the existing scores back to neutral.
    for &id in &ids[3..5] {
        store.set_label(id, Label::Positive).await.unwrap();
    }
    let updated = ranking::rescore_all(&store, &FitParams::default()).await;
    assert_eq!(updated, 0);

    let after: Vec<_> = store
        .list_all()
        .await
        .into_iter()
        .map(|it| (it.id, it.score))
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn two_class_corpus_scores_within_bounds() {
    let store = MemoryStore::new();
    let ids = seed(&store, TITLES).await;

    // Only neutral and positive observed: anchors {50, 100}, so every score
    // must land in the upper half.
    for &id in &ids[0..3] {
        store.set_label(id, Label::Positive).await.unwrap();
    }
    for &id in &ids[3..5] {
        store.set_label(id, Label::Neutral).await.unwrap();
    }
    assert_eq!(
        ranking::rescore_all(&store, &FitParams::default()).await,
        TITLES.len()
    );
    for it in store.list_all().await {
        let s = it.score.unwrap();
        assert!((50.0..=100.0).contains(&s), "{}: {s}", it.title);
    }
}
