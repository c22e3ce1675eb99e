// src/ingest/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};
use tracing::{debug, warn};

use crate::item::Item;
use crate::store::{CreateOutcome, ItemStore, NewItem};

use self::types::Candidate;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_created_total", "Items created from candidates.");
        describe_counter!(
            "ingest_duplicate_total",
            "Candidates skipped by the exact-title dedup check."
        );
        describe_counter!(
            "ingest_rejected_total",
            "Candidates rejected for an empty title or link."
        );
        describe_counter!(
            "ingest_bad_timestamp_total",
            "Candidates whose published timestamp failed to parse."
        );
    });
}

/// Why a candidate was not turned into an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An item with this exact title already exists. Titles differing only
    /// by whitespace, punctuation, or case are distinct items; accepted
    /// limitation of the exact-match dedup key.
    DuplicateTitle,
    /// Violates the non-empty title/link input contract.
    EmptyTitleOrLink,
}

#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Created(Item),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    pub created: usize,
    pub skipped: usize,
}

/// Parse a feed's textual publish timestamp (RFC 2822: day-of-week, day,
/// month name, year, time, zone). The literal zone token `GMT` is
/// normalized to `+0000` first — RFC 2822 parsers reject the obsolete name.
/// Malformed input yields `None`; ingestion still succeeds without a
/// timestamp.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replace("GMT", "+0000");
    let odt = OffsetDateTime::parse(&normalized, &Rfc2822).ok()?;
    DateTime::<Utc>::from_timestamp(odt.unix_timestamp(), 0)
}

/// Ingestion Gate for a single candidate. Dedup check-then-create is atomic
/// per title (store contract), so concurrent ingestions of one title create
/// exactly one item. New items start with no label, no score, and zero
/// exposure. No rescoring happens here; the caller triggers the orchestrator
/// after a full batch.
pub async fn ingest(store: &dyn ItemStore, candidate: Candidate) -> IngestOutcome {
    ensure_metrics_described();

    if candidate.title.is_empty() || candidate.link.is_empty() {
        warn!(target: "ingest", "candidate rejected: empty title or link");
        counter!("ingest_rejected_total").increment(1);
        return IngestOutcome::Skipped(SkipReason::EmptyTitleOrLink);
    }

    let published_at = match candidate.published_raw.as_deref() {
        Some(raw) => {
            let parsed = parse_published(raw);
            if parsed.is_none() {
                debug!(target: "ingest", raw, "malformed published timestamp, storing without one");
                counter!("ingest_bad_timestamp_total").increment(1);
            }
            parsed
        }
        None => None,
    };

    let normalized_title = if candidate.normalized_title.is_empty() {
        candidate.title.clone()
    } else {
        candidate.normalized_title
    };

    let new = NewItem {
        title: candidate.title,
        normalized_title,
        link: candidate.link,
        published_at,
    };

    match store.create_if_absent(new).await {
        CreateOutcome::Created(item) => {
            counter!("ingest_created_total").increment(1);
            IngestOutcome::Created(item)
        }
        CreateOutcome::DuplicateTitle => {
            counter!("ingest_duplicate_total").increment(1);
            IngestOutcome::Skipped(SkipReason::DuplicateTitle)
        }
    }
}

/// Ingest a whole batch; reports how many candidates were created vs
/// skipped (duplicates and contract violations both count as skipped).
pub async fn ingest_batch(store: &dyn ItemStore, candidates: Vec<Candidate>) -> IngestReport {
    let mut report = IngestReport::default();
    for candidate in candidates {
        match ingest(store, candidate).await {
            IngestOutcome::Created(_) => report.created += 1,
            IngestOutcome::Skipped(_) => report.skipped += 1,
        }
    }
    report
}
