// src/ingest/types.rs
use anyhow::Result;

/// One candidate article from a feed reader. `normalized_title` is the text
/// the classifier sees — a translated or canonicalized form that may simply
/// equal `title`. `published_raw` keeps the feed's textual timestamp; the
/// Ingestion Gate parses it and tolerates malformed values.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub published_raw: Option<String>,
    pub normalized_title: String,
}

/// Feed reader collaborator. The core never fetches network resources
/// itself; providers hand it candidate tuples.
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>>;
    fn name(&self) -> &'static str;
}
