// src/store.rs
// Item Store collaborator: the core's only access to durable article state.
// The in-memory implementation is the default; swapping in a database-backed
// store only requires implementing `ItemStore`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::RankerError;
use crate::item::{Item, Label};

/// Fields the Ingestion Gate supplies for a new item. Everything else
/// (label, score, exposure) starts unset per the item lifecycle.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub normalized_title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Outcome of the atomic create-if-title-absent primitive.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(Item),
    DuplicateTitle,
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Atomic per title: two concurrent creates of the same title must not
    /// both succeed.
    async fn create_if_absent(&self, new: NewItem) -> CreateOutcome;

    async fn get(&self, id: i64) -> Option<Item>;

    async fn list_all(&self) -> Vec<Item>;

    /// Items eligible for serving: label ∈ {unset, neutral, negative} AND
    /// exposure_count below the given limit. Unordered; the serving query
    /// owns ranking.
    async fn list_unresolved(&self, exposure_limit: u32) -> Vec<Item>;

    /// Items the user has resolved as read: label ∈ {neutral, positive}.
    async fn list_read(&self) -> Vec<Item>;

    /// Items with any label set; the classifier's training corpus.
    async fn list_labeled(&self) -> Vec<Item>;

    async fn set_label(&self, id: i64, label: Label) -> Result<(), RankerError>;

    /// Applies a rescoring pass as one logical batch; returns how many items
    /// were updated. Unknown ids are skipped (the item may have been removed
    /// administratively between snapshot and write).
    async fn apply_scores(&self, updates: Vec<(i64, f64)>) -> usize;

    /// Atomic per item; serving the same item from concurrent calls must not
    /// lose increments.
    async fn increment_exposure(&self, ids: &[i64]);
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_title: HashMap<String, i64>,
    items: BTreeMap<i64, Item>,
}

/// In-memory `ItemStore`. A single `tokio::sync::RwLock` covers all state,
/// so check-then-create and exposure increments are atomic, and readers
/// always observe a consistent snapshot.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_if_absent(&self, new: NewItem) -> CreateOutcome {
        let mut g = self.inner.write().await;
        if g.by_title.contains_key(&new.title) {
            return CreateOutcome::DuplicateTitle;
        }
        g.next_id += 1;
        let id = g.next_id;
        let item = Item {
            id,
            title: new.title.clone(),
            normalized_title: new.normalized_title,
            link: new.link,
            published_at: new.published_at,
            label: None,
            score: None,
            exposure_count: 0,
        };
        g.by_title.insert(new.title, id);
        g.items.insert(id, item.clone());
        CreateOutcome::Created(item)
    }

    async fn get(&self, id: i64) -> Option<Item> {
        self.inner.read().await.items.get(&id).cloned()
    }

    async fn list_all(&self) -> Vec<Item> {
        self.inner.read().await.items.values().cloned().collect()
    }

    async fn list_unresolved(&self, exposure_limit: u32) -> Vec<Item> {
        self.inner
            .read()
            .await
            .items
            .values()
            .filter(|it| it.is_unresolved() && it.exposure_count < exposure_limit)
            .cloned()
            .collect()
    }

    async fn list_read(&self) -> Vec<Item> {
        self.inner
            .read()
            .await
            .items
            .values()
            .filter(|it| matches!(it.label, Some(Label::Neutral) | Some(Label::Positive)))
            .cloned()
            .collect()
    }

    async fn list_labeled(&self) -> Vec<Item> {
        self.inner
            .read()
            .await
            .items
            .values()
            .filter(|it| it.label.is_some())
            .cloned()
            .collect()
    }

    async fn set_label(&self, id: i64, label: Label) -> Result<(), RankerError> {
        let mut g = self.inner.write().await;
        match g.items.get_mut(&id) {
            Some(it) => {
                it.label = Some(label);
                Ok(())
            }
            None => Err(RankerError::ItemNotFound(id)),
        }
    }

    async fn apply_scores(&self, updates: Vec<(i64, f64)>) -> usize {
        let mut g = self.inner.write().await;
        let mut applied = 0usize;
        for (id, score) in updates {
            if let Some(it) = g.items.get_mut(&id) {
                it.score = Some(score);
                applied += 1;
            }
        }
        applied
    }

    async fn increment_exposure(&self, ids: &[i64]) {
        let mut g = self.inner.write().await;
        for id in ids {
            if let Some(it) = g.items.get_mut(id) {
                it.exposure_count += 1;
            }
        }
    }
}
