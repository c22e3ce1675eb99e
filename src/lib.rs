// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod item;
pub mod metrics;
pub mod ranking;
pub mod scoring;
pub mod serving;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::error::RankerError;
pub use crate::item::{Item, Label};
pub use crate::store::{ItemStore, MemoryStore};
