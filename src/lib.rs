// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod classifier;
pub mod comment;
pub mod config;
pub mod feed;
pub mod lexicon;
pub mod metrics;
pub mod sentiment;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate, top_keywords, AggregateStats, FeedFilter};
pub use crate::api::create_router;
pub use crate::classifier::{Classifier, SentimentLabel};
pub use crate::comment::{Comment, CommentId, NewComment, SubmitError};
pub use crate::feed::CommentFeed;
pub use crate::sentiment::{Analysis, Score, SentimentAnalyzer};

use axum::Router;

/// Build the full in-process router from the environment (no metrics recorder;
/// the binary installs that once per process).
pub fn app() -> anyhow::Result<Router> {
    let state = api::AppState::from_env()?;
    Ok(create_router(state))
}
