//! # Comment feed
//! Submission → classification → append, plus the read side the UI renders:
//! filtered newest-first listing, aggregate stats and the "helpful" toggle.
//!
//! Classification runs before the store is touched, so a slow or failing
//! store never changes the label a comment gets.
//!
//! Liked state is ephemeral and keyed by an opaque session string. There is
//! no per-voter dedup across sessions: a fresh session can like again.
//! A session with nothing liked holds no entry, and keys are length-capped.

use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::aggregate::{aggregate, filter_comments, AggregateStats, FeedFilter};
use crate::comment::{Comment, CommentId, NewComment, SubmitError};
use crate::config::AnalyzerConfig;
use crate::sentiment::{Analysis, SentimentAnalyzer};
use crate::store::CommentStore;

/// Longest accepted session key, in bytes.
pub const MAX_SESSION_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub id: CommentId,
    pub like_count: u32,
    pub liked: bool,
}

pub struct CommentFeed {
    analyzer: SentimentAnalyzer,
    store: Arc<dyn CommentStore>,
    top_n: usize,
    sessions: Mutex<HashMap<String, HashSet<CommentId>>>,
}

impl CommentFeed {
    pub fn new(analyzer: SentimentAnalyzer, store: Arc<dyn CommentStore>, top_n: usize) -> Self {
        Self {
            analyzer,
            store,
            top_n: top_n.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig, store: Arc<dyn CommentStore>) -> Self {
        Self::new(cfg.analyzer(), store, cfg.limits.top_keywords)
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn analyzer(&self) -> &SentimentAnalyzer {
        &self.analyzer
    }

    /// Stateless analysis, nothing is stored.
    pub fn analyze(&self, text: &str) -> Analysis {
        self.analyzer.analyze(text)
    }

    pub fn submit(&self, input: NewComment) -> Result<Comment, SubmitError> {
        let valid = match input.validate() {
            Ok(v) => v,
            Err(e) => {
                metrics::counter!("comments_rejected_total").increment(1);
                debug!(target: "feed", error = %e, "submission rejected");
                return Err(e);
            }
        };

        let analysis = self.analyzer.analyze(&valid.text);
        let comment = Comment {
            id: self.store.next_id(),
            author_name: valid.author_name,
            rating: valid.rating,
            sentiment: analysis.sentiment,
            score: analysis.score.value,
            created_at: Utc::now(),
            like_count: 0,
            text: valid.text,
        };

        metrics::counter!("comments_classified_total", "label" => comment.sentiment.as_str())
            .increment(1);
        // Raw text never reaches the logs.
        info!(
            target: "feed",
            id = %comment.id,
            text_id = %anon_hash(&comment.text),
            label = comment.sentiment.as_str(),
            score = comment.score,
            veto = ?analysis.score.veto,
            hits = analysis.score.hits.len(),
            "comment classified"
        );

        self.store.append(comment.clone());
        Ok(comment)
    }

    /// Newest first.
    pub fn list(&self, filter: FeedFilter) -> Vec<Comment> {
        let mut all = self.store.list();
        all.reverse();
        filter_comments(&all, filter)
    }

    pub fn stats(&self) -> AggregateStats {
        let mut all = self.store.list();
        all.reverse();
        aggregate(&all, self.top_n)
    }

    /// Flip `session`'s like on `id`: +1 the first time, −1 when toggled back.
    pub fn toggle_like(&self, session: &str, id: CommentId) -> Result<LikeOutcome, SubmitError> {
        let session = session.trim();
        if session.is_empty() {
            return Err(SubmitError::EmptySession);
        }
        if session.len() > MAX_SESSION_LEN {
            return Err(SubmitError::SessionTooLong(MAX_SESSION_LEN));
        }
        if self.store.get(id).is_none() {
            return Err(SubmitError::UnknownComment(id));
        }

        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let was_liked = sessions.get(session).is_some_and(|ids| ids.contains(&id));
        let delta = if was_liked { -1 } else { 1 };
        let like_count = self
            .store
            .adjust_likes(id, delta)
            .ok_or(SubmitError::UnknownComment(id))?;
        if was_liked {
            if let Some(ids) = sessions.get_mut(session) {
                ids.remove(&id);
                if ids.is_empty() {
                    sessions.remove(session);
                }
            }
        } else {
            sessions.entry(session.to_string()).or_default().insert(id);
        }
        drop(sessions);

        metrics::counter!("comment_likes_toggled_total").increment(1);
        debug!(target: "feed", %id, liked = !was_liked, like_count, "like toggled");
        Ok(LikeOutcome {
            id,
            like_count,
            liked: !was_liked,
        })
    }
}

/// Short, stable, non-reversible id for a piece of text (first 6 bytes of SHA-256).
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
