//! Comment records and submission validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::classifier::SentimentLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Caller-supplied submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub author_name: String,
    pub text: String,
    #[serde(default = "default_rating")]
    pub rating: i64,
}

fn default_rating() -> i64 {
    MAX_RATING as i64
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("author name is required")]
    EmptyAuthor,
    #[error("comment text is required")]
    EmptyText,
    #[error("session id is required")]
    EmptySession,
    #[error("session id longer than {0} bytes")]
    SessionTooLong(usize),
    #[error("comment {0} not found")]
    UnknownComment(CommentId),
}

/// A trimmed, validated submission ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub author_name: String,
    pub text: String,
    pub rating: u8,
}

impl NewComment {
    pub fn new(author_name: impl Into<String>, text: impl Into<String>, rating: i64) -> Self {
        Self {
            author_name: author_name.into(),
            text: text.into(),
            rating,
        }
    }

    pub fn validate(&self) -> Result<ValidComment, SubmitError> {
        let author_name = self.author_name.trim();
        if author_name.is_empty() {
            return Err(SubmitError::EmptyAuthor);
        }
        let text = self.text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyText);
        }
        Ok(ValidComment {
            author_name: author_name.to_string(),
            text: text.to_string(),
            rating: clamp_rating(self.rating),
        })
    }
}

pub fn clamp_rating(r: i64) -> u8 {
    r.clamp(MIN_RATING as i64, MAX_RATING as i64) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author_name: String,
    pub text: String,
    pub rating: u8,
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
}

impl Comment {
    /// Avatar initials: two letters of a single name, first letters of the
    /// first two words otherwise, "U" for a blank name.
    pub fn initials(&self) -> String {
        initials(&self.author_name)
    }
}

pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => "U".to_string(),
        [one] => one.chars().take(2).collect::<String>().to_uppercase(),
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}
