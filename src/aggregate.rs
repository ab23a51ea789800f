//! Feed-wide statistics, recomputed from the full comment list on every call.
//!
//! Keywords are extracted by frequency: every comment of a polarity family is
//! tokenized with the scorer's tokenizer and lexicon tokens longer than two
//! characters are counted. Ties keep the order in which tokens were first seen.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classifier::SentimentLabel;
use crate::comment::Comment;
use crate::lexicon::lexicon;
use crate::sentiment::tokenize;

pub const DEFAULT_TOP_KEYWORDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: SentimentLabel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub positive_percent: f64,
    pub negative_percent: f64,
    pub top_positive_keywords: Vec<String>,
    pub top_negative_keywords: Vec<String>,
    /// One entry per label, most positive first (pie-chart slices).
    pub by_label: Vec<LabelCount>,
}

/// Feed tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Positive,
    Negative,
}

impl FeedFilter {
    pub fn accepts(self, label: SentimentLabel) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::Positive => label.is_positive(),
            FeedFilter::Negative => label.is_negative(),
        }
    }
}

pub fn filter_comments(comments: &[Comment], filter: FeedFilter) -> Vec<Comment> {
    comments
        .iter()
        .filter(|c| filter.accepts(c.sentiment))
        .cloned()
        .collect()
}

pub fn aggregate(comments: &[Comment], top_n: usize) -> AggregateStats {
    let total = comments.len();
    let mut by_label: Vec<LabelCount> = SentimentLabel::ALL
        .iter()
        .map(|&label| LabelCount { label, count: 0 })
        .collect();
    for c in comments {
        if let Some(slot) = by_label.iter_mut().find(|s| s.label == c.sentiment) {
            slot.count += 1;
        }
    }

    let positive_count = comments.iter().filter(|c| c.sentiment.is_positive()).count();
    let negative_count = comments.iter().filter(|c| c.sentiment.is_negative()).count();

    AggregateStats {
        total_count: total,
        positive_count,
        negative_count,
        neutral_count: total - positive_count - negative_count,
        positive_percent: percent(positive_count, total),
        negative_percent: percent(negative_count, total),
        top_positive_keywords: top_keywords(comments, FeedFilter::Positive, top_n),
        top_negative_keywords: top_keywords(comments, FeedFilter::Negative, top_n),
        by_label,
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Most frequent lexicon tokens among comments accepted by `family`.
pub fn top_keywords(comments: &[Comment], family: FeedFilter, top_n: usize) -> Vec<String> {
    let lx = lexicon();
    // (token, count) in first-seen order; index map for O(1) bumps.
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for c in comments.iter().filter(|c| family.accepts(c.sentiment)) {
        for tok in tokenize(&c.text) {
            if tok.chars().count() <= 2 || !lx.contains(&tok) {
                continue;
            }
            match index.get(&tok) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(tok.clone(), counts.len());
                    counts.push((tok, 1));
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(top_n).map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentId;
    use chrono::Utc;

    fn c(id: u64, text: &str, sentiment: SentimentLabel) -> Comment {
        Comment {
            id: CommentId(id),
            author_name: "Test".into(),
            text: text.into(),
            rating: 3,
            sentiment,
            score: 0.0,
            created_at: Utc::now(),
            like_count: 0,
        }
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let s = aggregate(&[], DEFAULT_TOP_KEYWORDS);
        assert_eq!(s.total_count, 0);
        assert_eq!(s.positive_percent, 0.0);
        assert_eq!(s.negative_percent, 0.0);
        assert!(s.top_positive_keywords.is_empty());
        assert_eq!(s.by_label.len(), 5);
        assert!(s.by_label.iter().all(|l| l.count == 0));
    }

    #[test]
    fn families_and_percentages() {
        let list = vec![
            c(1, "x", SentimentLabel::VeryPositive),
            c(2, "x", SentimentLabel::Positive),
            c(3, "x", SentimentLabel::Neutral),
            c(4, "x", SentimentLabel::VeryNegative),
        ];
        let s = aggregate(&list, 6);
        assert_eq!((s.positive_count, s.negative_count, s.neutral_count), (2, 1, 1));
        assert!((s.positive_percent - 50.0).abs() < 1e-9);
        assert!((s.negative_percent - 25.0).abs() < 1e-9);
        assert!(s.positive_percent + s.negative_percent <= 100.0);
    }

    #[test]
    fn keywords_rank_by_frequency_then_first_seen() {
        let list = vec![
            c(1, "Fresh and delicious", SentimentLabel::Positive),
            c(2, "so fresh, delicious too", SentimentLabel::VeryPositive),
            c(3, "very fresh, crunchy", SentimentLabel::Positive),
            c(4, "stale stale stale", SentimentLabel::Negative),
        ];
        let kw = top_keywords(&list, FeedFilter::Positive, 6);
        assert_eq!(kw, vec!["fresh", "delicious", "crunchy"]);
    }

    #[test]
    fn keywords_skip_short_and_unknown_tokens() {
        let list = vec![c(1, "ok gur box bad bad", SentimentLabel::Negative)];
        // "ok" is too short, "box" is not in the lexicon.
        assert_eq!(top_keywords(&list, FeedFilter::Negative, 6), vec!["bad", "gur"]);
    }

    #[test]
    fn keywords_respect_top_n() {
        let list = vec![c(
            1,
            "fresh tasty yummy crunchy crispy golden",
            SentimentLabel::Positive,
        )];
        assert_eq!(top_keywords(&list, FeedFilter::Positive, 2), vec!["fresh", "tasty"]);
    }

    #[test]
    fn filter_tabs() {
        let list = vec![
            c(1, "a", SentimentLabel::Positive),
            c(2, "b", SentimentLabel::Negative),
            c(3, "c", SentimentLabel::Neutral),
        ];
        assert_eq!(filter_comments(&list, FeedFilter::All).len(), 3);
        assert_eq!(filter_comments(&list, FeedFilter::Positive)[0].id, CommentId(1));
        assert_eq!(filter_comments(&list, FeedFilter::Negative)[0].id, CommentId(2));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let list = vec![c(1, "fresh", SentimentLabel::Positive)];
        assert_eq!(aggregate(&list, 6), aggregate(&list, 6));
    }
}
