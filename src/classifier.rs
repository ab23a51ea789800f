//! Maps a lexical score onto the five-step sentiment scale.

use serde::{Deserialize, Serialize};

use crate::lexicon::{lexicon, normalize_text};
use crate::sentiment::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLabel {
    /// Display order, most positive first.
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryPositive,
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::VeryNegative,
    ];

    pub fn is_positive(self) -> bool {
        matches!(self, SentimentLabel::VeryPositive | SentimentLabel::Positive)
    }

    pub fn is_negative(self) -> bool {
        matches!(self, SentimentLabel::Negative | SentimentLabel::VeryNegative)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::VeryPositive => "very_positive",
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::VeryNegative => "very_negative",
        }
    }
}

/// What an unmatched comment becomes when no fallback hint applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScoreDefault {
    /// Business default: unmoderated feed prefers false positives.
    #[default]
    Positive,
    Neutral,
}

impl From<ZeroScoreDefault> for SentimentLabel {
    fn from(d: ZeroScoreDefault) -> Self {
        match d {
            ZeroScoreDefault::Positive => SentimentLabel::Positive,
            ZeroScoreDefault::Neutral => SentimentLabel::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores strictly above this are `VeryPositive`.
    pub strong_positive: f64,
    /// Scores strictly below this are `VeryNegative`.
    pub strong_negative: f64,
    pub zero_score_default: ZeroScoreDefault,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong_positive: 3.0,
            strong_negative: -3.0,
            zero_score_default: ZeroScoreDefault::Positive,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// `text` is only consulted when the score is exactly zero.
    pub fn classify(&self, text: &str, score: &Score) -> SentimentLabel {
        if score.veto.is_some() {
            return SentimentLabel::VeryNegative;
        }
        let t = &self.thresholds;
        let v = score.value;
        if v > t.strong_positive {
            SentimentLabel::VeryPositive
        } else if v > 0.0 {
            SentimentLabel::Positive
        } else if v < t.strong_negative {
            SentimentLabel::VeryNegative
        } else if v < 0.0 {
            SentimentLabel::Negative
        } else {
            self.zero_score_fallback(text)
        }
    }

    fn zero_score_fallback(&self, text: &str) -> SentimentLabel {
        if text.contains('!') {
            return SentimentLabel::Positive;
        }
        if lexicon().has_fallback_negative(&normalize_text(text)) {
            return SentimentLabel::Negative;
        }
        self.thresholds.zero_score_default.into()
    }
}
