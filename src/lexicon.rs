//! Curated sentiment vocabulary for sweet-shop comments.
//!
//! The data lives in `sentiment_lexicon.json` at the crate root and is embedded
//! at compile time, parsed once on first use and never mutated afterwards.
//!
//! Entries are normalized exactly like comment text: lower-cased, apostrophes
//! dropped, hyphens turned into spaces. A normalized entry with one word is a
//! unigram term, with two words a bigram phrase. Strong terms are folded into
//! their polarity set so a lookup never misses them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    let file: LexiconFile = serde_json::from_str(raw).expect("valid sentiment lexicon");
    Lexicon::from_file(file)
});

/// Shared, process-wide lexicon.
pub fn lexicon() -> &'static Lexicon {
    &LEXICON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Two-tier strength: strong terms outweigh generic ones of the same polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Base,
    Strong,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive: Vec<String>,
    negative: Vec<String>,
    #[serde(default)]
    strong_positive: Vec<String>,
    #[serde(default)]
    strong_negative: Vec<String>,
    #[serde(default)]
    veto_phrases: Vec<String>,
    #[serde(default)]
    fallback_negative: Vec<String>,
    #[serde(default)]
    negators: Vec<String>,
    #[serde(default)]
    trailing_negators: Vec<String>,
}

#[derive(Debug)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    strong_positive: HashSet<String>,
    strong_negative: HashSet<String>,
    veto_phrases: Vec<String>,
    fallback_negative: Vec<String>,
    negators: HashSet<String>,
    trailing_negators: HashSet<String>,
}

impl Lexicon {
    fn from_file(f: LexiconFile) -> Self {
        let set = |v: Vec<String>| -> HashSet<String> {
            v.iter()
                .map(|s| normalize_term(s))
                .filter(|s| !s.is_empty())
                .collect()
        };
        let list = |v: Vec<String>| -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(v.len());
            for s in v.iter().map(|s| normalize_phrase(s)) {
                if !s.is_empty() && !out.contains(&s) {
                    out.push(s);
                }
            }
            out
        };

        let strong_positive = set(f.strong_positive);
        let strong_negative = set(f.strong_negative);
        let mut positive = set(f.positive);
        let mut negative = set(f.negative);
        positive.extend(strong_positive.iter().cloned());
        negative.extend(strong_negative.iter().cloned());

        Self {
            positive,
            negative,
            strong_positive,
            strong_negative,
            veto_phrases: list(f.veto_phrases),
            fallback_negative: list(f.fallback_negative),
            negators: set(f.negators),
            trailing_negators: set(f.trailing_negators),
        }
    }

    pub fn is_positive(&self, term: &str) -> bool {
        self.positive.contains(term)
    }

    pub fn is_negative(&self, term: &str) -> bool {
        self.negative.contains(term)
    }

    /// True if the term is in either polarity set.
    pub fn contains(&self, term: &str) -> bool {
        self.is_positive(term) || self.is_negative(term)
    }

    /// Strength tier of a term within the given polarity.
    pub fn strength(&self, term: &str, polarity: Polarity) -> Strength {
        let strong = match polarity {
            Polarity::Positive => &self.strong_positive,
            Polarity::Negative => &self.strong_negative,
        };
        if strong.contains(term) {
            Strength::Strong
        } else {
            Strength::Base
        }
    }

    /// Negation marker looked up before a term ("not", "never", "no", "dont", ...).
    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token)
    }

    /// Negation marker that also inverts the term right before it ("good not great").
    pub fn is_trailing_negator(&self, token: &str) -> bool {
        self.trailing_negators.contains(token)
    }

    /// First veto phrase contained in already-normalized text.
    pub fn veto_in(&self, normalized: &str) -> Option<&str> {
        self.veto_phrases
            .iter()
            .find(|p| normalized.contains(p.as_str()))
            .map(String::as_str)
    }

    /// True if any zero-score negative hint is contained in normalized text.
    pub fn has_fallback_negative(&self, normalized: &str) -> bool {
        self.fallback_negative
            .iter()
            .any(|p| normalized.contains(p.as_str()))
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

/// Lower-case and drop apostrophes so contractions collapse into one token.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '’' | '‘'))
        .collect()
}

/// Normalize a lexicon entry into the shape tokens are joined into:
/// words of `[a-z0-9]` separated by single spaces.
fn normalize_term(term: &str) -> String {
    normalize_text(term)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Substring phrases keep their punctuation-free spacing but are not re-tokenized.
fn normalize_phrase(phrase: &str) -> String {
    normalize_text(phrase)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicon_loads() {
        let lx = lexicon();
        assert!(lx.positive_len() > 100);
        assert!(lx.negative_len() > 100);
        assert!(lx.is_positive("fresh"));
        assert!(lx.is_negative("stale"));
    }

    #[test]
    fn strong_terms_are_part_of_their_polarity() {
        let lx = lexicon();
        assert!(lx.is_negative("hate"));
        assert_eq!(lx.strength("hate", Polarity::Negative), Strength::Strong);
        assert_eq!(lx.strength("amazing", Polarity::Positive), Strength::Strong);
        assert_eq!(lx.strength("good", Polarity::Positive), Strength::Base);
        assert_eq!(lx.strength("bad", Polarity::Negative), Strength::Base);
    }

    #[test]
    fn hyphens_and_apostrophes_are_normalized() {
        let lx = lexicon();
        assert!(lx.is_negative("rip off"));
        assert!(lx.is_negative("stale taste"));
        assert!(lx.is_negative("cant"));
        assert!(lx.is_positive("kid friendly"));
        assert!(!lx.is_negative("rip-off"));
    }

    #[test]
    fn lists_are_not_disjoint() {
        // "soft" is praise for a barfi and a complaint for a cookie.
        let lx = lexicon();
        assert!(lx.is_positive("soft") && lx.is_negative("soft"));
    }

    #[test]
    fn veto_lookup_on_normalized_text() {
        let lx = lexicon();
        let t = normalize_text("Don't buy, seriously");
        assert_eq!(lx.veto_in(&t), Some("dont buy"));
        assert_eq!(lx.veto_in("lovely box"), None);
    }

    #[test]
    fn normalize_text_drops_apostrophes() {
        assert_eq!(normalize_text("Isn’t GREAT"), "isnt great");
    }
}
