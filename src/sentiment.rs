//! Lexicon scorer: turns one comment into a signed sentiment score.
//!
//! Order of evaluation:
//! 1) normalize (cap length, lower-case, drop apostrophes)
//! 2) explicit veto phrases short-circuit to the most negative outcome
//! 3) left-to-right scan over tokens: a lexicon bigram consumes both tokens,
//!    otherwise the single token is scored
//!
//! Negation is a fixed window: two tokens of lookback for bigrams, one token
//! of lookback (or a trailing "not") for unigrams. "not really all that good"
//! is therefore still read as positive.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, SentimentLabel};
use crate::lexicon::{lexicon, normalize_text, Lexicon, Polarity, Strength};

pub const DEFAULT_MAX_CHARS: usize = 5_000;

/// Per-tier term weights. Negative tiers are at least as heavy as positive ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub positive: f64,
    pub negative: f64,
    pub strong_positive: f64,
    pub strong_negative: f64,
    /// Score reported when a veto phrase matched.
    pub veto_score: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            positive: 1.0,
            negative: 1.5,
            strong_positive: 2.0,
            strong_negative: 3.0,
            veto_score: -10.0,
        }
    }
}

impl Weights {
    fn term(&self, polarity: Polarity, strength: Strength) -> f64 {
        match (polarity, strength) {
            (Polarity::Positive, Strength::Base) => self.positive,
            (Polarity::Positive, Strength::Strong) => self.strong_positive,
            (Polarity::Negative, Strength::Base) => self.negative,
            (Polarity::Negative, Strength::Strong) => self.strong_negative,
        }
    }

    fn bigram(&self, polarity: Polarity) -> f64 {
        match polarity {
            Polarity::Positive => self.positive * 2.0,
            Polarity::Negative => self.negative * 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Unigram,
    Bigram,
}

/// One lexicon match and what it added to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermHit {
    pub term: String,
    pub polarity: Polarity,
    pub kind: MatchKind,
    pub negated: bool,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    pub tokens: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<TermHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veto: Option<String>,
}

impl Score {
    /// Nothing in the lexicon matched and no veto fired.
    pub fn is_empty_match(&self) -> bool {
        self.veto.is_none() && self.hits.is_empty()
    }
}

/// Label plus the score it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub sentiment: SentimentLabel,
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    weights: Weights,
    classifier: Classifier,
    max_chars: usize,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            weights: Weights::default(),
            classifier: Classifier::default(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_parts(weights: Weights, classifier: Classifier, max_chars: usize) -> Self {
        Self {
            weights,
            classifier,
            max_chars: max_chars.max(1),
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Score and classify in one go. Both steps see only the first `max_chars`.
    pub fn analyze(&self, text: &str) -> Analysis {
        let capped = self.cap(text);
        let score = self.score_capped(capped);
        let sentiment = self.classifier.classify(capped, &score);
        Analysis { sentiment, score }
    }

    pub fn score_text(&self, text: &str) -> Score {
        self.score_capped(self.cap(text))
    }

    fn cap<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    fn score_capped(&self, capped: &str) -> Score {
        let lx = lexicon();
        let normalized = normalize_text(capped);

        let condensed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        if let Some(phrase) = lx.veto_in(&condensed) {
            return Score {
                value: self.weights.veto_score,
                tokens: tokenize_normalized(&normalized).count(),
                hits: Vec::new(),
                veto: Some(phrase.to_string()),
            };
        }

        let tokens: Vec<&str> = tokenize_normalized(&normalized).collect();
        let hits = self.scan(lx, &tokens);
        let value = hits.iter().map(|h| h.contribution).sum();

        Score {
            value,
            tokens: tokens.len(),
            hits,
            veto: None,
        }
    }

    fn scan(&self, lx: &Lexicon, tokens: &[&str]) -> Vec<TermHit> {
        let mut hits = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if i + 1 < tokens.len() {
                let bigram = format!("{} {}", tokens[i], tokens[i + 1]);
                if lx.is_negative(&bigram) {
                    hits.push(TermHit {
                        contribution: -self.weights.bigram(Polarity::Negative),
                        term: bigram,
                        polarity: Polarity::Negative,
                        kind: MatchKind::Bigram,
                        negated: false,
                    });
                    i += 2;
                    continue;
                }
                if lx.is_positive(&bigram) {
                    let negated = (1..=2).any(|k| i >= k && lx.is_negator(tokens[i - k]));
                    let w = self.weights.bigram(Polarity::Positive);
                    hits.push(TermHit {
                        contribution: if negated { -w } else { w },
                        term: bigram,
                        polarity: Polarity::Positive,
                        kind: MatchKind::Bigram,
                        negated,
                    });
                    i += 2;
                    continue;
                }
            }

            let tok = tokens[i];
            let negated = (i >= 1 && lx.is_negator(tokens[i - 1]))
                || tokens.get(i + 1).is_some_and(|t| lx.is_trailing_negator(t));

            // Both checks run: a term listed under both polarities nets out.
            for polarity in [Polarity::Positive, Polarity::Negative] {
                let listed = match polarity {
                    Polarity::Positive => lx.is_positive(tok),
                    Polarity::Negative => lx.is_negative(tok),
                };
                if !listed {
                    continue;
                }
                let w = self.weights.term(polarity, lx.strength(tok, polarity));
                let signed = match polarity {
                    Polarity::Positive => w,
                    Polarity::Negative => -w,
                };
                hits.push(TermHit {
                    term: tok.to_string(),
                    polarity,
                    kind: MatchKind::Unigram,
                    negated,
                    contribution: if negated { -signed } else { signed },
                });
            }
            i += 1;
        }

        hits
    }
}

/// Tokenizer shared by the scorer and keyword extraction:
/// lower-case, apostrophes dropped, split on anything outside `[a-z0-9]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    tokenize_normalized(&normalized).map(str::to_string).collect()
}

fn tokenize_normalized(s: &str) -> impl Iterator<Item = &str> + '_ {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> f64 {
        SentimentAnalyzer::new().score_text(text).value
    }

    #[test]
    fn tokenizer_splits_on_non_alphanumeric_runs() {
        assert_eq!(
            tokenize("Fresh!!  Kaju-katli, 10/10 -- didn't last"),
            vec!["fresh", "kaju", "katli", "10", "10", "didnt", "last"]
        );
        assert!(tokenize("  ?!...  ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn empty_and_punctuation_score_zero() {
        for t in ["", "   ", "...!!!", "🍬🍬"] {
            let s = SentimentAnalyzer::new().score_text(t);
            assert_eq!(s.value, 0.0, "input {t:?}");
            assert!(s.is_empty_match());
        }
    }

    #[test]
    fn negation_flips_both_polarities() {
        assert!(score("not bad") > 0.0);
        assert!(score("not good") < 0.0);
        assert!(score("never tasty") < 0.0);
        assert!(score("good not") < 0.0, "trailing 'not' negates");
    }

    #[test]
    fn contractions_negate() {
        assert!(score("I don't enjoy these") < 0.0);
        assert!(score("it isn't bad") > 0.0);
    }

    #[test]
    fn negative_bigram_counts_double_and_consumes_tokens() {
        let s = SentimentAnalyzer::new().score_text("too sweet");
        assert_eq!(s.value, -3.0);
        assert_eq!(s.hits.len(), 1);
        assert_eq!(s.hits[0].kind, MatchKind::Bigram);
    }

    #[test]
    fn positive_bigram_inverts_after_negator() {
        assert_eq!(score("on point"), 2.0);
        assert_eq!(score("not on point"), -2.0);
        assert_eq!(score("never really on point"), -2.0);
        assert_eq!(score("not very much on point"), 2.0, "lookback is two tokens");
    }

    #[test]
    fn bigram_tokens_are_not_rescored_as_unigrams() {
        // "stale taste": bigram only; "stale" must not add a second penalty.
        let s = SentimentAnalyzer::new().score_text("stale taste");
        assert_eq!(s.value, -3.0);
        assert!(s.hits.iter().all(|h| h.kind == MatchKind::Bigram));
    }

    #[test]
    fn veto_overrides_lexical_score() {
        let s = SentimentAnalyzer::new().score_text("Best barfi, but never   again!");
        assert_eq!(s.veto.as_deref(), Some("never again"));
        assert_eq!(s.value, Weights::default().veto_score);
    }

    #[test]
    fn strength_ordering() {
        let amazing = score("amazing");
        let good = score("good");
        let bad = score("bad");
        let terrible = score("terrible");
        assert!(amazing > good && good > 0.0 && 0.0 > bad && bad > terrible);
    }

    #[test]
    fn dual_listed_term_nets_negative() {
        assert_eq!(score("soft"), 1.0 - 1.5);
    }

    #[test]
    fn long_input_is_capped() {
        let a = SentimentAnalyzer::with_parts(Weights::default(), Classifier::default(), 4);
        // Only "good" survives the cap.
        assert_eq!(a.score_text("good terrible terrible").value, 1.0);
        let huge = "stale ".repeat(100_000);
        let s = SentimentAnalyzer::new().score_text(&huge);
        assert!(s.tokens <= DEFAULT_MAX_CHARS);
    }

    #[test]
    fn fallback_ignores_text_past_the_cap() {
        use crate::classifier::{Thresholds, ZeroScoreDefault};
        let neutral = Classifier::new(Thresholds {
            zero_score_default: ZeroScoreDefault::Neutral,
            ..Thresholds::default()
        });
        let a = SentimentAnalyzer::with_parts(Weights::default(), neutral, 10);
        // "arrived to" is kept, the "!" is not.
        assert_eq!(a.analyze("arrived today!").sentiment, SentimentLabel::Neutral);
        assert_eq!(a.analyze("arrived!").sentiment, SentimentLabel::Positive);
        // Multi-byte characters cap on char boundaries.
        assert_eq!(a.analyze("ééééééééééé!").sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn analyze_is_deterministic() {
        let a = SentimentAnalyzer::new();
        let t = "Loved the ladoo, packaging was damaged though";
        assert_eq!(a.analyze(t), a.analyze(t));
    }
}
