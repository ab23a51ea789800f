//! Analyzer configuration (TOML) with env overrides.
//!
//! Resolution order:
//! 1) `$SENTIMENT_CONFIG_PATH`, else `config/sentiment.toml`
//! 2) a missing file means built-in defaults; a malformed file is an error
//! 3) `$SENTIMENT_TOP_N` / `$SENTIMENT_MAX_CHARS` override the file
//! 4) out-of-range values are sanitised, not rejected
//!
//! ```toml
//! [weights]
//! positive = 1.0
//! negative = 1.5
//! strong_positive = 2.0
//! strong_negative = 3.0
//! veto_score = -10.0
//!
//! [thresholds]
//! strong_positive = 3.0
//! strong_negative = -3.0
//! zero_score_default = "positive"   # or "neutral"
//!
//! [limits]
//! max_chars = 5000
//! top_keywords = 6
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregate::DEFAULT_TOP_KEYWORDS;
use crate::classifier::{Classifier, Thresholds};
use crate::sentiment::{SentimentAnalyzer, Weights, DEFAULT_MAX_CHARS};

pub const DEFAULT_CONFIG_PATH: &str = "config/sentiment.toml";
pub const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const ENV_TOP_N: &str = "SENTIMENT_TOP_N";
pub const ENV_MAX_CHARS: &str = "SENTIMENT_MAX_CHARS";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_chars: usize,
    pub top_keywords: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub weights: Weights,
    pub thresholds: Thresholds,
    pub limits: Limits,
}

impl AnalyzerConfig {
    /// Env path (or default path) + env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut cfg = Self::load_from_file(&path)?;
        cfg.apply_env();
        Ok(cfg.sanitized())
    }

    /// Missing file → defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(target: "config", path = %path.display(), "no analyzer config, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing analyzer config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AnalyzerConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    fn apply_env(&mut self) {
        if let Some(n) = parse_env_usize(ENV_TOP_N) {
            self.limits.top_keywords = n;
        }
        if let Some(n) = parse_env_usize(ENV_MAX_CHARS) {
            self.limits.max_chars = n;
        }
    }

    /// Clamp everything into a shape the scorer can rely on.
    pub fn sanitized(mut self) -> Self {
        let d = Weights::default();
        let w = &mut self.weights;
        w.positive = positive_or(w.positive, d.positive);
        w.negative = positive_or(w.negative, d.negative);
        w.strong_positive = positive_or(w.strong_positive, d.strong_positive).max(w.positive);
        w.strong_negative = positive_or(w.strong_negative, d.strong_negative).max(w.negative);
        // Negative evidence never weighs less than positive evidence of the same tier.
        w.negative = w.negative.max(w.positive);
        w.strong_negative = w.strong_negative.max(w.strong_positive).max(w.negative);
        if !w.veto_score.is_finite() || w.veto_score >= 0.0 {
            w.veto_score = d.veto_score;
        }

        let dt = Thresholds::default();
        let t = &mut self.thresholds;
        t.strong_positive = if t.strong_positive.is_finite() {
            t.strong_positive.abs()
        } else {
            dt.strong_positive
        };
        t.strong_negative = if t.strong_negative.is_finite() {
            -t.strong_negative.abs()
        } else {
            dt.strong_negative
        };

        self.limits.max_chars = self.limits.max_chars.max(1);
        self.limits.top_keywords = self.limits.top_keywords.max(1);
        self
    }

    pub fn analyzer(&self) -> SentimentAnalyzer {
        SentimentAnalyzer::with_parts(
            self.weights,
            Classifier::new(self.thresholds),
            self.limits.max_chars,
        )
    }
}

fn positive_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}

fn parse_env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
