// tests/analyzer_properties.rs
//
// Behavioural properties of the analyzer through the public API only:
// determinism, negation, veto precedence, strength ordering, empty input,
// aggregation consistency and the storefront scenarios.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use sweetshop_sentiment::store::InMemoryStore;
use sweetshop_sentiment::{
    aggregate, CommentFeed, FeedFilter, NewComment, SentimentAnalyzer, SentimentLabel,
};

fn analyzer() -> SentimentAnalyzer {
    SentimentAnalyzer::new()
}

fn label(text: &str) -> SentimentLabel {
    analyzer().analyze(text).sentiment
}

fn score(text: &str) -> f64 {
    analyzer().score_text(text).value
}

fn feed() -> CommentFeed {
    CommentFeed::new(SentimentAnalyzer::new(), Arc::new(InMemoryStore::new()), 6)
}

#[test]
fn negation_inverts_polarity() {
    assert!(label("not bad").is_positive());
    assert!(label("not good").is_negative());
}

#[test]
fn explicit_veto_beats_positive_words() {
    assert_eq!(
        label("I will never buy this again, it was great"),
        SentimentLabel::VeryNegative
    );
    assert_eq!(
        label("Amazing, perfect, best... refund please"),
        SentimentLabel::VeryNegative
    );
}

#[test]
fn strong_terms_dominate_weak_terms() {
    let (amazing, good, bad, terrible) =
        (score("amazing"), score("good"), score("bad"), score("terrible"));
    assert!(amazing > good, "{amazing} > {good}");
    assert!(good > 0.0);
    assert!(0.0 > bad);
    assert!(bad > terrible, "{bad} > {terrible}");
}

#[test]
fn negative_terms_weigh_at_least_as_much_as_positive_ones() {
    assert!(score("good bad") < 0.0);
    assert!(score("amazing terrible") < 0.0);
}

#[test]
fn empty_input_is_positive_by_default() {
    assert_eq!(label(""), SentimentLabel::Positive);
    assert_eq!(label("   \n\t"), SentimentLabel::Positive);
}

#[test]
fn unmatched_text_uses_fallback_hints() {
    assert_eq!(label("Box arrived on Tuesday"), SentimentLabel::Positive);
    assert_eq!(label("Ordered twice!"), SentimentLabel::Positive);
}

#[test]
fn random_inputs_are_total_and_deterministic() {
    const ALPHABET: &[char] = &[
        'a', 'e', 'o', 't', 'n', ' ', ' ', '!', '\'', '-', ',', 'é', '😀', '\u{0}', '9',
    ];
    const WORDS: &[&str] = &[
        "not", "never", "good", "bad", "fresh", "stale", "too", "sweet", "on", "point",
        "never buy", "soft", "love", "worst", "no", "reply",
    ];
    let a = analyzer();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..500 {
        let mut s = String::new();
        for _ in 0..rng.random_range(0..40) {
            if rng.random_bool(0.5) {
                s.push_str(WORDS[rng.random_range(0..WORDS.len())]);
                s.push(' ');
            } else {
                s.push(ALPHABET[rng.random_range(0..ALPHABET.len())]);
            }
        }
        let first = a.analyze(&s);
        let second = a.analyze(&s);
        assert_eq!(first, second, "non-deterministic for {s:?}");
        assert!(first.score.value.is_finite());
    }
}

#[test]
fn very_long_input_is_bounded() {
    let text = "fresh ".repeat(200_000);
    let a = analyzer().analyze(&text);
    assert_eq!(a.sentiment, SentimentLabel::VeryPositive);
    assert!(a.score.tokens < 200_000);
}

#[test]
fn storefront_scenario_labels_and_counts() {
    let f = feed();
    let inputs = [
        ("Asha", "Absolutely amazing, best ladoo ever!", 5),
        ("Vikram", "Stale and tasteless, terrible experience", 1),
        ("Neha", "not bad at all, quite enjoyable", 4),
    ];
    let labels: Vec<SentimentLabel> = inputs
        .iter()
        .map(|(n, t, r)| f.submit(NewComment::new(*n, *t, *r)).unwrap().sentiment)
        .collect();

    assert!(matches!(
        labels[0],
        SentimentLabel::VeryPositive | SentimentLabel::Positive
    ));
    assert!(matches!(
        labels[1],
        SentimentLabel::VeryNegative | SentimentLabel::Negative
    ));
    assert_eq!(labels[2], SentimentLabel::Positive);

    let stats = f.stats();
    assert_eq!(stats.total_count, 3);
    assert_eq!(stats.positive_count, 2);
    assert_eq!(stats.negative_count, 1);
    assert!(stats.positive_count + stats.negative_count <= stats.total_count);
    assert!(stats.positive_percent + stats.negative_percent <= 100.0 + 1e-9);
}

#[test]
fn fresh_outranks_delicious() {
    let f = feed();
    for t in [
        "Fresh and delicious pedas",
        "So fresh, and delicious too",
        "Very fresh jalebi",
    ] {
        f.submit(NewComment::new("Guest", t, 5)).unwrap();
    }
    let kw = f.stats().top_positive_keywords;
    let fresh = kw.iter().position(|k| k == "fresh").expect("fresh listed");
    let delicious = kw.iter().position(|k| k == "delicious").expect("delicious listed");
    assert!(fresh < delicious, "{kw:?}");
}

#[test]
fn aggregation_is_idempotent_and_consistent() {
    let f = feed();
    for (t, r) in [
        ("lovely soft barfi", 5),
        ("box arrived", 3),
        ("greasy and bland", 2),
        ("too sweet for me", 3),
        ("not good", 2),
    ] {
        f.submit(NewComment::new("Guest", t, r)).unwrap();
    }
    let all = f.list(FeedFilter::All);
    let a = aggregate(&all, 6);
    let b = aggregate(&all, 6);
    assert_eq!(a, b);
    assert!(a.positive_count + a.negative_count <= a.total_count);
    assert_eq!(
        a.by_label.iter().map(|l| l.count).sum::<usize>(),
        a.total_count
    );
}
