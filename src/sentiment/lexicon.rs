use super::{SentimentAnalyzer, SentimentError};
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

const POLAR_WORDS: &[(&str, f64)] = &[
    ("happy", 0.8),
    ("glad", 0.5),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("cheerful", 0.8),
    ("excited", 0.4),
    ("exciting", 0.3),
    ("great", 0.8),
    ("good", 0.7),
    ("nice", 0.6),
    ("fine", 0.4),
    ("love", 0.5),
    ("lovely", 0.5),
    ("wonderful", 1.0),
    ("excellent", 1.0),
    ("awesome", 1.0),
    ("fantastic", 0.4),
    ("brilliant", 0.9),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("beautiful", 0.85),
    ("delighted", 0.7),
    ("grateful", 0.6),
    ("blessed", 0.6),
    ("fun", 0.3),
    ("enjoy", 0.4),
    ("smile", 0.3),
    ("sunny", 0.5),
    ("proud", 0.8),
    ("hopeful", 0.5),
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("miserable", -1.0),
    ("depressed", -0.6),
    ("lonely", -0.5),
    ("hate", -0.8),
    ("cry", -0.5),
    ("crying", -0.5),
    ("hurt", -0.5),
    ("broken", -0.4),
    ("tired", -0.4),
    ("exhausted", -0.5),
    ("boring", -1.0),
    ("gloomy", -0.7),
    ("upset", -0.6),
    ("disappointed", -0.75),
    ("hopeless", -0.8),
    ("down", -0.2),
    ("sick", -0.7),
    ("pain", -0.6),
    ("lost", -0.3),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.4),
    ("quite", 1.1),
    ("truly", 1.3),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "nothing", "hardly"];

const NEGATION_FACTOR: f64 = -0.5;

lazy_static! {
    static ref POLARITY: HashMap<&'static str, f64> = POLAR_WORDS.iter().copied().collect();
    static ref INTENSITY: HashMap<&'static str, f64> = INTENSIFIERS.iter().copied().collect();
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't") || word.ends_with("n\u{2019}t")
}

/// Averages the scores of known polar words. A negation or intensifier
/// modifies only the polar word that directly follows it.
pub fn lexicon_polarity(text: &str) -> f64 {
    let mut total = 0.0;
    let mut polar_count = 0usize;
    let mut modifier = 1.0;

    for word in text.unicode_words() {
        let word = word.to_lowercase();
        if is_negation(&word) {
            modifier *= NEGATION_FACTOR;
        } else if let Some(factor) = INTENSITY.get(word.as_str()) {
            modifier *= factor;
        } else if let Some(score) = POLARITY.get(word.as_str()) {
            total += score * modifier;
            polar_count += 1;
            modifier = 1.0;
        } else {
            modifier = 1.0;
        }
    }

    if polar_count == 0 {
        return 0.0;
    }
    (total / polar_count as f64).clamp(-1.0, 1.0)
}

#[derive(Default)]
pub struct LexiconSentimentAnalyzer;

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        Ok(lexicon_polarity(text))
    }
}
