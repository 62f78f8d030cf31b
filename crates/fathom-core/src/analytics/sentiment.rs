//! Lexicon-based sentiment for short financial notes and headlines

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const POSITIVE_WORDS: &[&str] = &[
    "great", "good", "positive", "excellent", "profit", "gain", "increase", "up", "higher",
    "growth",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "negative", "loss", "decrease", "down", "lower", "decline", "debt", "worry",
];

/// Scores above this are positive, below its negation negative
const NEUTRAL_BAND: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// (positive - negative) / (positive + negative), 0 when neither occurs
    pub score: f64,
    pub classification: Sentiment,
    pub positive_words: usize,
    pub negative_words: usize,
}

fn word_pattern() -> Result<&'static Regex> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = WORD.get() {
        return Ok(re);
    }
    let re = Regex::new(r"\w+")?;
    Ok(WORD.get_or_init(|| re))
}

pub fn analyze_sentiment(text: &str) -> Result<SentimentReport> {
    let lowered = text.to_lowercase();
    let mut positive_words = 0;
    let mut negative_words = 0;
    for word in word_pattern()?.find_iter(&lowered).map(|m| m.as_str()) {
        if POSITIVE_WORDS.contains(&word) {
            positive_words += 1;
        } else if NEGATIVE_WORDS.contains(&word) {
            negative_words += 1;
        }
    }

    let total = positive_words + negative_words;
    let score = if total > 0 {
        (positive_words as f64 - negative_words as f64) / total as f64
    } else {
        0.0
    };
    let classification = if score > NEUTRAL_BAND {
        Sentiment::Positive
    } else if score < -NEUTRAL_BAND {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    Ok(SentimentReport {
        score,
        classification,
        positive_words,
        negative_words,
    })
}
