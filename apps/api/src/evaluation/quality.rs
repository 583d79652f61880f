//! Answer Quality Classifier — rejects answers that are not worth scoring.
//!
//! Checks run in a fixed order and the first hit wins:
//! random pattern, too short, gibberish, off-topic.
//! Any invalid verdict carries a hard score cap of 0.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::tables::{COMMON_WORDS, RANDOM_PATTERNS, STOP_WORDS, THROWAWAY_WORDS};

/// Default length (chars) below which an answer sharing no keyword with the question is off-topic.
pub const DEFAULT_OFF_TOPIC_MAX_LEN: usize = 100;

const MIN_ANSWER_CHARS: usize = 10;
const MIN_REPEATED_CHAR_RUN: usize = 8;
const GIBBERISH_RATIO: f64 = 0.6;
const QUESTION_KEYWORD_MIN_LEN: usize = 5;
const MAX_QUESTION_KEYWORDS: usize = 8;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

static RANDOM_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    RANDOM_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static CONSONANT_SANDWICH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[bcdfghjklmnpqrstvwxz]{3,}[aeiouy][bcdfghjklmnpqrstvwxz]{3,}").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    RandomPattern,
    TooShort,
    Gibberish,
    OffTopic,
}

impl InvalidReason {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::RandomPattern => {
                "The answer looks like placeholder or random input rather than a real response."
            }
            InvalidReason::TooShort => "The answer is too short to evaluate.",
            InvalidReason::Gibberish => "The answer is mostly unreadable or nonsensical text.",
            InvalidReason::OffTopic => "The answer does not appear to address the question.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QualityVerdict {
    Valid,
    Invalid {
        reason: InvalidReason,
        score_cap: f64,
        message: String,
    },
}

impl QualityVerdict {
    fn invalid(reason: InvalidReason) -> Self {
        QualityVerdict::Invalid {
            reason,
            score_cap: 0.0,
            message: reason.message().to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, QualityVerdict::Valid)
    }
}

#[derive(Debug, Clone)]
pub struct AnswerQualityClassifier {
    off_topic_max_len: usize,
}

impl Default for AnswerQualityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_OFF_TOPIC_MAX_LEN)
    }
}

impl AnswerQualityClassifier {
    pub fn new(off_topic_max_len: usize) -> Self {
        Self { off_topic_max_len }
    }

    pub fn classify(&self, answer: &str, question: &str) -> QualityVerdict {
        let trimmed = answer.trim();
        let lower = trimmed.to_lowercase();
        let tokens = tokenize(&lower);

        if is_random_pattern(&lower, &tokens) {
            return QualityVerdict::invalid(InvalidReason::RandomPattern);
        }
        if trimmed.chars().count() < MIN_ANSWER_CHARS {
            return QualityVerdict::invalid(InvalidReason::TooShort);
        }
        if is_gibberish(&tokens) {
            return QualityVerdict::invalid(InvalidReason::Gibberish);
        }
        if trimmed.chars().count() < self.off_topic_max_len && is_off_topic(&lower, question) {
            return QualityVerdict::invalid(InvalidReason::OffTopic);
        }
        QualityVerdict::Valid
    }
}

/// Lower-cased alphanumeric runs.
fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_random_pattern(lower: &str, tokens: &[&str]) -> bool {
    if !tokens.is_empty() && tokens.iter().all(|t| THROWAWAY_WORDS.contains(t)) {
        return true;
    }
    if tokens.len() >= 2 && tokens.iter().all(|t| *t == tokens[0]) {
        return true;
    }
    if RANDOM_RES.iter().any(|re| re.is_match(lower)) {
        return true;
    }
    is_single_char_repeat(lower)
}

/// True when every non-whitespace char of the answer is the same non-digit
/// char, repeated at least `MIN_REPEATED_CHAR_RUN` times.
fn is_single_char_repeat(text: &str) -> bool {
    let mut chars = text.chars().filter(|c| !c.is_whitespace());
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }
    let mut count = 1;
    for c in chars {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= MIN_REPEATED_CHAR_RUN
}

fn is_gibberish(tokens: &[&str]) -> bool {
    let mut real = 0usize;
    let mut gibberish = 0usize;
    for token in tokens {
        if !token.chars().any(char::is_alphabetic) {
            continue;
        }
        if COMMON_WORDS.contains(token) {
            real += 1;
        } else if token.len() >= 4
            && token.chars().all(|c| c.is_ascii_alphabetic())
            && looks_like_gibberish(token)
        {
            gibberish += 1;
        }
    }
    let counted = real + gibberish;
    counted > 0 && gibberish as f64 / counted as f64 > GIBBERISH_RATIO
}

fn looks_like_gibberish(token: &str) -> bool {
    let len = token.chars().count();
    if len > 5 && !token.chars().any(|c| VOWELS.contains(&c)) {
        return true;
    }
    if consonant_run(token) >= 3 {
        return true;
    }
    len > 6 && CONSONANT_SANDWICH_RE.is_match(token)
}

/// Longest run of consonants. Callers pass ASCII-alphabetic tokens only.
fn consonant_run(token: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in token.chars() {
        if c.is_ascii_alphabetic() && !VOWELS.contains(&c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// True when the answer shares none of the question's salient words.
/// A question without salient words never makes an answer off-topic.
fn is_off_topic(answer_lower: &str, question: &str) -> bool {
    let keywords = question_keywords(question);
    !keywords.is_empty() && !keywords.iter().any(|k| answer_lower.contains(k.as_str()))
}

/// First distinct non-stop words longer than four chars.
fn question_keywords(question: &str) -> Vec<String> {
    let lower = question.to_lowercase();
    let mut seen = HashSet::new();
    tokenize(&lower)
        .into_iter()
        .filter(|t| t.chars().count() >= QUESTION_KEYWORD_MIN_LEN && !STOP_WORDS.contains(t))
        .filter(|t| seen.insert(*t))
        .take(MAX_QUESTION_KEYWORDS)
        .map(str::to_string)
        .collect()
}
