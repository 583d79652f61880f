//! Keyword Index — salient keywords, skills and acronyms of a text blob.
//!
//! Four extractors, unioned in a fixed order so the output is reproducible:
//! 1. repeated non-stop words (≥3 chars, ≥2 occurrences), most frequent first
//! 2. Title-Case multi-word phrases
//! 3. all-caps acronyms
//! 4. fixed skill/domain patterns
//!
//! The result is lower-cased, deduplicated and capped at `MAX_EXTRACTED_KEYWORDS`.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::tables::{SKILL_DICTIONARY, SKILL_PATTERNS, STOP_WORDS};

/// Upper bound on keywords returned by `extract_keywords`.
pub const MAX_EXTRACTED_KEYWORDS: usize = 50;
/// Upper bound on keywords surfaced in any report.
pub const MAX_REPORTED_KEYWORDS: usize = 20;

const MIN_WORD_LEN: usize = 3;
const MIN_WORD_FREQUENCY: usize = 2;

static TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+#]*").unwrap());
static TITLE_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+\b").unwrap());
static ACRONYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\b").unwrap());
static SKILL_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SKILL_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Extracts the keyword set of `text`. Empty text yields an empty set.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords = KeywordSet::with_capacity(MAX_EXTRACTED_KEYWORDS);

    for word in frequent_terms(text) {
        keywords.insert(&word);
    }
    for m in TITLE_PHRASE_RE.find_iter(text) {
        let phrase = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        keywords.insert(&phrase);
    }
    for m in ACRONYM_RE.find_iter(text) {
        keywords.insert(m.as_str());
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for re in SKILL_RES.iter() {
        for m in re.find_iter(&collapsed) {
            keywords.insert(m.as_str());
        }
    }

    keywords.into_vec()
}

/// Dictionary skills present in `text` (case-insensitive substring), dictionary order.
pub fn dictionary_skills(text: &str) -> Vec<&'static str> {
    let lower = normalize_for_matching(text);
    SKILL_DICTIONARY
        .iter()
        .copied()
        .filter(|skill| lower.contains(skill))
        .collect()
}

/// Lower-cased text with every whitespace run collapsed to one space, the
/// shape extracted phrases are compared against.
pub fn normalize_for_matching(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Repeated non-stop words, descending frequency, ties broken by first occurrence.
fn frequent_terms(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, m) in TERM_RE.find_iter(text).enumerate() {
        let word = m.as_str().to_lowercase();
        if word.len() < MIN_WORD_LEN || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut frequent: Vec<(String, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= MIN_WORD_FREQUENCY)
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    frequent.into_iter().map(|(word, _, _)| word).collect()
}

/// Insertion-ordered, lower-cased, bounded set.
struct KeywordSet {
    order: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl KeywordSet {
    fn with_capacity(cap: usize) -> Self {
        Self {
            order: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    fn insert(&mut self, keyword: &str) {
        if self.order.len() >= self.cap {
            return;
        }
        let lower = keyword.trim().to_lowercase();
        if lower.is_empty() {
            return;
        }
        if self.seen.insert(lower.clone()) {
            self.order.push(lower);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.order
    }
}
