//! Text Metrics — word/char counts, bullet lines, section headers and layout risks.
//!
//! Everything here is recomputed per call from the raw text. Nothing is cached.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::tables::SECTION_PATTERNS;

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[•●○◦▪▫■□‣⁃➢➤►▸\-\*–]|\d{1,2}[.)])[ \t]+(.+?)[ \t]*$").unwrap()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static SECTION_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SECTION_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect()
});

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\[(?:image|icon|logo|photo)\]|\.(?:png|jpe?g|gif|svg)\b|[\x{1F300}-\x{1FAFF}\x{2600}-\x{26FF}]",
    )
    .unwrap()
});

static PAGE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:page\s+\d+(?:\s+of\s+\d+)?|\d+\s+of\s+\d+|-\s*\d+\s*-)\s*$").unwrap()
});

const TABLE_PENALTY: f64 = 20.0;
const IMAGE_PENALTY: f64 = 15.0;
const PAGE_MARKER_PENALTY: f64 = 10.0;
const COLUMN_PENALTY: f64 = 15.0;
/// Share of non-empty lines with a wide gap above which the layout reads as columns.
const COLUMN_LINE_RATIO: f64 = 0.30;

/// Which resume sections a text appears to contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub summary: bool,
    pub skills: bool,
    pub experience: bool,
    pub projects: bool,
    pub education: bool,
    pub certifications: bool,
    pub achievements: bool,
}

impl SectionMap {
    /// Sections an ATS expects on every resume.
    pub const REQUIRED: [&'static str; 4] = ["summary", "skills", "experience", "education"];

    pub fn detect(text: &str) -> Self {
        let mut map = SectionMap::default();
        for (name, re) in SECTION_RES.iter() {
            if re.is_match(text) {
                map.set(name, true);
            }
        }
        map
    }

    pub fn get(&self, name: &str) -> bool {
        match name {
            "summary" => self.summary,
            "skills" => self.skills,
            "experience" => self.experience,
            "projects" => self.projects,
            "education" => self.education,
            "certifications" => self.certifications,
            "achievements" => self.achievements,
            _ => false,
        }
    }

    fn set(&mut self, name: &str, present: bool) {
        match name {
            "summary" => self.summary = present,
            "skills" => self.skills = present,
            "experience" => self.experience = present,
            "projects" => self.projects = present,
            "education" => self.education = present,
            "certifications" => self.certifications = present,
            "achievements" => self.achievements = present,
            _ => {}
        }
    }

    /// Required sections not found, in `REQUIRED` order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        Self::REQUIRED
            .iter()
            .copied()
            .filter(|name| !self.get(name))
            .collect()
    }
}

/// Derived measurements of a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMetrics {
    pub word_count: usize,
    pub char_count: usize,
    /// Bullet line contents (glyph stripped), in document order.
    pub bullets: Vec<String>,
    pub sections: SectionMap,
    /// 100 minus layout penalties, floored at 0.
    pub formatting_score: f64,
    /// risk id → human-readable description
    pub formatting_risks: BTreeMap<String, String>,
}

impl TextMetrics {
    pub fn analyze(text: &str) -> Self {
        let (formatting_score, formatting_risks) = formatting_risk(text);
        Self {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            bullets: bullet_lines(text),
            sections: SectionMap::detect(text),
            formatting_score,
            formatting_risks,
        }
    }
}

/// Contents of every line that starts with a bullet glyph or list number.
pub fn bullet_lines(text: &str) -> Vec<String> {
    BULLET_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Lower-cased word tokens (`\w+`), the unit every word-boundary count works on.
pub fn word_tokens(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Total occurrences of any vocabulary word among `tokens`.
pub fn count_vocabulary(tokens: &[String], vocabulary: &[&str]) -> usize {
    tokens
        .iter()
        .filter(|t| vocabulary.contains(&t.as_str()))
        .count()
}

/// Scores layout friendliness and names every rule that fired.
pub fn formatting_risk(text: &str) -> (f64, BTreeMap<String, String>) {
    let mut score = 100.0_f64;
    let mut risks = BTreeMap::new();

    if text.lines().any(|l| l.matches('|').count() >= 2) {
        score -= TABLE_PENALTY;
        risks.insert(
            "tables".to_string(),
            "Table-like layout detected; ATS parsers often scramble table content".to_string(),
        );
    }

    if IMAGE_RE.is_match(text) {
        score -= IMAGE_PENALTY;
        risks.insert(
            "images".to_string(),
            "Images, icons or emoji detected; ATS cannot read graphical content".to_string(),
        );
    }

    if PAGE_MARKER_RE.is_match(text) {
        score -= PAGE_MARKER_PENALTY;
        risks.insert(
            "headers_footers".to_string(),
            "Page numbers or header/footer text detected".to_string(),
        );
    }

    let non_empty: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if !non_empty.is_empty() {
        let gapped = non_empty.iter().filter(|l| l.contains("     ")).count();
        if gapped as f64 / non_empty.len() as f64 > COLUMN_LINE_RATIO {
            score -= COLUMN_PENALTY;
            risks.insert(
                "columns".to_string(),
                "Multi-column layout detected; text may be read out of order".to_string(),
            );
        }
    }

    (score.max(0.0), risks)
}
