//! ATS Scoring — how well a resume survives an applicant-tracking-system parse.
//!
//! Six subscores on a 0–100 scale, blended linearly:
//!
//! | subscore    | weight |
//! |-------------|--------|
//! | sections    | 0.25   |
//! | keywords    | 0.20   |
//! | bullets     | 0.20   |
//! | length      | 0.15   |
//! | formatting  | 0.10   |
//! | consistency | 0.10   |
//!
//! The blend is rounded and clamped to [0, 100]. Strengths, fixes and
//! suggestions come from fixed rule tables keyed off the same signals, so
//! identical input always yields an identical report.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::metrics::{count_vocabulary, word_tokens, SectionMap, TextMetrics};
use crate::text::tables::{
    ACHIEVEMENT_VOCABULARY, ACTION_VERBS, DATE_FORMAT_PATTERNS, PAST_TENSE_VERBS,
    PRESENT_TENSE_VERBS, RULES_VERSION,
};

const SECTION_WEIGHT: f64 = 0.25;
const KEYWORD_WEIGHT: f64 = 0.20;
const BULLET_WEIGHT: f64 = 0.20;
const LENGTH_WEIGHT: f64 = 0.15;
const FORMATTING_WEIGHT: f64 = 0.10;
const CONSISTENCY_WEIGHT: f64 = 0.10;

/// Bullet subscore when the resume has no bullet lines at all.
const NO_BULLETS_SCORE: f64 = 30.0;
/// Characters after the experience header inspected for tense drift.
const TENSE_WINDOW_CHARS: usize = 500;
const WORDS_PER_PAGE: usize = 500;

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+%|\$\d|\d+\s*(?:years?|months?|weeks?|days?|hours?|users?|customers?|clients?|people|members?|projects?|countries|teams?|engineers?|k\b|m\b|x\b)",
    )
    .unwrap()
});
static EXPERIENCE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:work[ \t]+|professional[ \t]+)?experience\b").unwrap()
});
static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DATE_FORMAT_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Report models
// ────────────────────────────────────────────────────────────────────────────

/// The six weighted subscores, each 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub section: f64,
    pub keyword: f64,
    pub bullet: f64,
    pub length: f64,
    pub formatting: f64,
    pub consistency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub estimated_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub ats_score: u32, // 0 – 100
    pub strengths: Vec<String>,
    pub critical_fixes: Vec<String>,
    pub suggestions: Vec<String>,
    pub detected_sections: SectionMap,
    pub risks: BTreeMap<String, String>,
    pub metrics: DocumentMetrics,
    pub breakdown: AtsBreakdown,
    pub rules_version: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a plain-text resume. Never fails; empty text yields a low, well-formed report.
pub fn score_ats(text: &str) -> AtsReport {
    let metrics = TextMetrics::analyze(text);
    let tokens = word_tokens(text);

    let bullets = bullet_stats(&metrics.bullets);
    let consistency = consistency_check(text);

    let breakdown = AtsBreakdown {
        section: section_score(&metrics.sections),
        keyword: keyword_score(&tokens, metrics.word_count),
        bullet: bullets.score,
        length: length_score(metrics.word_count),
        formatting: metrics.formatting_score,
        consistency: consistency.score,
    };

    let blended = SECTION_WEIGHT * breakdown.section
        + KEYWORD_WEIGHT * breakdown.keyword
        + BULLET_WEIGHT * breakdown.bullet
        + LENGTH_WEIGHT * breakdown.length
        + FORMATTING_WEIGHT * breakdown.formatting
        + CONSISTENCY_WEIGHT * breakdown.consistency;
    let ats_score = blended.round().clamp(0.0, 100.0) as u32;

    let signals = Signals {
        metrics: &metrics,
        bullets: &bullets,
        consistency: &consistency,
        breakdown: &breakdown,
    };

    debug!(
        "ATS score {}/100 (words={}, bullets={})",
        ats_score, metrics.word_count, bullets.count
    );

    AtsReport {
        ats_score,
        strengths: strengths(&signals),
        critical_fixes: critical_fixes(&signals),
        suggestions: suggestions(&signals),
        detected_sections: metrics.sections,
        risks: risks(&signals),
        metrics: DocumentMetrics {
            word_count: metrics.word_count,
            char_count: metrics.char_count,
            estimated_pages: metrics.word_count.div_ceil(WORDS_PER_PAGE),
        },
        breakdown,
        rules_version: RULES_VERSION.to_string(),
    }
}

fn section_score(sections: &SectionMap) -> f64 {
    let present = SectionMap::REQUIRED
        .iter()
        .filter(|name| sections.get(name))
        .count();
    present as f64 / SectionMap::REQUIRED.len() as f64 * 100.0
}

/// Achievement vocabulary hits plus a density bonus (2–5% is the sweet spot).
fn keyword_score(tokens: &[String], word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let found = count_vocabulary(tokens, ACHIEVEMENT_VOCABULARY) as f64;
    let base = found / ACHIEVEMENT_VOCABULARY.len() as f64 * 50.0;
    let density = found / word_count as f64 * 100.0;
    let bonus = if (2.0..=5.0).contains(&density) {
        50.0
    } else if density > 0.0 && density < 2.0 {
        30.0
    } else {
        0.0
    };
    (base + bonus).min(100.0)
}

struct BulletStats {
    count: usize,
    action_ratio: f64,
    metric_ratio: f64,
    score: f64,
}

fn bullet_stats(bullets: &[String]) -> BulletStats {
    if bullets.is_empty() {
        return BulletStats {
            count: 0,
            action_ratio: 0.0,
            metric_ratio: 0.0,
            score: NO_BULLETS_SCORE,
        };
    }

    let count = bullets.len();
    let with_action = bullets
        .iter()
        .filter(|b| count_vocabulary(&word_tokens(b), ACTION_VERBS) > 0)
        .count();
    let with_metric = bullets.iter().filter(|b| METRIC_RE.is_match(b)).count();

    let action_ratio = with_action as f64 / count as f64;
    let metric_ratio = with_metric as f64 / count as f64;
    let volume = (count as f64 / 10.0 * 20.0).min(20.0);

    BulletStats {
        count,
        action_ratio,
        metric_ratio,
        score: (40.0 * action_ratio + 40.0 * metric_ratio + volume).min(100.0),
    }
}

fn length_score(word_count: usize) -> f64 {
    match word_count {
        400..=800 => 100.0,
        300..=399 => 80.0,
        801..=1200 => 70.0,
        w if w > 1200 => 40.0,
        _ => 50.0,
    }
}

struct ConsistencyCheck {
    score: f64,
    mixed_dates: bool,
    mixed_tense: bool,
}

fn consistency_check(text: &str) -> ConsistencyCheck {
    let mut score = 100.0;

    let formats_used = DATE_RES.iter().filter(|re| re.is_match(text)).count();
    let mixed_dates = formats_used > 1;
    if mixed_dates {
        score -= 15.0;
    }

    let mixed_tense = EXPERIENCE_HEADER_RE
        .find(text)
        .map(|m| {
            let window: String = text[m.end()..].chars().take(TENSE_WINDOW_CHARS).collect();
            let tokens = word_tokens(&window);
            let present = count_vocabulary(&tokens, PRESENT_TENSE_VERBS);
            let past = count_vocabulary(&tokens, PAST_TENSE_VERBS);
            present > past && past > 0
        })
        .unwrap_or(false);
    if mixed_tense {
        score -= 10.0;
    }

    ConsistencyCheck {
        score,
        mixed_dates,
        mixed_tense,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule tables → feedback
// ────────────────────────────────────────────────────────────────────────────

struct Signals<'a> {
    metrics: &'a TextMetrics,
    bullets: &'a BulletStats,
    consistency: &'a ConsistencyCheck,
    breakdown: &'a AtsBreakdown,
}

impl Signals<'_> {
    fn is_empty(&self) -> bool {
        self.metrics.word_count == 0
    }
}

fn strengths(s: &Signals) -> Vec<String> {
    if s.is_empty() {
        return vec![];
    }
    let b = s.breakdown;
    let rules: [(bool, &str); 6] = [
        (b.section >= 100.0, "All essential resume sections are present"),
        (
            b.bullet >= 70.0,
            "Strong use of action verbs and quantified achievements in bullet points",
        ),
        (b.length >= 100.0, "Resume length is in the optimal 400–800 word range"),
        (b.formatting >= 90.0, "Clean, ATS-friendly formatting"),
        (b.keyword >= 70.0, "Good use of achievement-oriented keywords"),
        (
            b.consistency >= 100.0,
            "Consistent date formatting and verb tense",
        ),
    ];
    collect_rules(&rules)
}

fn critical_fixes(s: &Signals) -> Vec<String> {
    let sections = &s.metrics.sections;
    let risks = &s.metrics.formatting_risks;
    let rules: [(bool, &str); 7] = [
        (
            !sections.summary,
            "Add a professional summary section at the top of your resume",
        ),
        (
            !sections.skills,
            "Add a dedicated skills section listing your technical and soft skills",
        ),
        (
            !sections.experience,
            "Add a work experience section with your roles and achievements",
        ),
        (
            !sections.education,
            "Add an education section with your degrees and institutions",
        ),
        (
            risks.contains_key("tables"),
            "Remove tables; ATS parsers often scramble table content",
        ),
        (
            risks.contains_key("images"),
            "Remove images, icons and emoji; ATS cannot read graphical content",
        ),
        (
            !s.is_empty() && s.bullets.count == 0,
            "Use bullet points to describe your responsibilities and achievements",
        ),
    ];
    collect_rules(&rules)
}

fn suggestions(s: &Signals) -> Vec<String> {
    if s.is_empty() {
        return vec!["Paste the full text of your resume to receive a detailed ATS review".to_string()];
    }
    let words = s.metrics.word_count;
    let has_bullets = s.bullets.count > 0;
    let risks = &s.metrics.formatting_risks;
    let rules: [(bool, &str); 9] = [
        (
            has_bullets && s.bullets.metric_ratio < 0.5,
            "Quantify more achievements with numbers, percentages or dollar amounts",
        ),
        (
            has_bullets && s.bullets.action_ratio < 0.7,
            "Start more bullet points with strong action verbs such as led, built or delivered",
        ),
        (
            words < 400,
            "Expand your resume with more detail on your experience and projects (aim for 400–800 words)",
        ),
        (
            words > 800,
            "Condense your resume to your most relevant experience (aim for 400–800 words)",
        ),
        (
            s.consistency.mixed_dates,
            "Use a single, consistent date format throughout (for example \"Jan 2020\")",
        ),
        (
            s.consistency.mixed_tense,
            "Describe previous roles consistently in the past tense",
        ),
        (
            risks.contains_key("columns"),
            "Use a single-column layout so ATS reads your content in order",
        ),
        (
            risks.contains_key("headers_footers"),
            "Keep important details out of headers and footers",
        ),
        (
            !s.metrics.sections.projects,
            "Consider adding a projects section to showcase hands-on work",
        ),
    ];
    let mut out = collect_rules(&rules);
    if !s.metrics.sections.certifications {
        out.push("Add relevant certifications if you hold any".to_string());
    }
    out
}

fn risks(s: &Signals) -> BTreeMap<String, String> {
    let mut risks = s.metrics.formatting_risks.clone();
    let words = s.metrics.word_count;

    let missing = s.metrics.sections.missing_required();
    if !missing.is_empty() {
        risks.insert(
            "missing_sections".to_string(),
            format!("Missing key sections: {}", missing.join(", ")),
        );
    }
    if words > 0 && words < 300 {
        risks.insert(
            "too_short".to_string(),
            format!("Resume is short ({words} words); ATS ranking favours 400–800 words"),
        );
    }
    if words > 1200 {
        risks.insert(
            "too_long".to_string(),
            format!("Resume is long ({words} words); recruiters may skip later content"),
        );
    }
    if s.consistency.mixed_dates {
        risks.insert(
            "inconsistent_dates".to_string(),
            "Multiple date formats detected".to_string(),
        );
    }
    if s.consistency.mixed_tense {
        risks.insert(
            "mixed_tense".to_string(),
            "Present and past tense are mixed in the experience section".to_string(),
        );
    }
    risks
}

fn collect_rules(rules: &[(bool, &str)]) -> Vec<String> {
    rules
        .iter()
        .filter(|(fired, _)| *fired)
        .map(|(_, text)| text.to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
