//! JD Match — how well a resume covers a job description.
//!
//! `match_score = round(60·keyword_coverage + 20·skill_overlap + 20·experience_alignment)`
//!
//! - keyword_coverage: JD keywords (see `text::keywords`) found in the resume
//! - skill_overlap: dictionary skills shared between the two texts
//! - experience_alignment: distance between "N years of experience" figures
//!
//! A JD with no extractable keywords scores a neutral 50.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::keywords::{
    dictionary_skills, extract_keywords, normalize_for_matching, MAX_REPORTED_KEYWORDS,
};
use crate::text::metrics::SectionMap;
use crate::text::tables::{RULES_VERSION, YEARS_EXPERIENCE_PATTERN};

const NEUTRAL_MATCH_SCORE: u32 = 50;
const NEUTRAL_SKILL_OVERLAP: f64 = 0.5;
const NEUTRAL_EXPERIENCE: f64 = 0.5;
const UNSTATED_RESUME_EXPERIENCE: f64 = 0.3;

const TOP_RECOMMENDED: usize = 5;
const SUMMARY_FALLBACK_CHARS: usize = 200;
const MAX_SUMMARY_CHARS: usize = 500;

static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(YEARS_EXPERIENCE_PATTERN).unwrap());
static SUMMARY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:professional[ \t]+)?(?:summary|profile|objective|about me)[ \t]*:?[ \t]*(.*)$")
        .unwrap()
});

// ────────────────────────────────────────────────────────────────────────────
// Report models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStats {
    pub jd_keyword_count: usize,
    pub matched_count: usize,
    pub missing_count: usize,
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub skill_overlap_ratio: f64,
    pub resume_years: Option<u32>,
    pub jd_years: Option<u32>,
    pub experience_alignment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JdMatchReport {
    pub match_score: u32, // 0 – 100
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommended_edits: Vec<String>,
    pub tailored_summary: String,
    pub keyword_stats: KeywordStats,
    pub rules_version: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores `resume` against `jd`. Never fails; an empty JD yields the neutral 50.
pub fn score_jd_match(resume: &str, jd: &str) -> JdMatchReport {
    let jd_keywords = extract_keywords(jd);
    let resume_lower = normalize_for_matching(resume);

    let (matched, missing): (Vec<String>, Vec<String>) = jd_keywords
        .iter()
        .cloned()
        .partition(|kw| resume_lower.contains(kw.as_str()));

    let resume_skills = dictionary_skills(resume);
    let jd_skills = dictionary_skills(jd);
    let shared_skills: Vec<&str> = jd_skills
        .iter()
        .copied()
        .filter(|js| {
            resume_skills
                .iter()
                .any(|rs| rs.contains(js) || js.contains(rs))
        })
        .collect();
    let skill_overlap_ratio = if jd_skills.is_empty() {
        NEUTRAL_SKILL_OVERLAP
    } else {
        shared_skills.len() as f64 / jd_skills.len() as f64
    };

    let resume_years = years_of_experience(resume);
    let jd_years = years_of_experience(jd);
    let experience_alignment = experience_alignment(resume_years, jd_years);

    let match_score = if jd_keywords.is_empty() {
        NEUTRAL_MATCH_SCORE
    } else {
        let coverage = matched.len() as f64 / jd_keywords.len() as f64;
        (60.0 * coverage + 20.0 * skill_overlap_ratio + 20.0 * experience_alignment)
            .round()
            .clamp(0.0, 100.0) as u32
    };

    let missing_skills: Vec<&str> = jd_skills
        .iter()
        .copied()
        .filter(|s| !shared_skills.contains(s))
        .collect();
    let recommended_edits = build_recommendations(
        &missing,
        &missing_skills,
        &resume_lower,
        &normalize_for_matching(jd),
        jd_keywords.is_empty(),
    );
    let tailored_summary = build_tailored_summary(resume, &matched, &shared_skills);

    debug!(
        "JD match {}/100 ({} of {} keywords matched)",
        match_score,
        matched.len(),
        jd_keywords.len()
    );

    JdMatchReport {
        match_score,
        keyword_stats: KeywordStats {
            jd_keyword_count: jd_keywords.len(),
            matched_count: matched.len(),
            missing_count: missing.len(),
            resume_skills: resume_skills.iter().map(|s| s.to_string()).collect(),
            jd_skills: jd_skills.iter().map(|s| s.to_string()).collect(),
            skill_overlap_ratio,
            resume_years,
            jd_years,
            experience_alignment,
        },
        matched_keywords: matched.into_iter().take(MAX_REPORTED_KEYWORDS).collect(),
        missing_keywords: missing.into_iter().take(MAX_REPORTED_KEYWORDS).collect(),
        recommended_edits,
        tailored_summary,
        rules_version: RULES_VERSION.to_string(),
    }
}

/// First "N years … experience" figure in the text.
fn years_of_experience(text: &str) -> Option<u32> {
    YEARS_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn experience_alignment(resume_years: Option<u32>, jd_years: Option<u32>) -> f64 {
    let Some(required) = jd_years else {
        return NEUTRAL_EXPERIENCE;
    };
    let Some(actual) = resume_years else {
        return UNSTATED_RESUME_EXPERIENCE;
    };
    match actual.abs_diff(required) {
        0 => 1.0,
        1 => 0.8,
        2 => 0.6,
        3 => 0.4,
        _ => 0.2,
    }
}

fn build_recommendations(
    missing_keywords: &[String],
    missing_skills: &[&str],
    resume_lower: &str,
    jd_lower: &str,
    jd_has_no_keywords: bool,
) -> Vec<String> {
    if jd_has_no_keywords {
        return vec![
            "Paste a fuller job description to get keyword-level recommendations".to_string(),
        ];
    }

    let mut edits = Vec::new();
    if !missing_keywords.is_empty() {
        let top: Vec<&str> = missing_keywords
            .iter()
            .take(TOP_RECOMMENDED)
            .map(String::as_str)
            .collect();
        edits.push(format!(
            "Add these missing keywords from the job description where they honestly apply: {}",
            top.join(", ")
        ));
    }
    if !missing_skills.is_empty() {
        let top: Vec<&str> = missing_skills.iter().take(TOP_RECOMMENDED).copied().collect();
        edits.push(format!(
            "Highlight experience with these required skills if you have it: {}",
            top.join(", ")
        ));
    }
    if jd_lower.contains("lead") && !resume_lower.contains("lead") {
        edits.push(
            "Emphasize leadership experience, such as projects or people you led".to_string(),
        );
    }
    if jd_lower.contains("team") && !resume_lower.contains("team") {
        edits.push("Highlight collaboration and teamwork in your experience bullets".to_string());
    }
    if edits.is_empty() {
        edits.push("Your resume already covers the key requirements of this role".to_string());
    }
    edits
}

/// Existing summary (or resume opening) plus matched keywords and skills, ≤500 chars.
fn build_tailored_summary(resume: &str, matched: &[String], shared_skills: &[&str]) -> String {
    let mut summary = existing_summary(resume).unwrap_or_else(|| {
        resume
            .trim()
            .chars()
            .take(SUMMARY_FALLBACK_CHARS)
            .collect::<String>()
            .trim_end()
            .to_string()
    });

    if !matched.is_empty() {
        let top: Vec<&str> = matched.iter().take(TOP_RECOMMENDED).map(String::as_str).collect();
        summary.push_str(&format!(
            " Key strengths aligned with this role: {}.",
            top.join(", ")
        ));
    }
    if !shared_skills.is_empty() {
        let top: Vec<&str> = shared_skills.iter().take(TOP_RECOMMENDED).copied().collect();
        summary.push_str(&format!(" Core skills: {}.", top.join(", ")));
    }

    summary.trim().chars().take(MAX_SUMMARY_CHARS).collect()
}

/// Body of the summary section: text after the header line up to a blank line or next header.
fn existing_summary(resume: &str) -> Option<String> {
    let mut lines = resume.lines();
    let mut parts: Vec<String> = Vec::new();

    for line in lines.by_ref() {
        if let Some(c) = SUMMARY_HEADER_RE.captures(line) {
            let inline = c.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if !inline.is_empty() {
                parts.push(inline.to_string());
            }
            break;
        }
    }
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() && !parts.is_empty() {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        if is_header_line(trimmed) {
            break;
        }
        parts.push(trimmed.to_string());
    }

    let body = parts.join(" ");
    (!body.is_empty()).then_some(body)
}

fn is_header_line(line: &str) -> bool {
    line.split_whitespace().count() <= 4 && SectionMap::detect(line) != SectionMap::default()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Senior Backend Engineer\n\
        We are hiring a backend engineer with 5+ years of experience building distributed systems.\n\
        Requirements: Rust, PostgreSQL, Kubernetes, AWS. Experience with REST APIs and CI/CD.\n\
        You will lead a small team and own backend services end to end.";

    const RESUME: &str = "Professional Summary\n\
        Backend engineer with 6 years of experience shipping Python services.\n\
        \n\
        Skills\n\
        Python, Django, Docker\n\
        Experience\n\
        - Built billing services for 2 million customers";

    #[test]
    fn test_self_match_is_near_perfect() {
        let report = score_jd_match(JD, JD);
        assert!(report.match_score >= 90, "got {}", report.match_score);
        assert!(report.missing_keywords.is_empty(), "{:?}", report.missing_keywords);
        assert_eq!(report.keyword_stats.experience_alignment, 1.0);
    }

    #[test]
    fn test_self_match_with_irregular_whitespace() {
        let jd = "Senior  Backend Engineer\n\
            Join the Platform Reliability Group with 5+ years of experience.\n\
            We need REST\nAPIs and Machine\tLearning on Kubernetes.";
        let report = score_jd_match(jd, jd);
        assert!(report.missing_keywords.is_empty(), "{:?}", report.missing_keywords);
        assert!(report
            .matched_keywords
            .contains(&"senior backend engineer".to_string()));
        assert!(report.keyword_stats.jd_skills.contains(&"machine learning".to_string()));
        assert_eq!(report.keyword_stats.skill_overlap_ratio, 1.0);
        assert!(report.match_score >= 90, "got {}", report.match_score);
    }

    #[test]
    fn test_empty_jd_is_neutral_50() {
        assert_eq!(score_jd_match(RESUME, "").match_score, 50);
        assert_eq!(score_jd_match("", "   \n ").match_score, 50);
        assert_eq!(score_jd_match("", "").match_score, 50);
    }

    #[test]
    fn test_score_always_in_range() {
        let pairs = [
            ("", JD),
            (RESUME, JD),
            (JD, RESUME),
            ("🙂🙂🙂", "AWS AWS AWS"),
            ("x", "10 years experience 10 years experience"),
        ];
        for (resume, jd) in pairs {
            let report = score_jd_match(resume, jd);
            assert!(report.match_score <= 100);
        }
    }

    #[test]
    fn test_partial_match_reports_missing_keywords_and_skills() {
        let report = score_jd_match(RESUME, JD);
        assert!(report.match_score < 90);
        assert!(report.missing_keywords.contains(&"rust".to_string()));
        assert!(report.matched_keywords.contains(&"backend".to_string()));
        assert!(report
            .recommended_edits
            .iter()
            .any(|e| e.starts_with("Add these missing keywords")));
        assert!(report
            .recommended_edits
            .iter()
            .any(|e| e.contains("kubernetes")));
    }

    #[test]
    fn test_leadership_and_team_prompts() {
        let report = score_jd_match(RESUME, JD);
        assert!(report.recommended_edits.iter().any(|e| e.contains("leadership")));
        assert!(report.recommended_edits.iter().any(|e| e.contains("teamwork")));

        let report = score_jd_match("I lead the platform team", JD);
        assert!(!report.recommended_edits.iter().any(|e| e.contains("leadership")));
        assert!(!report.recommended_edits.iter().any(|e| e.contains("teamwork")));
    }

    #[test]
    fn test_experience_alignment_bands() {
        assert_eq!(experience_alignment(Some(3), None), 0.5);
        assert_eq!(experience_alignment(None, Some(5)), 0.3);
        assert_eq!(experience_alignment(Some(5), Some(5)), 1.0);
        assert_eq!(experience_alignment(Some(6), Some(5)), 0.8);
        assert_eq!(experience_alignment(Some(3), Some(5)), 0.6);
        assert_eq!(experience_alignment(Some(8), Some(5)), 0.4);
        assert_eq!(experience_alignment(Some(1), Some(5)), 0.2);
    }

    #[test]
    fn test_years_of_experience_first_match() {
        assert_eq!(years_of_experience("5+ years of experience"), Some(5));
        assert_eq!(years_of_experience("3 yrs professional experience"), Some(3));
        assert_eq!(years_of_experience("experience: lots"), None);
        assert_eq!(
            years_of_experience("7 years of Go experience, 2 years experience in Rust"),
            Some(7)
        );
    }

    #[test]
    fn test_no_jd_skills_uses_neutral_overlap() {
        let report = score_jd_match(RESUME, "Cooking Cooking pastry pastry");
        assert_eq!(report.keyword_stats.skill_overlap_ratio, 0.5);
    }

    #[test]
    fn test_skill_overlap_either_direction() {
        // "postgresql" in the JD pairs with "sql" found in the resume and vice versa
        let report = score_jd_match("SQL everywhere", "PostgreSQL PostgreSQL");
        assert_eq!(report.keyword_stats.skill_overlap_ratio, 1.0);
    }

    #[test]
    fn test_tailored_summary_uses_existing_summary() {
        let report = score_jd_match(RESUME, JD);
        assert!(report
            .tailored_summary
            .starts_with("Backend engineer with 6 years of experience shipping Python services."));
        assert!(report.tailored_summary.contains("Key strengths aligned with this role:"));
        assert!(!report.tailored_summary.contains("Python, Django"));
    }

    #[test]
    fn test_tailored_summary_falls_back_to_opening_and_truncates() {
        let resume = "word ".repeat(400);
        let report = score_jd_match(&resume, JD);
        assert!(report.tailored_summary.chars().count() <= 500);
        assert!(report.tailored_summary.starts_with("word word"));
    }

    #[test]
    fn test_reported_keywords_capped_at_twenty() {
        let jd: String = (0..40).map(|i| format!("skill{i} skill{i} ")).collect();
        let report = score_jd_match("", &jd);
        assert_eq!(report.missing_keywords.len(), 20);
        assert_eq!(report.keyword_stats.missing_count, 40);
    }
}
