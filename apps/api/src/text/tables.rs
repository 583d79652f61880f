//! Rule tables — every word list and pattern the scorers consult.
//!
//! Tables are plain data so they can be unit-tested and extended without
//! touching scoring logic. Bump `RULES_VERSION` whenever a table changes:
//! the version is stamped into every report so stored scores stay comparable.

/// Version of the rule tables below.
pub const RULES_VERSION: &str = "2024.2";

// ────────────────────────────────────────────────────────────────────────────
// Resume tables
// ────────────────────────────────────────────────────────────────────────────

/// Achievement vocabulary counted by the ATS keyword subscore (16 words).
pub const ACHIEVEMENT_VOCABULARY: &[&str] = &[
    "achieved",
    "improved",
    "increased",
    "reduced",
    "developed",
    "managed",
    "led",
    "created",
    "implemented",
    "designed",
    "delivered",
    "launched",
    "optimized",
    "streamlined",
    "generated",
    "built",
];

/// Action verbs a strong bullet contains (20 words).
pub const ACTION_VERBS: &[&str] = &[
    "led",
    "managed",
    "developed",
    "created",
    "implemented",
    "designed",
    "built",
    "launched",
    "improved",
    "increased",
    "reduced",
    "optimized",
    "delivered",
    "achieved",
    "established",
    "coordinated",
    "analyzed",
    "streamlined",
    "spearheaded",
    "engineered",
];

/// Present-tense forms checked for tense consistency in the experience section.
pub const PRESENT_TENSE_VERBS: &[&str] = &[
    "manage",
    "lead",
    "develop",
    "create",
    "implement",
    "design",
    "build",
];

/// Past-tense counterparts of `PRESENT_TENSE_VERBS`.
pub const PAST_TENSE_VERBS: &[&str] = &[
    "managed",
    "led",
    "developed",
    "created",
    "implemented",
    "designed",
    "built",
];

/// Section name → case-insensitive header pattern, matched anywhere in the text.
pub const SECTION_PATTERNS: &[(&str, &str)] = &[
    ("summary", r"(?i)\b(summary|profile|objective|about me)\b"),
    ("skills", r"(?i)\b(skills|competencies|technologies|tech stack)\b"),
    ("experience", r"(?i)\b(experience|employment|work history)\b"),
    ("projects", r"(?i)\bprojects?\b"),
    (
        "education",
        r"(?i)\b(education|academic|university|college|degree)\b",
    ),
    (
        "certifications",
        r"(?i)\b(certifications?|certificates?|licenses?)\b",
    ),
    (
        "achievements",
        r"(?i)\b(achievements|awards|honors|accomplishments)\b",
    ),
];

/// Date formats whose mixing costs consistency points.
/// `MM/YYYY` carries a leading guard so it does not fire inside `MM/DD/YYYY`.
pub const DATE_FORMAT_PATTERNS: &[&str] = &[
    r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{4}\b",
    r"(?:^|[^/\d])\d{1,2}/\d{4}\b",
    r"\b\d{4}-\d{2}\b",
    r"\b\d{1,2}/\d{1,2}/\d{2,4}\b",
];

/// Stop words dropped during keyword extraction and question keyword picking.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now",
    "old", "see", "two", "way", "who", "did", "yes", "she", "use", "with", "that", "this",
    "will", "your", "from", "they", "have", "been", "were", "what", "when", "where", "which",
    "while", "about", "would", "there", "their", "them", "then", "than", "these", "those",
    "into", "also", "such", "some", "more", "most", "other", "only", "over", "very", "just",
    "should", "could", "being", "both", "each", "must", "able", "work", "working", "role",
    "including", "within", "across", "strong", "plus", "etc",
];

/// Skill dictionary used for resume↔JD overlap.
pub const SKILL_DICTIONARY: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node.js",
    "angular",
    "vue",
    "sql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "git",
    "linux",
    "rust",
    "golang",
    "c++",
    "c#",
    "graphql",
    "rest api",
    "machine learning",
    "deep learning",
    "tensorflow",
    "pytorch",
    "data analysis",
    "agile",
    "scrum",
    "ci/cd",
    "microservices",
    "kafka",
    "spark",
];

/// Skill/domain patterns matched by the keyword index.
pub const SKILL_PATTERNS: &[&str] = &[
    // languages and platforms
    r"(?i)\b(python|java|javascript|typescript|react|node\.?js|angular|vue|sql|nosql|mongodb|postgresql|mysql|redis|aws|azure|gcp|docker|kubernetes|terraform|git|linux|rust|golang|kafka|spark)\b",
    // ML and cloud terms
    r"(?i)\b(machine learning|deep learning|artificial intelligence|data science|nlp|computer vision|tensorflow|pytorch|cloud computing|microservices|devops|ci/cd|serverless)\b",
    // API and process terms
    r"(?i)\b(rest(?:ful)?\s+apis?|graphql|agile|scrum|kanban|api design|system design|distributed systems|unit testing|test[- ]driven development|code review)\b",
];

/// `N years ... experience`, first match wins.
pub const YEARS_EXPERIENCE_PATTERN: &str =
    r"(?i)(\d{1,2})\+?\s*(?:years?|yrs?)\b[^.\n]{0,40}?\bexperience";

// ────────────────────────────────────────────────────────────────────────────
// Answer tables
// ────────────────────────────────────────────────────────────────────────────

/// Common English words. Membership marks a token as a real word.
pub const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when",
    "make", "can", "like", "time", "no", "just", "him", "know", "take", "people", "into",
    "year", "your", "good", "some", "could", "them", "see", "other", "than", "then", "now",
    "look", "only", "come", "its", "over", "think", "also", "back", "after", "use", "two",
    "how", "our", "work", "first", "well", "way", "even", "new", "want", "because", "any",
    "these", "give", "day", "most", "us", "is", "was", "are", "were", "team", "project",
];

/// Words that, making up an entire answer, mark it as a throwaway.
pub const THROWAWAY_WORDS: &[&str] = &[
    "test",
    "testing",
    "asdf",
    "asdfgh",
    "asdfghjkl",
    "qwerty",
    "qwertyuiop",
    "zxcv",
    "zxcvbn",
    "hjkl",
    "hello",
    "hi",
    "abc",
    "abcd",
    "xyz",
    "blah",
    "idk",
    "dunno",
    "nothing",
    "none",
    "na",
    "lorem",
    "ipsum",
    "foo",
    "bar",
];

/// Whole-answer throwaway patterns, applied to the trimmed, lower-cased answer.
pub const RANDOM_PATTERNS: &[&str] = &[
    // single letters separated by spaces
    r"^(?:[a-z]\s+)+[a-z]$",
    // digits only
    r"^[\d\s.,]+$",
    // nothing but symbols and spaces
    r"^[^\p{L}\p{N}]+$",
];

/// STAR keyword groups, checked as lower-cased substrings.
pub const STAR_SITUATION: &[&str] = &[
    "situation",
    "when i was",
    "at my previous",
    "at my last",
    "context",
    "background",
    "we were facing",
];
pub const STAR_TASK: &[&str] = &[
    "task",
    "responsible for",
    "my goal",
    "needed to",
    "objective",
    "challenge",
    "assigned",
];
pub const STAR_ACTION: &[&str] = &[
    "i decided",
    "i implemented",
    "i led",
    "i created",
    "i built",
    "i worked",
    "i developed",
    "i organized",
    "approach",
    "took the initiative",
];
pub const STAR_RESULT: &[&str] = &[
    "result",
    "outcome",
    "achieved",
    "improved",
    "increased",
    "reduced",
    "led to",
    "impact",
    "as a result",
];

/// Technical vocabulary for technical and system-design answers.
pub const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "database",
    "api",
    "cache",
    "latency",
    "throughput",
    "complexity",
    "scalab",
    "thread",
    "concurren",
    "index",
    "query",
    "queue",
    "microservice",
    "load balanc",
    "replica",
    "shard",
    "consisten",
    "protocol",
    "memory",
    "big o",
    "hash",
    "tree",
    "graph",
];

pub const IMPLEMENTATION_TERMS: &[&str] = &[
    "implement",
    "code",
    "function",
    "class",
    "deploy",
    "architecture",
    "refactor",
    "test",
];

pub const EXAMPLE_MARKERS: &[&str] = &[
    "for example",
    "for instance",
    "such as",
    "specifically",
    "in my experience",
    "in one case",
    "once i",
];

pub const PROBLEM_SOLVING_TERMS: &[&str] = &[
    "solved",
    "solution",
    "resolved",
    "debug",
    "troubleshoot",
    "analyzed",
    "root cause",
    "fixed",
    "trade-off",
    "tradeoff",
];

/// Metric mention inside an answer.
pub const ANSWER_METRIC_PATTERN: &str = r"(?i)\d+\s*(%|percent|x\b|times|users|customers|ms\b|seconds|minutes|hours|days|weeks|months|years|k\b|million|people)";

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn test_table_sizes() {
        assert_eq!(ACHIEVEMENT_VOCABULARY.len(), 16);
        assert_eq!(ACTION_VERBS.len(), 20);
        assert_eq!(PRESENT_TENSE_VERBS.len(), 7);
        assert_eq!(PAST_TENSE_VERBS.len(), 7);
        assert_eq!(DATE_FORMAT_PATTERNS.len(), 4);
        assert_eq!(SKILL_PATTERNS.len(), 3);
        assert!(SKILL_DICTIONARY.len() >= 35);
        assert!(COMMON_WORDS.len() >= 90);
        assert!(STOP_WORDS.len() >= 80);
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        for table in [
            ACHIEVEMENT_VOCABULARY,
            ACTION_VERBS,
            STOP_WORDS,
            SKILL_DICTIONARY,
            COMMON_WORDS,
            THROWAWAY_WORDS,
        ] {
            let unique: HashSet<_> = table.iter().collect();
            assert_eq!(unique.len(), table.len(), "duplicate in {table:?}");
        }
    }

    #[test]
    fn test_tables_are_lowercase() {
        for word in STOP_WORDS.iter().chain(COMMON_WORDS).chain(SKILL_DICTIONARY) {
            assert_eq!(*word, word.to_lowercase());
        }
    }

    #[test]
    fn test_all_patterns_compile() {
        let patterns = SECTION_PATTERNS
            .iter()
            .map(|(_, p)| *p)
            .chain(DATE_FORMAT_PATTERNS.iter().copied())
            .chain(SKILL_PATTERNS.iter().copied())
            .chain(RANDOM_PATTERNS.iter().copied())
            .chain([YEARS_EXPERIENCE_PATTERN, ANSWER_METRIC_PATTERN]);
        for pattern in patterns {
            assert!(Regex::new(pattern).is_ok(), "bad pattern {pattern}");
        }
    }

    #[test]
    fn test_month_year_pattern_does_not_match_full_dates() {
        let mm_yyyy = Regex::new(DATE_FORMAT_PATTERNS[1]).unwrap();
        assert!(mm_yyyy.is_match("Engineer 03/2021 - 04/2023"));
        assert!(!mm_yyyy.is_match("Started 01/15/2020"));
    }
}
