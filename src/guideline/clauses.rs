//! Clause segmentation and obligation detection.

use std::sync::LazyLock;

use regex::Regex;

use super::sections::Section;
use super::{RequirementLevel, Scope};

static MUST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:must|shall|mandatory)\b|\b(?:is|are)\s+required\b|\bis\s+expected\s+to\b")
        .unwrap()
});

static SHOULD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:should|normally|generally)\b|\bis\s+(?:recommended|advisable)\b").unwrap()
});

static MAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:may|can|optional)\b|\bif\s+applicable\b|\bwhere\s+relevant\b").unwrap()
});

static DS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b3\.2\.S\.7\b|\b2\.2\.1\.S\.7\b|\bdrug\s+substance\s+stability\b|\bretest\s+period\b",
    )
    .unwrap()
});

static DP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b3\.2\.P\.8\b|\b2\.2\.1\.P\.8\b|\bdrug\s+product\s+stability\b|\bshelf[\s-]?life\b",
    )
    .unwrap()
});

/// Clauses shorter than this carry no extractable obligation.
const MIN_CLAUSE_CHARS: usize = 15;

/// One obligation-bearing clause with its section context.
#[derive(Debug, Clone)]
pub struct RawClause {
    pub text: String,
    pub level: RequirementLevel,
    pub applies_to: Vec<Scope>,
    pub section_heading: String,
    pub page: u32,
}

/// Split body text into sentence-level clauses at `.` or `;` followed by
/// whitespace. Terminators stay attached to their clause.
pub fn split_clauses(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut clauses = Vec::new();
    let mut start = 0usize;

    for i in 0..bytes.len() {
        if (bytes[i] == b'.' || bytes[i] == b';')
            && bytes.get(i + 1).is_some_and(|b| b.is_ascii_whitespace())
        {
            let clause = text[start..=i].trim();
            if !clause.is_empty() {
                clauses.push(clause.to_string());
            }
            start = i + 1;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        clauses.push(tail.to_string());
    }
    clauses
}

/// MUST beats SHOULD beats MAY: "should normally ... must" is a MUST.
/// Returns `None` for clauses stating no obligation.
pub fn detect_requirement_level(text: &str) -> Option<RequirementLevel> {
    if MUST_RE.is_match(text) {
        Some(RequirementLevel::Must)
    } else if SHOULD_RE.is_match(text) {
        Some(RequirementLevel::Should)
    } else if MAY_RE.is_match(text) {
        Some(RequirementLevel::May)
    } else {
        None
    }
}

/// Decide whether a clause binds drug substance, drug product, or both.
/// A clause naming neither side explicitly binds both.
pub fn determine_scopes(text: &str, heading: &str) -> Vec<Scope> {
    let combined = format!("{text} {heading}");
    let mut scopes = Vec::new();
    if DS_RE.is_match(&combined) {
        scopes.push(Scope::Ds);
    }
    if DP_RE.is_match(&combined) {
        scopes.push(Scope::Dp);
    }
    if scopes.is_empty() {
        scopes = vec![Scope::Ds, Scope::Dp];
    }
    scopes
}

fn is_reference_clause(lower: &str) -> bool {
    lower.starts_with("see ") || lower.starts_with("refer to ") || lower.starts_with("note:")
}

/// Walk stability sections and keep every clause stating an obligation,
/// discarding short fragments and pure cross-references.
pub fn extract_raw_clauses(sections: &[Section]) -> Vec<RawClause> {
    let mut raw = Vec::new();

    for section in sections {
        for clause in split_clauses(&section.text) {
            if clause.chars().count() < MIN_CLAUSE_CHARS {
                continue;
            }
            if is_reference_clause(&clause.to_lowercase()) {
                continue;
            }
            let Some(level) = detect_requirement_level(&clause) else {
                continue;
            };
            let applies_to = determine_scopes(&clause, &section.heading);
            raw.push(RawClause {
                text: clause,
                level,
                applies_to,
                section_heading: section.full_heading(),
                page: section.page,
            });
        }
    }
    raw
}
