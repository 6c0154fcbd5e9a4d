//! Guideline rule extraction.
//!
//! A secondary pipeline that reads regulatory guideline PDFs (EMA IMPD
//! Quality and similar) and turns their stability obligations into
//! structured MUST/SHOULD/MAY rules with traceability anchors. Output is
//! an [`AllocationPack`]: metadata, rules, and a glossary. Every rule is a
//! candidate for human review, never applied unconfirmed.

pub mod clauses;
pub mod extractor;
pub mod glossary;
pub mod metadata;
pub mod rules;
pub mod sections;

use serde::{Deserialize, Serialize};

pub use extractor::GuidelineExtractor;

// ═══════════════════════════════════════════════════════════════════
// Enumerations
// ═══════════════════════════════════════════════════════════════════

/// Obligation strength of a guideline clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementLevel {
    Must,
    Should,
    May,
}

impl RequirementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::May => "MAY",
        }
    }
}

/// How a rule violation is surfaced at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Submission cannot proceed. Assigned to MUST rules.
    Block,
    /// Flagged but not blocking. Assigned to SHOULD and MAY rules.
    Warn,
}

/// Which dossier side a rule binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Drug substance (3.2.S.7).
    #[serde(rename = "DS")]
    Ds,
    /// Drug product (3.2.P.8).
    #[serde(rename = "DP")]
    Dp,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ds => "DS",
            Self::Dp => "DP",
        }
    }

    /// UI field prefix ("ds" / "dp").
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Self::Ds => "ds",
            Self::Dp => "dp",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Pack contents
// ═══════════════════════════════════════════════════════════════════

/// Front-matter identification of the source guideline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuidelineMetadata {
    pub title: String,
    pub agency: String,
    pub document_id: String,
    pub version: String,
    pub publication_date: String,
    pub file_checksum: String,
    pub source_file_id: String,
}

/// Where in the source document a rule came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTraceability {
    pub source_file_id: String,
    pub page: u32,
    pub section_heading: String,
    /// At most 25 words of the source clause.
    pub excerpt_snippet: String,
}

/// How a rule is checked against an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleValidation {
    pub severity: Severity,
    /// Declarative expression over UI fields, or `manual_review_required`.
    pub logic: String,
}

/// One structured obligation extracted from a guideline clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRule {
    pub rule_id: String,
    pub applies_to: Vec<Scope>,
    /// CTD / IMPD section numbers the rule maps onto.
    pub mapped_app_sections: Vec<String>,
    pub requirement_level: RequirementLevel,
    pub rule_text: String,
    pub evidence_expected: Vec<String>,
    pub ui_fields_required: Vec<String>,
    pub validation: RuleValidation,
    pub traceability: RuleTraceability,
    pub confidence: f32,
}

/// A defined term found in the guideline (or a standard fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
    /// 0 for standard terms not anchored to a page.
    pub source_page: u32,
}

/// Full output of one guideline extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationPack {
    pub guideline_metadata: GuidelineMetadata,
    pub rules: Vec<ExtractedRule>,
    pub glossary: Vec<GlossaryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Scope::Ds).unwrap(), "\"DS\"");
        assert_eq!(serde_json::to_string(&Scope::Dp).unwrap(), "\"DP\"");
    }

    #[test]
    fn requirement_levels_serialize_screaming() {
        assert_eq!(
            serde_json::to_string(&RequirementLevel::Must).unwrap(),
            "\"MUST\""
        );
        assert_eq!(serde_json::to_string(&Severity::Block).unwrap(), "\"BLOCK\"");
    }

    #[test]
    fn rule_serializes_with_nested_validation() {
        let rule = ExtractedRule {
            rule_id: "EMA-IMPD-S7-001".into(),
            applies_to: vec![Scope::Ds],
            mapped_app_sections: vec!["3.2.S.7".into()],
            requirement_level: RequirementLevel::Must,
            rule_text: "Stability data must be provided.".into(),
            evidence_expected: vec![],
            ui_fields_required: vec![],
            validation: RuleValidation {
                severity: Severity::Block,
                logic: "manual_review_required".into(),
            },
            traceability: RuleTraceability::default(),
            confidence: 0.7,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["validation"]["severity"], "BLOCK");
        assert_eq!(json["applies_to"][0], "DS");
        assert_eq!(json["requirement_level"], "MUST");
    }
}
