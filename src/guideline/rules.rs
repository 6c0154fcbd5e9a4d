//! Rule structuring: ids, section mappings, field and evidence inference.

use super::clauses::RawClause;
use super::{
    ExtractedRule, RequirementLevel, RuleTraceability, RuleValidation, Scope, Severity,
};

/// Confidence assigned to every keyword-derived rule; human review decides.
const RULE_CONFIDENCE: f32 = 0.7;

/// Maximum words carried into the traceability excerpt.
const EXCERPT_WORDS: usize = 25;

/// Rule text keywords mapped to the UI fields they require. `{scope}`
/// expands per applicable side (ds/dp).
const FIELD_MAPPINGS: &[(&str, &str)] = &[
    ("retest period", "ds.retest_period"),
    ("retest date", "ds.retest_period"),
    ("shelf life", "dp.shelf_life"),
    ("shelf-life", "dp.shelf_life"),
    ("storage condition", "{scope}.storage_conditions"),
    ("accelerated", "{scope}.study_accelerated"),
    ("long-term", "{scope}.study_long_term"),
    ("long term", "{scope}.study_long_term"),
    ("in-use stability", "dp.in_use_stability"),
    ("in use stability", "dp.in_use_stability"),
    ("stability commitment", "{scope}.stability_commitment"),
    ("ongoing stability", "{scope}.stability_commitment"),
    ("stability program", "{scope}.stability_commitment"),
    ("tabulated", "{scope}.stability_table"),
    ("summary", "{scope}.stability_table"),
    ("photostability", "{scope}.study_photostability"),
    ("stress", "{scope}.study_stress"),
    ("reconstitution", "dp.in_use_stability"),
    ("dilution", "dp.in_use_stability"),
    ("multi-dose", "dp.in_use_stability"),
    ("specification", "{scope}.specification_reference"),
    ("container closure", "{scope}.container_closure"),
    ("batch", "{scope}.lot_information"),
];

/// Evidence artifact names mapped to the rule text keywords implying them.
const EVIDENCE_MAP: &[(&str, &[&str])] = &[
    ("stability table", &["table", "tabulated", "data", "results"]),
    ("retest period statement", &["retest period", "retest date"]),
    ("shelf-life statement", &["shelf life", "shelf-life"]),
    (
        "storage condition specification",
        &["storage condition", "store at"],
    ),
    (
        "stability commitment statement",
        &["commitment", "ongoing", "stability program"],
    ),
    ("accelerated study results", &["accelerated"]),
    ("long-term study results", &["long-term", "long term"]),
    ("photostability study", &["photostability", "photo"]),
    (
        "in-use stability data",
        &["in-use", "in use", "reconstitut", "dilut"],
    ),
    ("stress study results", &["stress", "forced degradation"]),
    ("justification statement", &["justif", "rationale"]),
];

/// Convert raw clauses into numbered, mapped rules. Ids are assigned from
/// three independent counters keyed on scope: `EMA-IMPD-S7-NNN` for
/// DS-only, `EMA-IMPD-P8-NNN` for DP-only, `EMA-IMPD-GEN-NNN` otherwise.
pub fn structure_rules(file_id: &str, raw_clauses: Vec<RawClause>) -> Vec<ExtractedRule> {
    let mut rules = Vec::new();
    let mut ds_counter = 0u32;
    let mut dp_counter = 0u32;
    let mut gen_counter = 0u32;

    for raw in raw_clauses {
        let is_ds = raw.applies_to.contains(&Scope::Ds);
        let is_dp = raw.applies_to.contains(&Scope::Dp);

        let rule_id = if is_ds && !is_dp {
            ds_counter += 1;
            format!("EMA-IMPD-S7-{ds_counter:03}")
        } else if is_dp && !is_ds {
            dp_counter += 1;
            format!("EMA-IMPD-P8-{dp_counter:03}")
        } else {
            gen_counter += 1;
            format!("EMA-IMPD-GEN-{gen_counter:03}")
        };

        let mut mapped_app_sections = Vec::new();
        if is_ds {
            mapped_app_sections.extend(["3.2.S.7".to_string(), "2.2.1.S.7".to_string()]);
        }
        if is_dp {
            mapped_app_sections.extend(["3.2.P.8".to_string(), "2.2.1.P.8".to_string()]);
        }

        let ui_fields = infer_ui_fields(&raw.text, &raw.applies_to);
        let evidence = infer_evidence(&raw.text);
        let severity = match raw.level {
            RequirementLevel::Must => Severity::Block,
            _ => Severity::Warn,
        };
        let logic = infer_validation_logic(&ui_fields);

        rules.push(ExtractedRule {
            rule_id,
            applies_to: raw.applies_to,
            mapped_app_sections,
            requirement_level: raw.level,
            evidence_expected: evidence,
            ui_fields_required: ui_fields,
            validation: RuleValidation { severity, logic },
            traceability: RuleTraceability {
                source_file_id: file_id.to_string(),
                page: raw.page,
                section_heading: raw.section_heading,
                excerpt_snippet: excerpt(&raw.text),
            },
            rule_text: raw.text,
            confidence: RULE_CONFIDENCE,
        });
    }
    rules
}

/// UI fields a rule requires, inferred from its text. Insertion order is
/// kept and duplicates dropped, so output is deterministic.
fn infer_ui_fields(text: &str, applies_to: &[Scope]) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut fields: Vec<String> = Vec::new();

    for (keyword, template) in FIELD_MAPPINGS {
        if !lower.contains(keyword) {
            continue;
        }
        if template.contains("{scope}") {
            for scope in applies_to {
                let field = template.replace("{scope}", scope.field_prefix());
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        } else if !fields.contains(&template.to_string()) {
            fields.push(template.to_string());
        }
    }
    fields
}

fn infer_evidence(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    EVIDENCE_MAP
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(evidence, _)| evidence.to_string())
        .collect()
}

/// Presence checks over the required fields, or a manual-review marker
/// when nothing concrete can be checked mechanically.
fn infer_validation_logic(ui_fields: &[String]) -> String {
    if ui_fields.is_empty() {
        return "manual_review_required".to_string();
    }
    ui_fields
        .iter()
        .map(|f| format!("field_present('{f}')"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn excerpt(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut snippet = words[..words.len().min(EXCERPT_WORDS)].join(" ");
    if words.len() > EXCERPT_WORDS {
        snippet.push_str("...");
    }
    snippet
}
