//! Storage-condition and lot context from table titles.
//!
//! Stability tables do not name their own condition or lot; both come from
//! the `Table <n>-<n>: <title>` line in the surrounding page text. Without
//! a title match, results from the table carry empty refs, meaning
//! "unlinked" to the merge stage.

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{new_entity_id, ExtractedCondition, SourceAnchor};
use crate::parse::lots::LOT_RE;
use crate::parse::text::truncate_chars;

/// `Table 2-1: Long-term 25°C/60% RH, Lot AB-123` — group 1 is the table
/// number, group 2 the title text. Single line; titles do not wrap in the
/// layouts this targets.
static TABLE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Table\s+([\d.]+[-–]\d+)\s*[:\s]*(.+)").unwrap());

/// Range form `-60 to -30 °C` (groups 1, 2) or tolerance form `-20 ± 5 °C`
/// (groups 3, 4). A bare `25°C` matches group 1 alone.
static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?\d+)\s*(?:to\s*(-?\d+))?\s*°?\s*C|(-?\d+)\s*±\s*(\d+)\s*°?\s*C").unwrap()
});

static HUMIDITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*%\s*RH").unwrap());

/// Condition and lot reference inferred from a table's title line.
#[derive(Debug, Default)]
pub struct TableContext {
    pub condition: Option<ExtractedCondition>,
    pub lot_ref: Option<String>,
}

/// Search page text for a table title and derive the storage condition and
/// lot reference for that table's results.
pub fn table_context(document_id: &str, page_number: u32, page_text: &str) -> TableContext {
    let Some(caps) = TABLE_TITLE_RE.captures(page_text) else {
        return TableContext::default();
    };
    let table_number = caps.get(1).map(|m| m.as_str().to_string());
    let title_text = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let condition = CONDITION_RE.captures(title_text).map(|cond| {
        parse_condition(
            document_id,
            page_number,
            table_number.as_deref(),
            title_text,
            &cond,
        )
    });

    let lot_ref = LOT_RE
        .captures(title_text)
        .map(|caps| caps[1].to_string());

    TableContext { condition, lot_ref }
}

fn parse_condition(
    document_id: &str,
    page_number: u32,
    table_number: Option<&str>,
    title_text: &str,
    caps: &regex::Captures<'_>,
) -> ExtractedCondition {
    let int_at = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i64>().ok());

    let (label, setpoint, tolerance) = match (int_at(1), int_at(2), int_at(3), int_at(4)) {
        (Some(min), Some(max), _, _) => (
            format!("{min} to {max} °C"),
            Some((min + max) as f64 / 2.0),
            None,
        ),
        (_, _, Some(set), Some(tol)) => (
            format!("{set} ± {tol} °C"),
            Some(set as f64),
            Some(format!("± {tol} °C")),
        ),
        _ => (caps[0].to_string(), None, None),
    };

    let humidity = HUMIDITY_RE
        .find(title_text)
        .map(|m| m.as_str().to_string());

    let mut anchor = SourceAnchor::document(document_id).with_page(page_number);
    anchor.section_ref = table_number.map(|n| format!("Table {n}"));
    anchor.text_snippet = Some(truncate_chars(title_text, 200));

    ExtractedCondition {
        id: new_entity_id(),
        confidence: 0.9,
        source_anchors: vec![anchor],
        label,
        temperature_setpoint: setpoint,
        tolerance,
        humidity,
    }
}
