//! Timepoint column-header parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{new_entity_id, ExtractedTimepoint, SourceAnchor, TimeUnit};

/// `3M`, `2 W`, `6 months`, `24H`... anchored at the start of the label so
/// a header like "Remarks (3M)" is not mistaken for a timepoint column.
static TIMEPOINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(week|month|day|hour|w|m|d|h)s?\b").unwrap()
});

/// Parse a column header into a timepoint candidate.
///
/// `"T0"`, `"Initial"` and `"0"` map to the zero-month origin at
/// confidence 0.95; `<integer><unit>` labels parse at confidence 0.9 with
/// `sort_order` normalized to hours. Anything else is not a timepoint and
/// the caller must exclude the column from result extraction.
pub fn parse_timepoint_label(label: &str, anchor: SourceAnchor) -> Option<ExtractedTimepoint> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if label.eq_ignore_ascii_case("T0")
        || label.eq_ignore_ascii_case("Initial")
        || label == "0"
    {
        return Some(ExtractedTimepoint {
            id: new_entity_id(),
            confidence: 0.95,
            source_anchors: vec![anchor],
            value: 0.0,
            unit: TimeUnit::Month,
            label: "T0".to_string(),
            sort_order: 0,
        });
    }

    let caps = TIMEPOINT_RE.captures(label)?;
    let value: f64 = caps[1].parse().ok()?;
    let unit = match caps[2].to_ascii_uppercase().as_str() {
        "W" | "WEEK" => TimeUnit::Week,
        "M" | "MONTH" => TimeUnit::Month,
        "D" | "DAY" => TimeUnit::Day,
        "H" | "HOUR" => TimeUnit::Hour,
        _ => TimeUnit::Month,
    };

    Some(ExtractedTimepoint {
        id: new_entity_id(),
        confidence: 0.9,
        source_anchors: vec![anchor],
        value,
        unit,
        label: label.to_string(),
        sort_order: (value * unit.hours() as f64) as i64,
    })
}
