//! Table classification by header row.

use crate::config::Heuristics;

/// What a table's header row says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Attribute rows against timepoint columns.
    Stability,
    /// Lot/study overview rows.
    Summary,
    /// Neither heuristic matched; silently skipped, not an error.
    Unknown,
}

/// Classify a table grid by its header row (row 0), lower-cased and joined
/// across cells. Stability classification takes precedence and is
/// exclusive: a header matching both sets parses as a stability table only.
pub fn classify_table(heuristics: &Heuristics, table: &[Vec<String>]) -> TableKind {
    if table.len() < 2 {
        return TableKind::Unknown;
    }
    let header_text = table[0].join(" ").to_lowercase();

    if heuristics
        .stability_header_keywords
        .iter()
        .any(|kw| header_text.contains(kw.as_str()))
    {
        return TableKind::Stability;
    }
    if heuristics
        .summary_header_keywords
        .iter()
        .any(|kw| header_text.contains(kw.as_str()))
    {
        return TableKind::Summary;
    }
    TableKind::Unknown
}
