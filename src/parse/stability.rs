//! Stability results table parser — the core of the pipeline.
//!
//! Layout contract: column 0 is the attribute name, column 1 the
//! acceptance criteria, columns 2+ are timepoint candidates. Rows whose
//! only content is the first cell are method-group headers ("Physical
//! Tests") that scope the attribute rows below them.

use crate::config::Heuristics;
use crate::entities::{
    new_entity_id, ExtractedAttribute, ExtractedResult, ExtractedTimepoint, ExtractionResult,
    SourceAnchor,
};
use crate::parse::condition::table_context;
use crate::parse::status::{infer_status, try_parse_numeric};
use crate::parse::timepoint::parse_timepoint_label;

/// Parse one classified stability table into attributes, timepoints, a
/// condition, and results, appending to `result`.
///
/// The condition and lot for the whole table come from the page's table
/// title line, not from the table itself; without a title match the
/// emitted results carry empty refs ("unlinked").
pub fn parse_stability_table(
    heuristics: &Heuristics,
    document_id: &str,
    page_number: u32,
    table_ref: &str,
    table: &[Vec<String>],
    page_text: &str,
    result: &mut ExtractionResult,
) {
    let header: Vec<String> = table[0].iter().map(|c| c.trim().to_string()).collect();
    let width = header.len();

    // Columns 0 and 1 are reserved; every later column either parses as a
    // timepoint or is excluded from result extraction.
    let mut timepoint_cols: Vec<(usize, ExtractedTimepoint)> = Vec::new();
    for (col_idx, label) in header.iter().enumerate().skip(2) {
        let anchor = SourceAnchor::document(document_id)
            .with_page(page_number)
            .with_table(table_ref)
            .with_row(0)
            .with_col(col_idx)
            .with_snippet(label);
        if let Some(tp) = parse_timepoint_label(label, anchor) {
            if !result.timepoints.iter().any(|t| t.label == tp.label) {
                result.timepoints.push(tp.clone());
            }
            timepoint_cols.push((col_idx, tp));
        }
    }

    let ctx = table_context(document_id, page_number, page_text);
    let condition_ref = ctx
        .condition
        .as_ref()
        .map(|c| c.label.clone())
        .unwrap_or_default();
    let lot_ref = ctx.lot_ref.clone().unwrap_or_default();
    if let Some(condition) = ctx.condition {
        if !result.conditions.iter().any(|c| c.label == condition.label) {
            result.conditions.push(condition);
        }
    }

    let mut current_group: Option<String> = None;
    for (row_idx, raw_row) in table.iter().enumerate().skip(1) {
        // Short rows are treated as having trailing empty cells.
        let mut row: Vec<String> = raw_row.iter().map(|c| c.trim().to_string()).collect();
        row.resize(width.max(row.len()), String::new());

        let cell0 = row[0].clone();
        let rest_empty = row[1..].iter().all(|c| c.is_empty());
        if !cell0.is_empty() && rest_empty {
            current_group = Some(cell0);
            continue;
        }

        let cell1 = row.get(1).cloned().unwrap_or_default();
        if cell0.is_empty() && cell1.is_empty() {
            continue;
        }

        let attr_name = if !cell0.is_empty() {
            cell0
        } else {
            current_group.clone().unwrap_or_default()
        };
        if attr_name.is_empty() {
            continue;
        }

        if !result.attributes.iter().any(|a| a.name == attr_name) {
            result.attributes.push(ExtractedAttribute {
                id: new_entity_id(),
                confidence: 0.85,
                source_anchors: vec![SourceAnchor::document(document_id)
                    .with_page(page_number)
                    .with_table(table_ref)
                    .with_row(row_idx)
                    .with_snippet(&attr_name)],
                name: attr_name.clone(),
                method_group: current_group.clone(),
                analytical_procedure: None,
                acceptance_criteria_text: (!cell1.is_empty()).then(|| cell1.clone()),
            });
        }

        for (col_idx, tp) in &timepoint_cols {
            let value = match row.get(*col_idx) {
                Some(v) if !v.is_empty() => v.clone(),
                _ => continue,
            };
            result.results.push(ExtractedResult {
                id: new_entity_id(),
                confidence: 0.85,
                source_anchors: vec![SourceAnchor::document(document_id)
                    .with_page(page_number)
                    .with_table(table_ref)
                    .with_row(row_idx)
                    .with_col(*col_idx)
                    .with_snippet(&value)],
                lot_ref: lot_ref.clone(),
                condition_ref: condition_ref.clone(),
                timepoint_ref: tp.label.clone(),
                attribute_ref: attr_name.clone(),
                value_numeric: try_parse_numeric(&value),
                status: infer_status(heuristics, &value),
                value_text: value,
                unit: None,
            });
        }
    }
}
