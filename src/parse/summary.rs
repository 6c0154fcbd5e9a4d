//! Summary/overview table parser: lot rows.

use crate::config::Heuristics;
use crate::entities::{new_entity_id, ExtractedLot, ExtractionResult, SourceAnchor};

fn find_column(header: &[String], keywords: &[String]) -> Option<usize> {
    header
        .iter()
        .position(|h| keywords.iter().any(|kw| h.contains(kw.as_str())))
}

/// Parse a classified summary table: locate the lot / intended-use /
/// manufacturer columns by header keywords and emit one lot per body row
/// with a non-empty lot cell.
pub fn parse_summary_table(
    heuristics: &Heuristics,
    document_id: &str,
    page_number: u32,
    table_ref: &str,
    table: &[Vec<String>],
    result: &mut ExtractionResult,
) {
    let header: Vec<String> = table[0]
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    let Some(lot_col) = find_column(&header, &heuristics.summary_lot_keywords) else {
        return;
    };
    let use_col = find_column(&header, &heuristics.summary_use_keywords);
    let mfr_col = find_column(&header, &heuristics.summary_manufacturer_keywords);

    let cell = |row: &[String], col: Option<usize>| -> Option<String> {
        let value = row.get(col?)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    for (row_idx, row) in table.iter().enumerate().skip(1) {
        let Some(lot_number) = cell(row, Some(lot_col)) else {
            continue;
        };
        result.lots.push(ExtractedLot {
            id: new_entity_id(),
            confidence: 0.85,
            source_anchors: vec![SourceAnchor::document(document_id)
                .with_page(page_number)
                .with_table(table_ref)
                .with_row(row_idx)
                .with_snippet(&lot_number)],
            lot_number,
            manufacturer: cell(row, mfr_col),
            manufacturing_site: None,
            intended_use: cell(row, use_col),
            lot_use_label: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn parse(table: Vec<Vec<String>>) -> ExtractionResult {
        let h = Heuristics::default();
        let mut result = ExtractionResult::new("doc-1");
        parse_summary_table(&h, "doc-1", 2, "table_2_0", &table, &mut result);
        result
    }

    #[test]
    fn lot_rows_emit_lots_with_columns_mapped() {
        let result = parse(grid(&[
            &["Lot number", "Intended use", "Manufacturing site"],
            &["AB-123", "Clinical", "Site A"],
            &["CD-456", "Registration", "Site B"],
        ]));

        assert_eq!(result.lots.len(), 2);
        assert_eq!(result.lots[0].lot_number, "AB-123");
        assert_eq!(result.lots[0].intended_use.as_deref(), Some("Clinical"));
        assert_eq!(result.lots[0].manufacturer.as_deref(), Some("Site A"));
        assert_eq!(result.lots[0].confidence, 0.85);
    }

    #[test]
    fn rows_without_lot_value_are_skipped() {
        let result = parse(grid(&[
            &["Batch", "Purpose"],
            &["", "Clinical"],
            &["XY-1", "Registration"],
        ]));
        assert_eq!(result.lots.len(), 1);
        assert_eq!(result.lots[0].lot_number, "XY-1");
    }

    #[test]
    fn missing_optional_columns_leave_fields_unset() {
        let result = parse(grid(&[&["Lot"], &["AB-123"]]));
        assert_eq!(result.lots.len(), 1);
        assert!(result.lots[0].intended_use.is_none());
        assert!(result.lots[0].manufacturer.is_none());
    }

    #[test]
    fn lot_column_in_any_position_is_found() {
        // Lot column is not first; short body rows tolerated.
        let result = parse(grid(&[
            &["Study", "Batch no.", "Use"],
            &["Long-term", "ZZ-9", "Clinical"],
        ]));
        assert_eq!(result.lots.len(), 1);
        assert_eq!(result.lots[0].lot_number, "ZZ-9");
    }

    #[test]
    fn anchor_records_table_row() {
        let result = parse(grid(&[&["Lot"], &["AB-123"]]));
        let anchor = &result.lots[0].source_anchors[0];
        assert_eq!(anchor.page_number, Some(2));
        assert_eq!(anchor.table_ref.as_deref(), Some("table_2_0"));
        assert_eq!(anchor.row_index, Some(1));
    }
}
