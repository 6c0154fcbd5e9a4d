//! Shared entity parsers.
//!
//! One table classifier and parser set consumed by all three format
//! extractors; the formats differ only in how they obtain page text and
//! table grids.

pub mod classify;
pub mod condition;
pub mod lots;
pub mod stability;
pub mod status;
pub mod study;
pub mod summary;
pub mod text;
pub mod timepoint;

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use classify::TableKind;

/// A table as an ordered list of rows of cell strings. Empty cells are
/// empty strings, never missing; short rows are padded downstream.
pub type TableGrid = Vec<Vec<String>>;

/// One page (or sheet) of reader output: 1-based number, plain text, and
/// the table grids found on it.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub number: u32,
    pub text: String,
    pub tables: Vec<TableGrid>,
}

/// Classify and parse every table on every page, appending entities to
/// `result`. Tables matching neither heuristic are silently skipped —
/// a deliberate low-noise choice for a best-effort pipeline.
pub fn parse_tables(
    heuristics: &Heuristics,
    document_id: &str,
    pages: &[PageContent],
    result: &mut ExtractionResult,
) {
    for page in pages {
        for (table_idx, table) in page.tables.iter().enumerate() {
            if table.len() < 2 {
                continue;
            }
            let table_ref = format!("table_{}_{}", page.number, table_idx);
            match classify::classify_table(heuristics, table) {
                TableKind::Stability => stability::parse_stability_table(
                    heuristics,
                    document_id,
                    page.number,
                    &table_ref,
                    table,
                    &page.text,
                    result,
                ),
                TableKind::Summary => summary::parse_summary_table(
                    heuristics,
                    document_id,
                    page.number,
                    &table_ref,
                    table,
                    result,
                ),
                TableKind::Unknown => {
                    tracing::debug!(
                        document_id,
                        table_ref,
                        "Table matched no classification heuristic, skipping"
                    );
                }
            }
        }
    }
}

/// In-document cleanup after table parsing: collapse duplicate conditions
/// and lots by natural key, keeping the highest confidence. Attributes and
/// timepoints were already deduplicated inline during parsing; studies and
/// results are never collapsed.
pub fn dedup_in_document(result: &mut ExtractionResult) {
    let conditions = std::mem::take(&mut result.conditions);
    result.conditions = crate::merge::dedup_by_key(conditions, |c| c.label.clone(), |c| c.confidence);

    let lots = std::mem::take(&mut result.lots);
    result.lots = crate::merge::dedup_by_key(lots, |l| l.lot_number.clone(), |l| l.confidence);
}
