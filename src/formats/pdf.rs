//! PDF reader: text layer per page, grids recovered from layout.
//!
//! PDF is the richest format here and the only one that runs the full
//! pipeline: study detection and lot text-fallback work on narrative prose,
//! which DOCX and XLSX submissions in this corpus do not carry in a form
//! worth scanning.

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use crate::formats::{grid, FormatExtractor};
use crate::parse::{self, PageContent};

#[derive(Debug)]
pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn format(&self) -> &'static str {
        "PDF"
    }

    fn extract(
        &self,
        document_id: &str,
        bytes: &[u8],
        heuristics: &Heuristics,
    ) -> ExtractionResult {
        let mut result = ExtractionResult::new(document_id);

        let page_texts = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
            Ok(texts) => texts,
            Err(e) => {
                tracing::error!(document_id, error = %e, "PDF text extraction failed");
                result.errors.push(format!("PDF extraction error: {e}"));
                return result;
            }
        };

        let pages: Vec<PageContent> = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageContent {
                number: i as u32 + 1,
                tables: grid::tables_from_text(&text),
                text,
            })
            .collect();
        let page_texts: Vec<(u32, String)> =
            pages.iter().map(|p| (p.number, p.text.clone())).collect();

        result.studies = parse::study::detect_studies(heuristics, document_id, &page_texts);
        parse::parse_tables(heuristics, document_id, &pages, &mut result);

        // Free-text fallback only when no table produced a lot.
        if result.lots.is_empty() {
            result.lots = parse::lots::lots_from_text(document_id, &page_texts);
        }

        parse::dedup_in_document(&mut result);

        tracing::info!(
            document_id,
            pages = pages.len(),
            entities = result.entity_count(),
            "PDF extraction complete"
        );
        result
    }
}
