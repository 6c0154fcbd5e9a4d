//! Guideline pipeline entry point.

use super::metadata::{compute_file_checksum, extract_metadata};
use super::{clauses, glossary, rules, sections, AllocationPack};

/// Drives the guideline pipeline over one PDF: text extraction, metadata,
/// section filtering, clause segmentation, rule structuring, glossary.
///
/// Extraction never fails outward: an unreadable PDF yields a pack with
/// checksum metadata only, and the failure is logged.
pub struct GuidelineExtractor {
    file_id: String,
}

impl GuidelineExtractor {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }

    pub fn extract(&self, bytes: &[u8]) -> AllocationPack {
        let mut pack = AllocationPack::default();
        pack.guideline_metadata.file_checksum = compute_file_checksum(bytes);
        pack.guideline_metadata.source_file_id = self.file_id.clone();

        let page_texts = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
            Ok(texts) => texts,
            Err(e) => {
                tracing::error!(file_id = %self.file_id, error = %e, "Guideline extraction failed");
                return pack;
            }
        };
        let pages: Vec<(u32, String)> = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| (i as u32 + 1, text))
            .collect();

        let checksum = std::mem::take(&mut pack.guideline_metadata.file_checksum);
        pack.guideline_metadata = extract_metadata(&self.file_id, &pages);
        pack.guideline_metadata.file_checksum = checksum;

        let all_sections = sections::identify_sections(&pages);
        let stability_sections = sections::filter_stability_sections(all_sections);
        let raw_clauses = clauses::extract_raw_clauses(&stability_sections);
        pack.rules = rules::structure_rules(&self.file_id, raw_clauses);
        pack.glossary = glossary::extract_glossary(&pages);

        tracing::info!(
            file_id = %self.file_id,
            sections = stability_sections.len(),
            rules = pack.rules.len(),
            glossary = pack.glossary.len(),
            "Guideline extraction complete"
        );
        pack
    }
}
