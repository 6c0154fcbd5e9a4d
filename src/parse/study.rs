//! Study detection from narrative keywords.
//!
//! Scans the full concatenated document text, not individual tables: study
//! design is usually stated in prose ("accelerated conditions were...").
//! Each configured keyword present anywhere in the document yields exactly
//! one candidate, anchored to the first page it occurs on.

use crate::config::Heuristics;
use crate::entities::{new_entity_id, ExtractedStudy, SourceAnchor};
use crate::parse::text::{find_ignore_ascii_case, snippet_around, title_case};

/// Context window around the first keyword occurrence.
const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

/// Detect study candidates across a document's pages. Keyword hits carry
/// confidence 0.7; a reviewer confirms or discards them.
pub fn detect_studies(
    heuristics: &Heuristics,
    document_id: &str,
    pages: &[(u32, String)],
) -> Vec<ExtractedStudy> {
    let mut studies = Vec::new();

    for (keyword, study_type) in &heuristics.study_keywords {
        // First page the keyword textually occurs on, with surrounding context.
        let Some((page_number, snippet)) = pages.iter().find_map(|(page, text)| {
            find_ignore_ascii_case(text, keyword)
                .map(|idx| (*page, snippet_around(text, idx, SNIPPET_BEFORE, SNIPPET_AFTER)))
        }) else {
            continue;
        };

        studies.push(ExtractedStudy {
            id: new_entity_id(),
            confidence: 0.7,
            source_anchors: vec![SourceAnchor::document(document_id)
                .with_page(page_number)
                .with_snippet(snippet)],
            study_type: *study_type,
            study_label: format!("{} Stability Study", title_case(keyword)),
            protocol_id: None,
            start_date: None,
            sites: Vec::new(),
            manufacturers: Vec::new(),
        });
    }

    studies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::StudyType;

    fn pages(texts: &[&str]) -> Vec<(u32, String)> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t.to_string()))
            .collect()
    }

    #[test]
    fn keyword_hit_yields_one_study() {
        let h = Heuristics::default();
        let studies = detect_studies(
            &h,
            "doc-1",
            &pages(&["Samples were stored under accelerated conditions."]),
        );
        assert_eq!(studies.len(), 1);
        assert_eq!(studies[0].study_type, StudyType::Accelerated);
        assert_eq!(studies[0].study_label, "Accelerated Stability Study");
        assert_eq!(studies[0].confidence, 0.7);
    }

    #[test]
    fn anchored_to_first_occurrence_page() {
        let h = Heuristics::default();
        let studies = detect_studies(
            &h,
            "doc-1",
            &pages(&[
                "Introduction without keywords.",
                "The photostability study followed ICH Q1B.",
                "photostability repeated later",
            ]),
        );
        assert_eq!(studies.len(), 1);
        let anchor = &studies[0].source_anchors[0];
        assert_eq!(anchor.page_number, Some(2));
        assert!(anchor.text_snippet.as_deref().unwrap().contains("photostability"));
    }

    #[test]
    fn hyphen_and_space_spellings_both_hit() {
        let h = Heuristics::default();
        let studies = detect_studies(
            &h,
            "doc-1",
            &pages(&["Long-term data and long term commitments."]),
        );
        // Both spellings map to long_term; each keyword yields its own candidate.
        assert_eq!(studies.len(), 2);
        assert!(studies.iter().all(|s| s.study_type == StudyType::LongTerm));
    }

    #[test]
    fn detection_is_case_insensitive() {
        let h = Heuristics::default();
        let studies = detect_studies(&h, "doc-1", &pages(&["STRESS testing was performed."]));
        assert_eq!(studies.len(), 1);
        assert_eq!(studies[0].study_type, StudyType::Stress);
    }

    #[test]
    fn no_keywords_no_studies() {
        let h = Heuristics::default();
        assert!(detect_studies(&h, "doc-1", &pages(&["Plain assay method text."])).is_empty());
    }
}
