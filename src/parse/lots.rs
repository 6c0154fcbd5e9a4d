//! Text-fallback lot extraction.
//!
//! Runs only when table parsing found no lots. Free-text regex matches are
//! weaker evidence than structured table cells, so fallback lots carry
//! confidence 0.6 against 0.85 for table-sourced ones.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{new_entity_id, ExtractedLot, SourceAnchor};

/// `Lot AB-123`, `Batch No. 7X2`, `Lot #: X-01`...
pub(crate) static LOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Lot|Batch)\s*(?:#|No\.?|Number)?\s*[:\s]*([A-Z0-9][-A-Z0-9]+)").unwrap()
});

/// Scan page texts for lot/batch mentions, one lot per distinct number.
pub fn lots_from_text(document_id: &str, pages: &[(u32, String)]) -> Vec<ExtractedLot> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lots = Vec::new();

    for (page_number, text) in pages {
        for caps in LOT_RE.captures_iter(text) {
            let lot_number = caps[1].to_string();
            if !seen.insert(lot_number.clone()) {
                continue;
            }
            lots.push(ExtractedLot {
                id: new_entity_id(),
                confidence: 0.6,
                source_anchors: vec![SourceAnchor::document(document_id)
                    .with_page(*page_number)
                    .with_snippet(caps.get(0).map(|m| m.as_str()).unwrap_or_default())],
                lot_number,
                manufacturer: None,
                manufacturing_site: None,
                intended_use: None,
                lot_use_label: None,
            });
        }
    }

    lots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_lot_and_batch_mentions() {
        let pages = vec![
            (1, "Stability of Lot AB-123 was assessed.".to_string()),
            (2, "Batch No. 7X-22 stored at ambient conditions.".to_string()),
        ];
        let lots = lots_from_text("doc-1", &pages);
        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0].lot_number, "AB-123");
        assert_eq!(lots[1].lot_number, "7X-22");
    }

    #[test]
    fn fallback_lots_carry_reduced_confidence() {
        let pages = vec![(1, "Lot AB-123".to_string())];
        let lots = lots_from_text("doc-1", &pages);
        assert_eq!(lots[0].confidence, 0.6);
    }

    #[test]
    fn duplicate_mentions_collapse_to_first_page() {
        let pages = vec![
            (1, "Lot AB-123 on page one".to_string()),
            (3, "Lot AB-123 again on page three".to_string()),
        ];
        let lots = lots_from_text("doc-1", &pages);
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].source_anchors[0].page_number, Some(1));
    }

    #[test]
    fn anchor_snippet_is_the_full_match() {
        let pages = vec![(2, "See Batch Number 9Z-04 for details".to_string())];
        let lots = lots_from_text("doc-1", &pages);
        assert_eq!(
            lots[0].source_anchors[0].text_snippet.as_deref(),
            Some("Batch Number 9Z-04")
        );
    }

    #[test]
    fn prose_without_lots_yields_nothing() {
        let pages = vec![(1, "No manufacturing identifiers here.".to_string())];
        assert!(lots_from_text("doc-1", &pages).is_empty());
    }
}
