//! Definition mining plus standard stability terms.

use std::sync::LazyLock;

use regex::Regex;

use super::GlossaryEntry;
use crate::parse::text::truncate_chars;

/// `"term" means/is defined as/refers to <definition>` in straight or
/// curly quotes. Definitions end at a period or line end.
static DEFINITION_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)"([^"]+)"\s+(?:means|is defined as|refers to)\s+([^\n]+?)(?:\.|\n|$)"#)
            .unwrap(),
        Regex::new(r"(?i)'([^']+)'\s+(?:means|is defined as|refers to)\s+([^\n]+?)(?:\.|\n|$)")
            .unwrap(),
        Regex::new(r"(?i)“([^”]+)”\s+(?:means|is defined as|refers to)\s+([^\n]+?)(?:\.|\n|$)")
            .unwrap(),
    ]
});

const MAX_DEFINITION_CHARS: usize = 500;

/// ICH Q1A definitions used when the guideline itself does not define the
/// term; these carry no source page.
const STANDARD_TERMS: &[(&str, &str)] = &[
    (
        "retest period",
        "The period of time during which the drug substance is expected to remain within its \
         specification and therefore can be used in the manufacture of a given drug product, \
         provided that the drug substance has been stored under the defined conditions.",
    ),
    (
        "shelf life",
        "The time period during which a drug product is expected to remain within the approved \
         specification, provided that it is stored under the conditions defined on the container \
         label.",
    ),
    (
        "accelerated testing",
        "Studies designed to increase the rate of chemical degradation or physical change of a \
         drug substance or drug product by using exaggerated storage conditions.",
    ),
    (
        "in-use stability",
        "Stability of a drug product after opening of the container, reconstitution, dilution, \
         or mixing, as appropriate.",
    ),
];

/// Mine quoted definitions from every page, then append any standard term
/// the document did not define itself (case-insensitive on the term).
pub fn extract_glossary(pages: &[(u32, String)]) -> Vec<GlossaryEntry> {
    let mut entries: Vec<GlossaryEntry> = Vec::new();

    for (page_number, page_text) in pages {
        for pattern in DEFINITION_RES.iter() {
            for caps in pattern.captures_iter(page_text) {
                entries.push(GlossaryEntry {
                    term: caps[1].trim().to_string(),
                    definition: truncate_chars(caps[2].trim(), MAX_DEFINITION_CHARS),
                    source_page: *page_number,
                });
            }
        }
    }

    let seen: Vec<String> = entries.iter().map(|e| e.term.to_lowercase()).collect();
    for (term, definition) in STANDARD_TERMS {
        if !seen.iter().any(|s| s == term) {
            entries.push(GlossaryEntry {
                term: term.to_string(),
                definition: definition.to_string(),
                source_page: 0,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<(u32, String)> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t.to_string()))
            .collect()
    }

    #[test]
    fn quoted_definitions_are_mined_with_page() {
        let entries = extract_glossary(&pages(&[
            "Intro page.",
            "\"bracketing\" means the design of a stability schedule with testing at the extremes.",
        ]));
        let bracketing = entries.iter().find(|e| e.term == "bracketing").unwrap();
        assert_eq!(
            bracketing.definition,
            "the design of a stability schedule with testing at the extremes"
        );
        assert_eq!(bracketing.source_page, 2);
    }

    #[test]
    fn curly_quotes_are_accepted() {
        let entries =
            extract_glossary(&pages(&["“matrixing” refers to testing a subset of samples."]));
        assert!(entries.iter().any(|e| e.term == "matrixing"));
    }

    #[test]
    fn standard_terms_fill_the_gaps() {
        let entries = extract_glossary(&pages(&["No definitions here."]));
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.source_page == 0));
        assert!(entries.iter().any(|e| e.term == "retest period"));
    }

    #[test]
    fn document_definition_suppresses_the_standard_term() {
        let entries = extract_glossary(&pages(&[
            "\"Shelf life\" means the period assigned on the label.",
        ]));
        let shelf: Vec<_> = entries
            .iter()
            .filter(|e| e.term.eq_ignore_ascii_case("shelf life"))
            .collect();
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf[0].source_page, 1);
    }

    #[test]
    fn long_definitions_are_truncated() {
        let text = format!("\"term x\" means {}.", "y".repeat(600));
        let entries = extract_glossary(&pages(&[&text]));
        let entry = entries.iter().find(|e| e.term == "term x").unwrap();
        assert_eq!(entry.definition.chars().count(), 500);
    }
}
