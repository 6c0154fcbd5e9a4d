//! Heuristic configuration tables.
//!
//! Every keyword table the parsers consult lives here as data rather than
//! control flow, so the heuristics can be tuned without touching the
//! parsers. `Heuristics::default()` reproduces the tables the pipeline
//! ships with.

use crate::entities::{ResultStatus, StudyType};

/// Keyword tables driving table classification, study detection, and
/// status inference.
#[derive(Debug, Clone)]
pub struct Heuristics {
    /// Case-insensitive phrases that mark a document as describing a study
    /// of the mapped type. Each hit yields one study candidate.
    pub study_keywords: Vec<(String, StudyType)>,
    /// Header substrings classifying a table as a stability results table.
    pub stability_header_keywords: Vec<String>,
    /// Header substrings classifying a table as a summary/overview table.
    /// Stability classification takes precedence.
    pub summary_header_keywords: Vec<String>,
    /// Header substrings locating the lot column of a summary table.
    pub summary_lot_keywords: Vec<String>,
    /// Header substrings locating the intended-use column.
    pub summary_use_keywords: Vec<String>,
    /// Header substrings locating the manufacturer/site column.
    pub summary_manufacturer_keywords: Vec<String>,
    /// Exact (upper-cased) cell values mapped to a conformance status.
    pub status_map: Vec<(String, ResultStatus)>,
}

impl Default for Heuristics {
    fn default() -> Self {
        let s = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            study_keywords: vec![
                ("accelerated".into(), StudyType::Accelerated),
                ("long-term".into(), StudyType::LongTerm),
                ("long term".into(), StudyType::LongTerm),
                ("intermediate".into(), StudyType::Intermediate),
                ("stress".into(), StudyType::Stress),
                ("photostability".into(), StudyType::Photostability),
            ],
            stability_header_keywords: s(&[
                "quality attribute",
                "analytical procedure",
                "timepoint",
                "acceptance criteria",
                "t0",
                "1w",
                "2w",
                "1m",
                "2m",
                "3m",
            ]),
            summary_header_keywords: s(&["lot", "batch", "study", "condition", "table number"]),
            summary_lot_keywords: s(&["lot", "batch"]),
            summary_use_keywords: s(&["use", "purpose"]),
            summary_manufacturer_keywords: s(&["manufactur", "site"]),
            status_map: vec![
                ("S".into(), ResultStatus::S),
                ("MEETS".into(), ResultStatus::S),
                ("PASS".into(), ResultStatus::S),
                ("CONFORMS".into(), ResultStatus::S),
                ("NS".into(), ResultStatus::Ns),
                ("FAILS".into(), ResultStatus::Ns),
                ("DOES NOT MEET".into(), ResultStatus::Ns),
                ("PENDING".into(), ResultStatus::Pending),
                ("NT".into(), ResultStatus::Nt),
                ("N/A".into(), ResultStatus::Nt),
                ("-".into(), ResultStatus::Nt),
                ("–".into(), ResultStatus::Nt),
            ],
        }
    }
}

impl Heuristics {
    /// Look up an exact status mapping for an upper-cased trimmed value.
    pub fn status_for(&self, upper: &str) -> Option<ResultStatus> {
        self.status_map
            .iter()
            .find(|(k, _)| k == upper)
            .map(|(_, s)| *s)
    }
}
