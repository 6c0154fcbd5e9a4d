//! Guideline front-matter parsing.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use super::GuidelineMetadata;

/// `EMA/CHMP/QWP/545525/2017`, `CPMP/QWP/185401`, `ICH Q1A`...
static DOC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(EMA/\S+/\d+|CHMP/\S+/\d+|CPMP/\S+/\d+|ICH\s+\S+)").unwrap());

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:revision|version|rev\.?)\s*(\d+[.\d]*)").unwrap());

/// `21 March 2022`, `March 2022`, or ISO `2022-03-21`.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}\s+\w+\s+\d{4}|\w+\s+\d{4}|\d{4}-\d{2}-\d{2})").unwrap());

/// Pages of front matter scanned for metadata.
const FRONT_MATTER_PAGES: usize = 5;
/// Candidate title lines considered at the top of the front matter.
const TITLE_CANDIDATE_LINES: usize = 15;

/// SHA-256 of the raw document bytes, hex-encoded.
pub fn compute_file_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read title, agency, document id, version and date off the first pages.
/// Absent fields stay empty; the agency defaults to EMA.
pub fn extract_metadata(file_id: &str, pages: &[(u32, String)]) -> GuidelineMetadata {
    let front: Vec<&str> = pages
        .iter()
        .take(FRONT_MATTER_PAGES)
        .map(|(_, text)| text.as_str())
        .collect();
    let front_text = front.join("\n");

    let mut meta = GuidelineMetadata {
        agency: "EMA".to_string(),
        source_file_id: file_id.to_string(),
        ..GuidelineMetadata::default()
    };

    // Title heuristic: first substantial line that is not a page marker.
    for line in front_text.trim().lines().take(TITLE_CANDIDATE_LINES) {
        let line = line.trim();
        if line.chars().count() > 20 && !line.starts_with("Page") {
            meta.title = line.to_string();
            break;
        }
    }

    let lower = front_text.to_lowercase();
    if lower.contains("ema") || lower.contains("european medicines agency") {
        meta.agency = "EMA".to_string();
    } else if lower.contains("fda") || lower.contains("food and drug administration") {
        meta.agency = "FDA".to_string();
    } else if lower.contains("ich") {
        meta.agency = "ICH".to_string();
    }

    if let Some(caps) = DOC_ID_RE.captures(&front_text) {
        meta.document_id = caps[1].to_string();
    }
    if let Some(caps) = VERSION_RE.captures(&front_text) {
        meta.version = format!("Revision {}", &caps[1]);
    }
    if let Some(caps) = DATE_RE.captures(&front_text) {
        meta.publication_date = caps[1].to_string();
    }

    meta
}
