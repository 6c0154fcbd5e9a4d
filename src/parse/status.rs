//! Result value interpretation: numeric parse and status inference.

use crate::config::Heuristics;
use crate::entities::ResultStatus;

/// Best-effort float parse of a result cell, stripping thousands commas
/// and percent signs. `None` is non-fatal; the raw text is preserved on
/// the result either way.
pub fn try_parse_numeric(value: &str) -> Option<f64> {
    let cleaned = value.replace(',', "").replace('%', "");
    cleaned.trim().parse::<f64>().ok()
}

/// Infer a conformance status from a raw cell value.
///
/// Exact matches go through the configured status map; any other value
/// that parses as a plain number reports as conforming (a reported numeric
/// result implies the criterion was met, by convention). Unrecognized text
/// yields `None` and the value is carried as-is.
pub fn infer_status(heuristics: &Heuristics, value: &str) -> Option<ResultStatus> {
    let upper = value.trim().to_uppercase();
    if let Some(status) = heuristics.status_for(&upper) {
        return Some(status);
    }
    if try_parse_numeric(&upper).is_some() {
        return Some(ResultStatus::S);
    }
    None
}
