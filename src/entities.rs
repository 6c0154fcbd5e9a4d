//! Entity model for extracted stability data.
//!
//! Every entity carries a generated id, a heuristic confidence in [0, 1],
//! and the source anchors tying it back to its document/page/table/cell
//! origin. Entities are immutable once created: deduplication builds new
//! lists and never edits instances in place, so anchors handed to a review
//! screen stay valid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════
// Source traceability
// ═══════════════════════════════════════════

/// Bounding box for a page region (reserved for renderers that report
/// geometry; the text-based extractors leave it unset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Links an extracted datum to its exact location in the source document.
///
/// Anchors are append-only: they are created once and aggregated, never
/// edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAnchor {
    pub document_id: String,
    pub page_number: Option<u32>,
    pub section_ref: Option<String>,
    /// Logical table identifier within the document, e.g. `table_2_0`.
    pub table_ref: Option<String>,
    pub row_index: Option<usize>,
    pub col_index: Option<usize>,
    pub bounding_box: Option<BoundingBox>,
    /// Human-reviewable context, at most ~300 characters.
    pub text_snippet: Option<String>,
}

impl SourceAnchor {
    /// Anchor with only a document id; callers fill in what they know.
    pub fn document(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            page_number: None,
            section_ref: None,
            table_ref: None,
            row_index: None,
            col_index: None,
            bounding_box: None,
            text_snippet: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    pub fn with_table(mut self, table_ref: impl Into<String>) -> Self {
        self.table_ref = Some(table_ref.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row_index = Some(row);
        self
    }

    pub fn with_col(mut self, col: usize) -> Self {
        self.col_index = Some(col);
        self
    }

    /// Attach a context snippet, truncated to 300 characters on a char
    /// boundary.
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.text_snippet = Some(crate::parse::text::truncate_chars(snippet, 300));
        self
    }
}

// ═══════════════════════════════════════════
// Enumerations
// ═══════════════════════════════════════════

/// Stability study design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyType {
    LongTerm,
    Accelerated,
    Intermediate,
    Stress,
    Photostability,
    Other,
}

impl StudyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongTerm => "long_term",
            Self::Accelerated => "accelerated",
            Self::Intermediate => "intermediate",
            Self::Stress => "stress",
            Self::Photostability => "photostability",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for StudyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Timepoint unit with its hour-normalization multiplier, used to order
/// timepoints chronologically across mixed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Fixed multiplier to hours (month and year use calendar averages).
    pub fn hours(&self) -> i64 {
        match self {
            Self::Hour => 1,
            Self::Day => 24,
            Self::Week => 168,
            Self::Month => 730,
            Self::Year => 8760,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Conformance status inferred from a raw result cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    /// Satisfies acceptance criteria.
    #[serde(rename = "S")]
    S,
    /// Does not satisfy acceptance criteria.
    #[serde(rename = "NS")]
    Ns,
    /// Result not yet available.
    #[serde(rename = "Pending")]
    Pending,
    /// Not tested at this timepoint.
    #[serde(rename = "NT")]
    Nt,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::Ns => "NS",
            Self::Pending => "Pending",
            Self::Nt => "NT",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════
// Extracted entities
// ═══════════════════════════════════════════

/// A stability study detected from narrative keywords.
///
/// Keyword hits are cheap low-confidence candidates that a reviewer
/// triages; they are never deduplicated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedStudy {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub study_type: StudyType,
    pub study_label: String,
    pub protocol_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub sites: Vec<String>,
    pub manufacturers: Vec<String>,
}

/// A manufacturing batch. Natural key: `lot_number` (case-sensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedLot {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub lot_number: String,
    pub manufacturer: Option<String>,
    pub manufacturing_site: Option<String>,
    pub intended_use: Option<String>,
    pub lot_use_label: Option<String>,
}

/// A storage condition. Natural key: `label` (e.g. `"25°C"` or
/// `"-20 ± 5 °C"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCondition {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub label: String,
    pub temperature_setpoint: Option<f64>,
    pub tolerance: Option<String>,
    pub humidity: Option<String>,
}

/// A study timepoint. Natural key: `(value, unit)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTimepoint {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub value: f64,
    pub unit: TimeUnit,
    /// Display label exactly as it appeared, e.g. `"3M"` or `"T0"`.
    pub label: String,
    /// `value` normalized to hours; ascending sort is chronological for
    /// any mix of units.
    pub sort_order: i64,
}

impl ExtractedTimepoint {
    /// Dedup key: value bits + unit (values come from identical parsed
    /// integers, so bit equality is exact equality here).
    pub fn natural_key(&self) -> (u64, TimeUnit) {
        (self.value.to_bits(), self.unit)
    }
}

/// A quality attribute / test item. Natural key: `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAttribute {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub name: String,
    /// Raw group-header string the attribute was parsed under, if any.
    pub method_group: Option<String>,
    pub analytical_procedure: Option<String>,
    pub acceptance_criteria_text: Option<String>,
}

/// One measured value at the intersection of a lot, a condition, a
/// timepoint, and an attribute.
///
/// References are natural-key strings until a later link stage resolves
/// them; an empty string means "unlinked". Results are never deduplicated:
/// every plausible cell produces one record, because a false merge would
/// silently drop a real measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedResult {
    pub id: Uuid,
    pub confidence: f32,
    pub source_anchors: Vec<SourceAnchor>,
    pub lot_ref: String,
    pub condition_ref: String,
    pub timepoint_ref: String,
    pub attribute_ref: String,
    pub value_text: String,
    pub value_numeric: Option<f64>,
    pub status: Option<ResultStatus>,
    pub unit: Option<String>,
}

/// Complete extraction output for one document (or a merged batch).
///
/// `errors` holds non-fatal parse failures; extraction always returns a
/// result, possibly partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document_id: String,
    pub studies: Vec<ExtractedStudy>,
    pub lots: Vec<ExtractedLot>,
    pub conditions: Vec<ExtractedCondition>,
    pub timepoints: Vec<ExtractedTimepoint>,
    pub attributes: Vec<ExtractedAttribute>,
    pub results: Vec<ExtractedResult>,
    pub errors: Vec<String>,
}

impl ExtractionResult {
    pub fn new(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            ..Default::default()
        }
    }

    /// Total number of extracted entities, for logging.
    pub fn entity_count(&self) -> usize {
        self.studies.len()
            + self.lots.len()
            + self.conditions.len()
            + self.timepoints.len()
            + self.attributes.len()
            + self.results.len()
    }
}

/// Fresh v4 id for a newly created entity.
pub fn new_entity_id() -> Uuid {
    Uuid::new_v4()
}
