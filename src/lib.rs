//! Stabilis: stability-document extraction for CTD Module 3 dossiers.
//!
//! Turns stability source documents (PDF, DOCX, XLSX) into normalized
//! entities (studies, lots, storage conditions, timepoints, quality
//! attributes, results) with source anchors and confidence scores, plus a
//! secondary pipeline that extracts MUST/SHOULD/MAY rules from regulatory
//! guideline PDFs. All output is best-effort candidate data intended for
//! human review.

pub mod config;
pub mod entities;
pub mod error;
pub mod formats;
pub mod guideline;
pub mod merge;
pub mod orchestrator;
pub mod parse;

pub use config::Heuristics;
pub use entities::ExtractionResult;
pub use error::ExtractionError;
pub use guideline::{AllocationPack, GuidelineExtractor};
pub use merge::merge_results;
pub use orchestrator::{DocumentInput, ExtractionOrchestrator};
