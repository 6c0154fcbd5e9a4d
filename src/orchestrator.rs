//! Batch orchestration over the format extractors.
//!
//! Batches are processed sequentially and never abort early: an
//! unsupported extension or a reader failure becomes an error entry on
//! that document's result, and the batch moves on.

use std::sync::mpsc;
use std::time::Duration;

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use crate::error::ExtractionError;
use crate::formats;
use crate::merge::merge_results;

/// One document queued for extraction.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub document_id: String,
    /// File extension as submitted, with or without a leading dot.
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Runs documents through the router and merges batch output.
pub struct ExtractionOrchestrator {
    heuristics: Heuristics,
    per_document_timeout: Option<Duration>,
}

impl Default for ExtractionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionOrchestrator {
    pub fn new() -> Self {
        Self {
            heuristics: Heuristics::default(),
            per_document_timeout: None,
        }
    }

    /// Bound the wall-clock time spent on any single document. A document
    /// that exceeds the bound yields a result holding only a timeout error;
    /// its worker thread is abandoned and left to finish in the background.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.per_document_timeout = Some(timeout);
        self
    }

    /// Extract one document. The only `Err` is an unknown extension;
    /// everything else is contained in the result's error list.
    pub fn run_single(
        &self,
        document: &DocumentInput,
    ) -> Result<ExtractionResult, ExtractionError> {
        let extractor = formats::route(&document.extension)?;
        tracing::info!(
            document_id = %document.document_id,
            format = extractor.format(),
            size_bytes = document.bytes.len(),
            "Extracting document"
        );
        Ok(extractor.extract(&document.document_id, &document.bytes, &self.heuristics))
    }

    /// Extract a batch sequentially, one result per input document in
    /// order. Unsupported documents produce an error-only result instead
    /// of being dropped, so batch output stays aligned with batch input.
    pub fn run_batch(&self, documents: Vec<DocumentInput>) -> Vec<ExtractionResult> {
        documents
            .into_iter()
            .map(|document| match formats::route(&document.extension) {
                Ok(extractor) => match self.per_document_timeout {
                    Some(timeout) => self.extract_with_timeout(extractor, document, timeout),
                    None => {
                        extractor.extract(&document.document_id, &document.bytes, &self.heuristics)
                    }
                },
                Err(e) => {
                    tracing::warn!(document_id = %document.document_id, error = %e, "Skipping document");
                    let mut result = ExtractionResult::new(&document.document_id);
                    result.errors.push(e.to_string());
                    result
                }
            })
            .collect()
    }

    /// Extract a batch and merge it into a single deduplicated result.
    pub fn run_and_merge(&self, documents: Vec<DocumentInput>) -> ExtractionResult {
        merge_results(self.run_batch(documents))
    }

    fn extract_with_timeout(
        &self,
        extractor: Box<dyn formats::FormatExtractor>,
        document: DocumentInput,
        timeout: Duration,
    ) -> ExtractionResult {
        let document_id = document.document_id.clone();
        let heuristics = self.heuristics.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let result = extractor.extract(&document.document_id, &document.bytes, &heuristics);
            // Receiver may be gone if we timed out; nothing to do then.
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(%document_id, timeout_secs = timeout.as_secs(), "Extraction timed out");
                let mut result = ExtractionResult::new(&document_id);
                result.errors.push(format!(
                    "Extraction timed out after {}s",
                    timeout.as_secs()
                ));
                result
            }
        }
    }
}
