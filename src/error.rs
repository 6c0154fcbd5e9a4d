//! Error taxonomy for the extraction pipeline.
//!
//! Only two failures cross module boundaries: an extension the router does
//! not know, and a byte stream a format reader rejects. Everything else is
//! contained inside `extract()` as error strings on the result, so one bad
//! document never aborts a batch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No extractor registered for the file extension. Callers skip the
    /// document and report it; this is never batch-fatal.
    #[error("Unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    /// The byte stream is not valid for its declared format. Contained
    /// inside `extract()` as a result error string; surfaces only from
    /// low-level reader helpers.
    #[error("{format} extraction error: {message}")]
    FormatRead { format: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn format_read(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::FormatRead {
            format,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_names_extension() {
        let err = ExtractionError::UnsupportedFileType {
            extension: "txt".into(),
        };
        assert_eq!(err.to_string(), "Unsupported file type: txt");
    }

    #[test]
    fn format_read_message_matches_result_error_shape() {
        let err = ExtractionError::format_read("PDF", "bad xref table");
        assert_eq!(err.to_string(), "PDF extraction error: bad xref table");
    }
}
