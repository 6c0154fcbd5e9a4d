//! Format readers and the extension router.
//!
//! Each reader turns a byte stream into [`PageContent`] pages and runs the
//! shared parsers over them. Reader failures are contained: a corrupt file
//! produces a result whose `errors` list says what went wrong, never a
//! panic or a batch-fatal `Err`.

pub mod docx;
pub mod grid;
pub mod pdf;
pub mod xlsx;

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use crate::error::ExtractionError;

/// One supported document format. Implementations own the byte-level
/// reading; entity parsing is shared through `crate::parse`.
pub trait FormatExtractor: Send + Sync + std::fmt::Debug {
    /// Short format name used in log fields and error strings ("PDF").
    fn format(&self) -> &'static str;

    /// Extract entities from one document. Infallible by contract: reader
    /// errors land in `ExtractionResult::errors`.
    fn extract(&self, document_id: &str, bytes: &[u8], heuristics: &Heuristics)
        -> ExtractionResult;
}

/// Pick the extractor for a file extension (case-insensitive, leading dot
/// tolerated). The only error the router produces is an unknown extension.
pub fn route(extension: &str) -> Result<Box<dyn FormatExtractor>, ExtractionError> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "pdf" => Ok(Box::new(pdf::PdfExtractor)),
        "docx" => Ok(Box::new(docx::DocxExtractor)),
        "xlsx" => Ok(Box::new(xlsx::XlsxExtractor)),
        other => Err(ExtractionError::UnsupportedFileType {
            extension: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_extensions() {
        assert_eq!(route("pdf").unwrap().format(), "PDF");
        assert_eq!(route("docx").unwrap().format(), "DOCX");
        assert_eq!(route("xlsx").unwrap().format(), "XLSX");
    }

    #[test]
    fn extension_matching_tolerates_case_and_dot() {
        assert_eq!(route(".PDF").unwrap().format(), "PDF");
        assert_eq!(route("Xlsx").unwrap().format(), "XLSX");
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = route("doc").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: doc");
    }

    #[test]
    fn extractor_trait_is_object_safe() {
        fn assert_boxed(_: &dyn FormatExtractor) {}
        assert_boxed(&pdf::PdfExtractor);
        assert_boxed(&docx::DocxExtractor);
        assert_boxed(&xlsx::XlsxExtractor);
    }
}
