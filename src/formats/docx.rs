//! DOCX reader.
//!
//! A DOCX file is a zip container; everything we need lives in
//! `word/document.xml` (WordprocessingML). A single streaming pass splits
//! content into table grids (`w:tbl`/`w:tr`/`w:tc`) and the paragraph text
//! between them. The whole document is presented as one page, since OOXML
//! has no page boundaries before layout.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use crate::error::ExtractionError;
use crate::formats::FormatExtractor;
use crate::parse::{self, PageContent, TableGrid};

#[derive(Debug)]
pub struct DocxExtractor;

impl FormatExtractor for DocxExtractor {
    fn format(&self) -> &'static str {
        "DOCX"
    }

    fn extract(
        &self,
        document_id: &str,
        bytes: &[u8],
        heuristics: &Heuristics,
    ) -> ExtractionResult {
        let mut result = ExtractionResult::new(document_id);

        let (text, tables) = match read_document_xml(bytes) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(document_id, error = %e, "DOCX read failed");
                result.errors.push(e.to_string());
                return result;
            }
        };

        let pages = vec![PageContent {
            number: 1,
            text,
            tables,
        }];
        parse::parse_tables(heuristics, document_id, &pages, &mut result);
        parse::dedup_in_document(&mut result);

        tracing::info!(
            document_id,
            tables = pages[0].tables.len(),
            entities = result.entity_count(),
            "DOCX extraction complete"
        );
        result
    }
}

/// Pull paragraph text and table grids out of `word/document.xml`.
fn read_document_xml(bytes: &[u8]) -> Result<(String, Vec<TableGrid>), ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::format_read("DOCX", e))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::format_read("DOCX", e))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::format_read("DOCX", e))?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut tables: Vec<TableGrid> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();

    // Nested tables are flattened into their outer grid; they are rare in
    // submission documents and row order is preserved either way.
    let mut table_depth = 0usize;
    let mut current_table: TableGrid = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell = String::new();
    let mut paragraph = String::new();

    loop {
        match reader
            .read_event()
            .map_err(|e| ExtractionError::format_read("DOCX", e))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        current_table = Vec::new();
                    }
                }
                b"tr" if table_depth > 0 => current_row = Vec::new(),
                b"tc" if table_depth > 0 => current_cell.clear(),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 && !current_table.is_empty() {
                        tables.push(std::mem::take(&mut current_table));
                    }
                }
                b"tr" if table_depth > 0 => {
                    current_table.push(std::mem::take(&mut current_row));
                }
                b"tc" if table_depth > 0 => {
                    current_row.push(current_cell.trim().to_string());
                }
                b"p" => {
                    if table_depth > 0 {
                        // Paragraph break inside a cell becomes a space.
                        if !current_cell.is_empty() && !current_cell.ends_with(' ') {
                            current_cell.push(' ');
                        }
                    } else if !paragraph.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut paragraph));
                    } else {
                        paragraph.clear();
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::format_read("DOCX", e))?;
                if table_depth > 0 {
                    current_cell.push_str(&text);
                } else {
                    paragraph.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((paragraphs.join("\n"), tables))
}
