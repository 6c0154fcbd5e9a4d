//! XLSX reader via calamine.
//!
//! Each worksheet maps to one page carrying exactly one grid: the sheet's
//! used range. Sheet names become the page text, which is all the title
//! context a workbook offers; conditions therefore usually stay unlinked
//! for spreadsheets unless a sheet is named like a table caption.

use std::io::Cursor;

use calamine::{Reader, Xlsx};

use crate::config::Heuristics;
use crate::entities::ExtractionResult;
use crate::formats::FormatExtractor;
use crate::parse::{self, PageContent, TableGrid};

#[derive(Debug)]
pub struct XlsxExtractor;

impl FormatExtractor for XlsxExtractor {
    fn format(&self) -> &'static str {
        "XLSX"
    }

    fn extract(
        &self,
        document_id: &str,
        bytes: &[u8],
        heuristics: &Heuristics,
    ) -> ExtractionResult {
        let mut result = ExtractionResult::new(document_id);

        let mut workbook: Xlsx<_> = match Xlsx::new(Cursor::new(bytes)) {
            Ok(wb) => wb,
            Err(e) => {
                tracing::error!(document_id, error = %e, "XLSX open failed");
                result.errors.push(format!("XLSX extraction error: {e}"));
                return result;
            }
        };

        let mut pages: Vec<PageContent> = Vec::new();
        for (sheet_idx, sheet_name) in workbook.sheet_names().into_iter().enumerate() {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!(document_id, sheet = %sheet_name, error = %e, "Sheet read failed");
                    result
                        .errors
                        .push(format!("XLSX extraction error: sheet '{sheet_name}': {e}"));
                    continue;
                }
            };

            let grid: TableGrid = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
                .collect();

            pages.push(PageContent {
                number: sheet_idx as u32 + 1,
                text: sheet_name,
                tables: vec![grid],
            });
        }

        parse::parse_tables(heuristics, document_id, &pages, &mut result);
        parse::dedup_in_document(&mut result);

        tracing::info!(
            document_id,
            sheets = pages.len(),
            entities = result.entity_count(),
            "XLSX extraction complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Assemble a minimal single-sheet workbook with inline-string cells.
    fn make_test_xlsx(sheet_name: &str, rows: &[&[&str]]) -> Vec<u8> {
        let mut sheet_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (r, row) in rows.iter().enumerate() {
            sheet_xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                let col = (b'A' + c as u8) as char;
                sheet_xml.push_str(&format!(
                    r#"<c r="{col}{}" t="inlineStr"><is><t>{value}</t></is></c>"#,
                    r + 1
                ));
            }
            sheet_xml.push_str("</row>");
        }
        sheet_xml.push_str("</sheetData></worksheet>");

        let workbook_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{sheet_name}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
        );

        let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

        let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            for (name, content) in [
                ("[Content_Types].xml", content_types),
                ("_rels/.rels", root_rels),
                ("xl/workbook.xml", workbook_xml.as_str()),
                ("xl/_rels/workbook.xml.rels", workbook_rels),
                ("xl/worksheets/sheet1.xml", sheet_xml.as_str()),
            ] {
                writer.start_file(name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn summary_sheet_yields_lots() {
        let bytes = make_test_xlsx(
            "Batches",
            &[
                &["Lot number", "Intended use"],
                &["AB-123", "Clinical"],
                &["CD-456", "Registration"],
            ],
        );
        let result = XlsxExtractor.extract("doc-1", &bytes, &Heuristics::default());

        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        assert_eq!(result.lots.len(), 2);
        assert_eq!(result.lots[0].lot_number, "AB-123");
        assert_eq!(result.lots[0].confidence, 0.85);
    }

    #[test]
    fn stability_sheet_yields_results() {
        let bytes = make_test_xlsx(
            "Sheet1",
            &[
                &["Test item", "Acceptance criteria", "T0", "3M"],
                &["Assay", "95-105%", "99.1", "98.7"],
            ],
        );
        let result = XlsxExtractor.extract("doc-1", &bytes, &Heuristics::default());

        assert_eq!(result.attributes.len(), 1);
        assert_eq!(result.timepoints.len(), 2);
        assert_eq!(result.results.len(), 2);
        // Workbooks have no caption text, so results stay unlinked.
        assert!(result.conditions.is_empty());
        assert_eq!(result.results[0].condition_ref, "");
    }

    #[test]
    fn sheet_index_becomes_page_number() {
        let bytes = make_test_xlsx("Sheet1", &[&["Lot", "Use"], &["AB-123", "Clinical"]]);
        let result = XlsxExtractor.extract("doc-1", &bytes, &Heuristics::default());
        assert_eq!(result.lots[0].source_anchors[0].page_number, Some(1));
        assert_eq!(
            result.lots[0].source_anchors[0].table_ref.as_deref(),
            Some("table_1_0")
        );
    }

    #[test]
    fn corrupt_workbook_is_contained() {
        let result = XlsxExtractor.extract("doc-1", b"not a workbook", &Heuristics::default());
        assert_eq!(result.entity_count(), 0);
        assert!(result.errors[0].starts_with("XLSX extraction error:"));
    }
}
