//! Table grid recovery from plain page text.
//!
//! PDF text extraction yields a flat text layer with no table structure,
//! so grids are rebuilt from layout: a run of consecutive lines that each
//! look tabular (tab-, pipe- or multi-space-separated) is read as one
//! table, one line per row.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::TableGrid;

/// A table candidate needs at least this many consecutive tabular lines.
const MIN_TABLE_LINES: usize = 2;

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Recover table grids from a page of extracted text.
pub fn tables_from_text(text: &str) -> Vec<TableGrid> {
    let mut tables = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_tabular_line(line) {
            run.push(line.trim());
        } else {
            flush_run(&mut run, &mut tables);
        }
    }
    flush_run(&mut run, &mut tables);
    tables
}

fn flush_run(run: &mut Vec<&str>, tables: &mut Vec<TableGrid>) {
    if run.len() >= MIN_TABLE_LINES {
        tables.push(run.iter().map(|line| split_cells(line)).collect());
    }
    run.clear();
}

/// A line looks tabular if it has multiple column separators: 1+ tabs,
/// 2+ pipes, or 2+ runs of 2+ spaces between non-empty segments.
fn is_tabular_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() < 5 {
        return false;
    }
    if trimmed.contains('\t') {
        return true;
    }
    if trimmed.matches('|').count() >= 2 {
        return true;
    }
    MULTI_SPACE.find_iter(trimmed).count() >= 2
}

/// Split one tabular line into cells on its strongest separator. Tabs win
/// over pipes over space runs, so a pipe embedded in a tab-separated cell
/// does not fracture the row.
fn split_cells(line: &str) -> Vec<String> {
    let cells: Vec<String> = if line.contains('\t') {
        line.split('\t').map(|c| c.trim().to_string()).collect()
    } else if line.matches('|').count() >= 2 {
        line.trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect()
    } else {
        MULTI_SPACE
            .split(line)
            .map(|c| c.trim().to_string())
            .collect()
    };
    cells
}
