//! XLSX rendering of a [`Report`].

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use super::error::ExportError;
use super::report::Report;

/// Excel refuses longer sheet names.
pub const MAX_SHEET_NAME_LEN: usize = 31;
pub const MIN_COLUMN_WIDTH: usize = 10;

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Derives a valid worksheet name from a report name.
pub fn sheet_name(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    if cleaned.starts_with('\'') {
        cleaned.replace_range(..1, "_");
    }
    if cleaned.ends_with('\'') {
        cleaned.pop();
        cleaned.push('_');
    }
    if cleaned.trim().is_empty() {
        return "Sheet1".to_string();
    }
    // Reserved by Excel.
    if cleaned.eq_ignore_ascii_case("history") {
        cleaned.push('_');
    }
    cleaned
}

/// Header row followed by one row per report row, in column order.
pub fn sheet_grid(report: &Report) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(report.rows.len() + 1);
    grid.push(report.header().into_iter().map(str::to_string).collect());
    grid.extend(
        report
            .body()
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect()),
    );
    grid
}

/// Width per column: the longest of header and cells, never under
/// [`MIN_COLUMN_WIDTH`].
pub fn column_widths(grid: &[Vec<String>]) -> Vec<usize> {
    let columns = grid.first().map(Vec::len).unwrap_or(0);
    (0..columns)
        .map(|col| {
            grid.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

pub fn build_workbook(report: &Report) -> Result<Workbook, ExportError> {
    let grid = sheet_grid(report);
    let widths = column_widths(&grid);
    let header_format = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(&report.name))?;

    for (r, row) in grid.iter().enumerate() {
        let r = u32::try_from(r)
            .map_err(|_| ExportError::Render(format!("too many rows: {}", grid.len())))?;
        for (c, cell) in row.iter().enumerate() {
            let c = column_index(c)?;
            if r == 0 {
                sheet.write_string_with_format(r, c, cell, &header_format)?;
            } else {
                sheet.write_string(r, c, cell)?;
            }
        }
    }
    for (c, width) in widths.iter().enumerate() {
        sheet.set_column_width(column_index(c)?, *width as f64)?;
    }
    Ok(workbook)
}

fn column_index(c: usize) -> Result<u16, ExportError> {
    u16::try_from(c).map_err(|_| ExportError::Render(format!("too many columns: {}", c)))
}

pub fn to_xlsx_bytes(report: &Report) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx(report: &Report, path: &Path) -> Result<(), ExportError> {
    let bytes = to_xlsx_bytes(report)?;
    std::fs::write(path, bytes)?;
    tracing::info!("Wrote {} rows to {}", report.rows.len(), path.display());
    Ok(())
}
