//! Writes a [`ResultSet`] to an `.xlsx` workbook.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, warn};

use crate::error::Result;
use crate::record::{CompanyRecord, ResultSet};

pub const DEFAULT_OUTPUT: &str = "company_info.xlsx";
pub const SHEET_NAME: &str = "Company Information";
pub const HEADER: [&str; 6] = [
    "Company Name",
    "Industry",
    "Size",
    "Revenue",
    "Website URL",
    "Description",
];

/// Excel refuses cells longer than this many characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// One data row, in [`HEADER`] order.
pub type SheetRow = [String; 6];

/// Cut `value` to at most [`MAX_CELL_CHARS`] characters on a char boundary.
fn clamp_cell(company: &str, column: &str, value: &str) -> String {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                company = %company,
                column = %column,
                chars = value.chars().count(),
                "Cell exceeds Excel's limit, truncating"
            );
            value[..end].to_string()
        }
        None => value.to_string(),
    }
}

fn row_for(company: &str, record: &CompanyRecord) -> SheetRow {
    let fields = [
        Some(company),
        record.industry(),
        record.size(),
        record.revenue(),
        record.website_url(),
        record.description(),
    ];
    std::array::from_fn(|i| clamp_cell(company, HEADER[i], fields[i].unwrap_or_default()))
}

/// Data rows for every company with a record, in result-set order.
///
/// Companies stored as `None` produce no row. Missing fields are empty
/// strings.
pub fn sheet_rows(results: &ResultSet) -> Vec<SheetRow> {
    results
        .iter()
        .filter_map(|(company, record)| record.as_ref().map(|r| row_for(company, r)))
        .collect()
}

/// Write the header and one row per normalized company to `path`,
/// replacing any existing file. Returns the number of data rows written.
pub fn write_workbook(results: ResultSet, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let rows = sheet_rows(&results);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row_num, col as u16, value)?;
            }
        }
    }

    workbook.save(path)?;

    info!(path = %path.display(), rows = rows.len(), "Data written to workbook");
    Ok(rows.len())
}
