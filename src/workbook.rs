use crate::export::{Cell, TabularDocument};
use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub const WORKBOOK_EXT: &str = "xlsx";

#[derive(Debug, Clone)]
pub struct WorkbookSummary {
    pub sheet_names: Vec<String>,
    pub rows_written: usize,
    pub bytes: usize,
}

/// Encodes every table as one worksheet, header row in bold.
pub fn encode_workbook(doc: &TabularDocument) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &doc.tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&table.name)
            .with_context(|| format!("invalid sheet name {:?}", table.name))?;

        for (col, title) in table.header.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, title, &header_format)
                .with_context(|| format!("failed to write header on {}", table.name))?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            let row_idx = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => sheet.write_string(row_idx, col, s),
                    Cell::Int(n) => sheet.write_number(row_idx, col, *n as f64),
                }
                .with_context(|| format!("failed to write row {} on {}", r + 1, table.name))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .context("failed to encode workbook")
}

pub fn write_workbook(doc: &TabularDocument, out_path: &Path) -> anyhow::Result<WorkbookSummary> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    let bytes = encode_workbook(doc)?;
    std::fs::write(out_path, &bytes)
        .with_context(|| format!("failed to write workbook {}", out_path.to_string_lossy()))?;

    Ok(WorkbookSummary {
        sheet_names: doc.tables.iter().map(|t| t.name.clone()).collect(),
        rows_written: doc.tables.iter().map(|t| t.rows.len()).sum(),
        bytes: bytes.len(),
    })
}
