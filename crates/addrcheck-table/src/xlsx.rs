use crate::table::{format_bool, report_grid, Cell, InputTable};
use crate::{Result, TableError};
use addrcheck_core::BatchReport;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::io::{Read, Seek};

impl InputTable {
    /// Reads the first worksheet of an `.xlsx` workbook. The first row of
    /// the used range is the header.
    pub fn from_xlsx<RS: Read + Seek>(reader: RS) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(reader)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TableError::MissingHeader)??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let headers = rows.next().ok_or(TableError::MissingHeader)?;
        Self::new(headers, rows.collect())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Bool(value) => format_bool(*value).to_string(),
        // Zip codes typed into a sheet are stored as numbers.
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            (*value as i64).to_string()
        }
        other => other.to_string(),
    }
}

/// Builds an `.xlsx` workbook with the input table and the result columns
/// appended, on a single worksheet.
pub fn write_xlsx(table: &InputTable, report: &BatchReport) -> Result<Vec<u8>> {
    let grid = report_grid(table, report)?;
    let columns = u16::try_from(grid.header.len()).map_err(|_| TableError::TooLarge)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in (0..columns).zip(&grid.header) {
        sheet.write_string(0, col, name.as_str())?;
    }
    for (idx, row) in grid.rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| TableError::TooLarge)?;
        for (col, cell) in (0..columns).zip(row) {
            match cell {
                Cell::Text(text) if !text.is_empty() => {
                    sheet.write_string(row_num, col, text.as_str())?;
                }
                Cell::Bool(value) => {
                    sheet.write_boolean(row_num, col, *value)?;
                }
                Cell::Number(value) => {
                    sheet.write_number(row_num, col, *value)?;
                }
                Cell::Text(_) | Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
