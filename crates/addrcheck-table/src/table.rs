use crate::{Result, TableError};
use addrcheck_core::{AddressRecord, BatchReport, ReportRow};

pub const COL_LINE1: &str = "Adress1";
pub const COL_LINE2: &str = "Adress2";
pub const COL_CITY: &str = "City";
pub const COL_STATE: &str = "State";
pub const COL_ZIP5: &str = "Zip5";

pub const ADDRESS_COLUMNS: [&str; 5] = [COL_LINE1, COL_LINE2, COL_CITY, COL_STATE, COL_ZIP5];

const COL_IS_VALID: &str = "IsValid";
const COL_STANDARDIZED: &str = "StandardizedAddress";
const COL_MESSAGE: &str = "ValidationMessage";
const COL_NEEDS_UPDATE: &str = "NeedsUpdate";
const COL_LATITUDE: &str = "Latitude";
const COL_LONGITUDE: &str = "Longitude";

pub const RESULT_COLUMNS: [&str; 6] = [
    COL_IS_VALID,
    COL_STANDARDIZED,
    COL_MESSAGE,
    COL_NEEDS_UPDATE,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Raw input table: header names and string cells, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InputTable {
    pub(crate) fn new(mut headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some(first) = headers.first_mut() {
            // Spreadsheet exports often start with a byte order mark.
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }
        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(TableError::MissingHeader);
        }
        Ok(Self { headers, rows })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        ADDRESS_COLUMNS
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    /// One record per row. Missing columns and short rows read as empty.
    pub fn records(&self) -> Vec<AddressRecord> {
        let [line1, line2, city, state, zip5] = ADDRESS_COLUMNS.map(|name| self.column(name));
        self.rows
            .iter()
            .map(|row| {
                let cell = |idx: Option<usize>| {
                    idx.and_then(|idx| row.get(idx))
                        .map(String::as_str)
                        .unwrap_or("")
                };
                AddressRecord::from_raw(
                    cell(line1),
                    cell(line2),
                    cell(city),
                    cell(state),
                    cell(zip5),
                )
            })
            .collect()
    }

    /// Input columns that are carried into the report. A column is dropped
    /// only when the report appends one of the same name.
    fn carried_columns(&self, appended: &[&str]) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !appended.contains(&header.as_str()))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// A typed report cell, so each writer can pick its native representation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Bool(bool),
    Number(f64),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

pub(crate) fn result_columns(report: &BatchReport) -> &'static [&'static str] {
    if report.geocoded {
        &RESULT_COLUMNS
    } else {
        &RESULT_COLUMNS[..4]
    }
}

/// The input table with the result columns appended, row for row.
pub(crate) fn report_grid(table: &InputTable, report: &BatchReport) -> Result<ReportGrid> {
    if table.rows.len() != report.rows.len() {
        return Err(TableError::RowMismatch {
            table: table.rows.len(),
            report: report.rows.len(),
        });
    }

    let appended = result_columns(report);
    let carried = table.carried_columns(appended);

    let mut header: Vec<String> = carried
        .iter()
        .map(|idx| table.headers[*idx].clone())
        .collect();
    header.extend(appended.iter().map(|name| name.to_string()));

    let rows = table
        .rows
        .iter()
        .zip(&report.rows)
        .map(|(row, result)| {
            let mut out: Vec<Cell> = carried
                .iter()
                .map(|idx| Cell::Text(row.get(*idx).cloned().unwrap_or_default()))
                .collect();
            out.extend(result_cells(result, report.geocoded));
            out
        })
        .collect();

    Ok(ReportGrid { header, rows })
}

fn result_cells(row: &ReportRow, geocoded: bool) -> Vec<Cell> {
    let verdict = &row.verdict;
    let mut cells = vec![
        Cell::Bool(verdict.is_valid),
        Cell::Text(verdict.standardized_address.clone()),
        Cell::Text(verdict.message.clone()),
        Cell::Bool(verdict.needs_update),
    ];
    if geocoded {
        match row.geo {
            Some(point) => {
                cells.push(Cell::Number(point.latitude));
                cells.push(Cell::Number(point.longitude));
            }
            None => cells.extend([Cell::Empty, Cell::Empty]),
        }
    }
    cells
}

pub(crate) fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::report_for;
    use super::{report_grid, Cell, InputTable};
    use crate::TableError;

    fn table(headers: &[&str], rows: &[&[&str]]) -> InputTable {
        InputTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .expect("table")
    }

    #[test]
    fn blank_header_row_is_rejected() {
        let err = InputTable::new(vec![" ".to_string(), String::new()], Vec::new()).unwrap_err();
        assert!(matches!(err, TableError::MissingHeader));
    }

    #[test]
    fn input_coordinates_survive_a_run_without_geocoding() {
        let input = table(
            &["Adress1", "City", "State", "Latitude", "Longitude"],
            &[
                &["123 Main St", "Springfield", "IL", "39.78", "-89.65"],
                &["1 Nowhere Rd", "Nowhere", "ZZ", "", ""],
            ],
        );
        let grid = report_grid(&input, &report_for(&input, false)).expect("grid");

        assert_eq!(
            grid.header,
            vec![
                "Adress1",
                "City",
                "State",
                "Latitude",
                "Longitude",
                "IsValid",
                "StandardizedAddress",
                "ValidationMessage",
                "NeedsUpdate",
            ]
        );
        assert_eq!(grid.rows[0][3], Cell::Text("39.78".to_string()));
        assert_eq!(grid.rows[0][4], Cell::Text("-89.65".to_string()));
    }

    #[test]
    fn geocoded_run_replaces_input_coordinates() {
        let input = table(
            &["Adress1", "Latitude", "City", "State"],
            &[
                &["123 Main St", "1.0", "Springfield", "IL"],
                &["1 Nowhere Rd", "2.0", "Nowhere", "ZZ"],
            ],
        );
        let grid = report_grid(&input, &report_for(&input, true)).expect("grid");

        assert_eq!(grid.header.iter().filter(|h| *h == "Latitude").count(), 1);
        assert_eq!(grid.header.last().map(String::as_str), Some("Longitude"));
        assert_eq!(grid.rows[0][7], Cell::Number(39.5));
        assert_eq!(grid.rows[1][7], Cell::Empty);
    }
}
