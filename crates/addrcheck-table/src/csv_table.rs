use crate::table::{format_bool, report_grid, Cell, InputTable};
use crate::Result;
use addrcheck_core::BatchReport;
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::borrow::Cow;
use std::io::{Read, Write};
use tracing::warn;

impl InputTable {
    /// Reads a CSV table. Cells that are not valid UTF-8 are decoded lossily
    /// and the row is kept.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let (headers, lossy) = decode_record(rdr.byte_headers()?);
        if lossy {
            warn!("header row is not valid UTF-8, undecodable bytes were replaced");
        }

        let mut rows = Vec::new();
        for (idx, record) in rdr.byte_records().enumerate() {
            let (row, lossy) = decode_record(&record?);
            if lossy {
                warn!(
                    row = idx + 1,
                    "row is not valid UTF-8, undecodable bytes were replaced"
                );
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }
}

fn decode_record(record: &ByteRecord) -> (Vec<String>, bool) {
    let mut lossy = false;
    let cells = record
        .iter()
        .map(|field| match String::from_utf8_lossy(field) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                lossy = true;
                text
            }
        })
        .collect();
    (cells, lossy)
}

/// Writes the input table with the result columns appended as CSV.
pub fn write_csv<W: Write>(writer: W, table: &InputTable, report: &BatchReport) -> Result<()> {
    let grid = report_grid(table, report)?;

    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(&grid.header)?;
    for row in &grid.rows {
        wtr.write_record(row.iter().map(cell_text))?;
    }
    wtr.flush()?;
    Ok(())
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Bool(value) => format_bool(*value).to_string(),
        Cell::Number(value) => value.to_string(),
        Cell::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::write_csv;
    use crate::table::fixtures::report_for;
    use crate::{InputTable, TableError};

    const INPUT: &str = "\u{feff}CustomerId,Adress1,Adress2,City,State,Zip5\n\
        C-1,123 Main St,,Springfield,IL,62701\n\
        C-2,1 Nowhere Rd,Unit 9,Nowhere,ZZ\n";

    #[test]
    fn reads_records_by_column_name() {
        let table = InputTable::from_csv(INPUT.as_bytes()).expect("read");
        assert_eq!(table.headers[0], "CustomerId");
        assert!(table.missing_columns().is_empty());

        let records = table.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].street(), "123 Main St");
        assert_eq!(records[0].zip5.as_deref(), Some("62701"));
        assert_eq!(records[1].street(), "Unit 9 1 Nowhere Rd");
        assert_eq!(records[1].zip5, None);
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let table = InputTable::from_csv("Adress1,State\n5 Elm St,IL\n".as_bytes()).expect("read");
        assert_eq!(table.missing_columns(), vec!["Adress2", "City", "Zip5"]);
        let records = table.records();
        assert_eq!(records[0].line1, "5 Elm St");
        assert_eq!(records[0].city, "");
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let table = InputTable::from_csv("adress1,City,State\nx,y,z\n".as_bytes()).expect("read");
        assert!(table.missing_columns().contains(&"Adress1"));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = InputTable::from_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingHeader));
    }

    #[test]
    fn latin1_bytes_do_not_reject_the_table() {
        let input: &[u8] = b"Adress1,Adress2,City,State,Zip5\n\
            1 Main St,,Springfield,IL,62701\n\
            2 Caf\xE9 Rd,,Springfield,IL,62701\n\
            3 Oak Ave,,Springfield,IL,62701\n";
        let table = InputTable::from_csv(input).expect("read");

        assert_eq!(table.rows.len(), 3);
        let records = table.records();
        assert_eq!(records[1].line1, "2 Caf\u{fffd} Rd");
        assert_eq!(records[1].city, "Springfield");
        assert_eq!(records[2].line1, "3 Oak Ave");
    }

    #[test]
    fn report_appends_result_columns_in_input_order() {
        let table = InputTable::from_csv(INPUT.as_bytes()).expect("read");
        let report = report_for(&table, true);
        let mut out = Vec::new();
        write_csv(&mut out, &table, &report).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "CustomerId,Adress1,Adress2,City,State,Zip5,IsValid,StandardizedAddress,\
             ValidationMessage,NeedsUpdate,Latitude,Longitude"
        );
        assert_eq!(
            lines[1],
            "C-1,123 Main St,,Springfield,IL,62701,True,\
             \"123 MAIN ST, SPRINGFIELD, IL 62701\",,False,39.5,-89.25"
        );
        assert_eq!(
            lines[2],
            "C-2,1 Nowhere Rd,Unit 9,Nowhere,ZZ,,False,,Address Not Found,False,,"
        );
    }

    #[test]
    fn coordinates_are_omitted_without_geocoding() {
        let table = InputTable::from_csv(INPUT.as_bytes()).expect("read");
        let report = report_for(&table, false);
        let mut out = Vec::new();
        write_csv(&mut out, &table, &report).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.lines().next().unwrap().ends_with("NeedsUpdate"));
    }

    #[test]
    fn input_latitude_is_kept_without_geocoding() {
        let input = "Adress1,City,State,Latitude\n\
            123 Main St,Springfield,IL,39.78\n\
            1 Nowhere Rd,Nowhere,ZZ,\n";
        let table = InputTable::from_csv(input.as_bytes()).expect("read");
        let report = report_for(&table, false);
        let mut out = Vec::new();
        write_csv(&mut out, &table, &report).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Adress1,City,State,Latitude,IsValid,StandardizedAddress,ValidationMessage,NeedsUpdate"
        );
        assert!(lines[1].starts_with("123 Main St,Springfield,IL,39.78,True,"));
    }

    #[test]
    fn rerun_replaces_previous_result_columns() {
        let table = InputTable::from_csv(INPUT.as_bytes()).expect("read");
        let report = report_for(&table, false);
        let mut first = Vec::new();
        write_csv(&mut first, &table, &report).expect("write");

        let annotated = InputTable::from_csv(first.as_slice()).expect("reread");
        let mut second = Vec::new();
        write_csv(&mut second, &annotated, &report).expect("write again");
        assert_eq!(first, second);
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        let table = InputTable::from_csv(INPUT.as_bytes()).expect("read");
        let mut report = report_for(&table, false);
        report.rows.pop();
        let err = write_csv(Vec::new(), &table, &report).unwrap_err();
        assert!(matches!(err, TableError::RowMismatch { table: 2, report: 1 }));
    }
}
