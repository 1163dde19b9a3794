pub mod csv_table;
pub mod error;
pub mod map;
pub mod table;
pub mod xlsx;

pub use csv_table::write_csv;
pub use error::{Result, TableError};
pub use map::{map_geojson, write_map};
pub use table::{
    InputTable, ADDRESS_COLUMNS, COL_CITY, COL_LINE1, COL_LINE2, COL_STATE, COL_ZIP5,
    RESULT_COLUMNS,
};
pub use xlsx::write_xlsx;

use addrcheck_core::BatchReport;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Workbook extensions select `.xlsx`; anything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Self::Xlsx,
            _ => Self::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

pub fn read_table(path: &Path) -> Result<InputTable> {
    let reader = BufReader::new(File::open(path)?);
    match TableFormat::from_path(path) {
        TableFormat::Csv => InputTable::from_csv(reader),
        TableFormat::Xlsx => InputTable::from_xlsx(reader),
    }
}

pub fn write_table(path: &Path, table: &InputTable, report: &BatchReport) -> Result<()> {
    match TableFormat::from_path(path) {
        TableFormat::Csv => write_csv(BufWriter::new(File::create(path)?), table, report),
        TableFormat::Xlsx => {
            let bytes = write_xlsx(table, report)?;
            fs::write(path, bytes)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{read_table, write_table, TableFormat};
    use crate::table::fixtures::report_for;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn format_follows_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.xlsx")), TableFormat::Xlsx);
        assert_eq!(TableFormat::from_path(Path::new("a.XLSX")), TableFormat::Xlsx);
        assert_eq!(TableFormat::from_path(Path::new("a.csv")), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a")), TableFormat::Csv);
    }

    #[test]
    fn csv_input_can_be_written_as_a_workbook() {
        let temp = TempDir::new().expect("temp dir");
        let input = temp.path().join("customers.csv");
        fs::write(
            &input,
            "Adress1,Adress2,City,State,Zip5\n\
             123 Main St,,Springfield,IL,62701\n\
             1 Nowhere Rd,Unit 9,Nowhere,ZZ,\n",
        )
        .expect("write input");

        let table = read_table(&input).expect("read csv");
        let report = report_for(&table, false);
        let output = temp.path().join("customers_validated.xlsx");
        write_table(&output, &table, &report).expect("write xlsx");

        let annotated = read_table(&output).expect("read xlsx");
        assert_eq!(annotated.headers.len(), 9);
        assert_eq!(annotated.rows[0][5], "True");
        assert_eq!(annotated.rows[1][7], "Address Not Found");
        assert_eq!(annotated.records(), table.records());
    }
}
