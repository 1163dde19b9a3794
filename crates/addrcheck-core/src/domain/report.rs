use crate::domain::{AddressRecord, GeoPoint, ValidationVerdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub valid_count: usize,
    pub invalid_count: usize,
    pub needs_update_count: usize,
}

impl Tally {
    pub fn record(&mut self, verdict: &ValidationVerdict) {
        if verdict.is_valid {
            self.valid_count += 1;
            if verdict.needs_update {
                self.needs_update_count += 1;
            }
        } else {
            self.invalid_count += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.valid_count + self.invalid_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Zero-based position in the input table.
    pub index: usize,
    pub record: AddressRecord,
    pub verdict: ValidationVerdict,
    /// Only ever set when `verdict.is_valid`.
    pub geo: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<ReportRow>,
    pub tally: Tally,
    /// Whether geocoding ran for this batch; decides the coordinate columns.
    pub geocoded: bool,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn points(&self) -> impl Iterator<Item = (&ReportRow, GeoPoint)> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.geo.map(|point| (row, point)))
    }
}

#[cfg(test)]
mod tests {
    use super::Tally;
    use crate::domain::ValidationVerdict;

    #[test]
    fn tally_counts_needs_update_only_for_valid_rows() {
        let mut tally = Tally::default();
        let mut stale = ValidationVerdict::invalid("boom");
        stale.needs_update = true;
        tally.record(&stale);
        tally.record(&ValidationVerdict::not_found());

        assert_eq!(tally.invalid_count, 2);
        assert_eq!(tally.needs_update_count, 0);
        assert_eq!(tally.total(), 2);
    }
}
