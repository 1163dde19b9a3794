use crate::domain::{AddressRecord, BatchReport, ReportRow, Tally};
use crate::error::CoreError;
use crate::rules::estimate_remaining;
use crate::service::{AddressValidator, Geocoder, TokenProvider};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub remaining: Option<Duration>,
}

impl BatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }
}

/// Validates every record in order, geocoding valid rows when a geocoder is
/// given. One token is acquired up front; failing to get it is the only
/// error this returns. `on_row` runs after each row completes.
pub fn run_batch<F>(
    tokens: &dyn TokenProvider,
    validator: &dyn AddressValidator,
    geocoder: Option<&dyn Geocoder>,
    records: Vec<AddressRecord>,
    mut on_row: F,
) -> Result<BatchReport, CoreError>
where
    F: FnMut(&BatchProgress, &ReportRow),
{
    let token = tokens.acquire_token()?;
    let total = records.len();
    debug!(rows = total, geocode = geocoder.is_some(), "starting batch");

    let started = Instant::now();
    let mut tally = Tally::default();
    let mut rows = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        let request = record.to_request();
        let verdict = validator.normalize(&token, &request);
        tally.record(&verdict);

        if !verdict.is_valid {
            warn!(row = index + 1, message = %verdict.message, "address rejected");
        }

        let geo = match geocoder {
            Some(geocoder) if verdict.is_valid => {
                let point = geocoder.geocode(&verdict.standardized_address);
                if point.is_none() {
                    debug!(row = index + 1, "no coordinates found");
                }
                point
            }
            _ => None,
        };

        let row = ReportRow {
            index,
            record,
            verdict,
            geo,
        };
        let processed = index + 1;
        let elapsed = started.elapsed();
        let progress = BatchProgress {
            processed,
            total,
            elapsed,
            remaining: estimate_remaining(elapsed, processed, total),
        };
        on_row(&progress, &row);
        rows.push(row);
    }

    Ok(BatchReport {
        rows,
        tally,
        geocoded: geocoder.is_some(),
    })
}
