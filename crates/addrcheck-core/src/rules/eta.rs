use std::time::Duration;

/// Linear extrapolation: mean time per completed row times rows left.
pub fn estimate_remaining(elapsed: Duration, processed: usize, total: usize) -> Option<Duration> {
    if processed == 0 {
        return None;
    }
    let remaining_rows = total.saturating_sub(processed);
    let per_row = elapsed.as_secs_f64() / processed as f64;
    Duration::try_from_secs_f64(per_row * remaining_rows as f64).ok()
}
