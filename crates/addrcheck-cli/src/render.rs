use addrcheck_core::{BatchProgress, BatchReport, ReportRow, Tally, VerdictStatus};
use crossterm::cursor::MoveToColumn;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

const STATUS_WIDTH: usize = 12;

pub fn color_enabled() -> bool {
    io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none()
}

/// Per-row progress on stderr. Redraws a single line on a terminal and
/// prints one line per row otherwise.
pub struct ProgressPrinter {
    enabled: bool,
    interactive: bool,
    drawn: bool,
}

impl ProgressPrinter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            interactive: io::stderr().is_terminal(),
            drawn: false,
        }
    }

    pub fn update(&mut self, progress: &BatchProgress) {
        if !self.enabled {
            return;
        }
        let line = progress_line(progress);
        let mut stderr = io::stderr().lock();
        let result = if self.interactive {
            stderr
                .queue(MoveToColumn(0))
                .and_then(|out| out.queue(Clear(ClearType::CurrentLine)))
                .and_then(|out| out.queue(Print(&line)))
                .and_then(|out| out.flush())
        } else {
            writeln!(stderr, "{line}")
        };
        // stderr write failures are ignored
        let _ = result;
        self.drawn = true;
    }

    pub fn finish(&mut self) {
        if self.enabled && self.interactive && self.drawn {
            let _ = writeln!(io::stderr());
        }
        self.drawn = false;
    }
}

pub fn progress_line(progress: &BatchProgress) -> String {
    let percent = (progress.fraction() * 100.0).round() as u32;
    let eta = progress
        .remaining
        .map(format_duration)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "validated {}/{} rows ({percent}%), about {eta} remaining",
        progress.processed, progress.total
    )
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64().round() as u64;
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn status_label(status: VerdictStatus, color: bool) -> String {
    let padded = format!("{:<width$}", status.as_str(), width = STATUS_WIDTH);
    if !color {
        return padded;
    }
    match status {
        VerdictStatus::Valid => padded.green().to_string(),
        VerdictStatus::NeedsUpdate => padded.yellow().to_string(),
        VerdictStatus::Invalid => padded.red().to_string(),
    }
}

pub fn row_line(row: &ReportRow, color: bool) -> String {
    let verdict = &row.verdict;
    let status = verdict.status();
    let detail = match status {
        VerdictStatus::Invalid => verdict.message.clone(),
        VerdictStatus::NeedsUpdate => format!(
            "{} -> {}",
            row.record.full_address(),
            verdict.standardized_address
        ),
        VerdictStatus::Valid => verdict.standardized_address.clone(),
    };
    let coords = row
        .geo
        .map(|point| format!("  ({:.6}, {:.6})", point.latitude, point.longitude))
        .unwrap_or_default();
    format!(
        "{:>5}  {}  {}{}",
        row.index + 1,
        status_label(status, color),
        single_line(&detail),
        coords
    )
}

pub fn print_rows(report: &BatchReport, color: bool) {
    for row in &report.rows {
        println!("{}", row_line(row, color));
    }
}

pub fn print_tally(tally: &Tally, color: bool) {
    let count = |value: usize, status: VerdictStatus| {
        let text = value.to_string();
        if !color || value == 0 {
            return text;
        }
        match status {
            VerdictStatus::Valid => text.green().to_string(),
            VerdictStatus::NeedsUpdate => text.yellow().to_string(),
            VerdictStatus::Invalid => text.red().to_string(),
        }
    };
    println!("rows:         {}", tally.total());
    println!("valid:        {}", count(tally.valid_count, VerdictStatus::Valid));
    println!(
        "needs update: {}",
        count(tally.needs_update_count, VerdictStatus::NeedsUpdate)
    );
    println!(
        "invalid:      {}",
        count(tally.invalid_count, VerdictStatus::Invalid)
    );
}

/// Error bodies from the service can span lines.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
