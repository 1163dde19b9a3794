use crate::commands::{build_services, print_json, Context};
use crate::error::invalid_input;
use crate::render::{color_enabled, status_label};
use addrcheck_core::{run_batch, AddressRecord, GeoPoint, ValidationVerdict};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Primary street line
    #[arg(long)]
    pub line1: String,
    /// Secondary line (suite, unit, apartment)
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip5: Option<String>,
    /// Also look up coordinates for a valid address
    #[arg(long)]
    pub geocode: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    original: String,
    #[serde(flatten)]
    verdict: ValidationVerdict,
    location: Option<GeoPoint>,
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let record = AddressRecord::from_raw(
        &args.line1,
        args.line2.as_deref().unwrap_or(""),
        &args.city,
        &args.state,
        args.zip5.as_deref().unwrap_or(""),
    );
    if record.line1.is_empty() {
        return Err(invalid_input("--line1 cannot be empty"));
    }

    let services = build_services(ctx.config, args.geocode)?;
    let original = record.full_address();
    let report = run_batch(
        &services.usps,
        &services.usps,
        services.geocoder(),
        vec![record],
        |_, _| {},
    )
    .with_context(|| "authenticate with address validation service")?;

    let Some(row) = report.rows.into_iter().next() else {
        return Err(anyhow::anyhow!("validation produced no result"));
    };

    if ctx.json {
        return print_json(&CheckReport {
            original,
            verdict: row.verdict,
            location: row.geo,
        });
    }

    let verdict = &row.verdict;
    println!(
        "{} {}",
        status_label(verdict.status(), color_enabled()).trim_end(),
        original
    );
    if verdict.is_valid {
        println!("standardized: {}", verdict.standardized_address);
    } else {
        println!("message: {}", verdict.message);
    }
    if let Some(point) = row.geo {
        println!("location: {:.6}, {:.6}", point.latitude, point.longitude);
    }
    Ok(())
}
