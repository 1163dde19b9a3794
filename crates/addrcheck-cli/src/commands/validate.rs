use crate::commands::{build_services, print_json, Context};
use crate::error::not_found;
use crate::render::{color_enabled, print_rows, print_tally, ProgressPrinter};
use addrcheck_core::{run_batch, Tally};
use addrcheck_table::{read_table, write_map, write_table, TableFormat};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// .xlsx or CSV file with Adress1, Adress2, City, State and Zip5 columns
    pub input: PathBuf,
    /// Annotated output file; .xlsx writes a workbook, anything else CSV
    /// (defaults to <input>_validated with the input's format)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Write geocoded rows as a GeoJSON point map
    #[arg(long)]
    pub map: Option<PathBuf>,
    /// Skip coordinate lookup
    #[arg(long)]
    pub no_geocode: bool,
}

#[derive(Debug, Serialize)]
struct ValidateReport {
    input: String,
    output: String,
    map: Option<String>,
    rows: usize,
    #[serde(flatten)]
    tally: Tally,
    geocoded: bool,
    map_points: usize,
    missing_columns: Vec<&'static str>,
}

pub fn validate(ctx: &Context<'_>, args: ValidateArgs) -> Result<()> {
    if !args.input.is_file() {
        return Err(not_found(format!("input file {}", args.input.display())));
    }

    let geocode = ctx.config.geocoding.enabled && !args.no_geocode;
    let services = build_services(ctx.config, geocode)?;

    let table = read_table(&args.input)
        .with_context(|| format!("read input table {}", args.input.display()))?;
    let missing_columns = table.missing_columns();
    for column in &missing_columns {
        warn!(column, "input has no such column, treating it as empty");
    }

    let records = table.records();
    info!(rows = records.len(), geocode, "validating table");
    let mut progress = ProgressPrinter::new(!ctx.json);
    let report = run_batch(
        &services.usps,
        &services.usps,
        services.geocoder(),
        records,
        |step, _| progress.update(step),
    )
    .with_context(|| "authenticate with address validation service")?;
    progress.finish();

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    create_parent_dir(&out)?;
    write_table(&out, &table, &report)
        .with_context(|| format!("write output file {}", out.display()))?;

    let mut map_points = 0;
    if let Some(path) = args.map.as_deref() {
        create_parent_dir(path)?;
        let writer = BufWriter::new(
            File::create(path).with_context(|| format!("create map file {}", path.display()))?,
        );
        map_points = write_map(writer, &report)
            .with_context(|| format!("write map file {}", path.display()))?;
    }

    if ctx.json {
        return print_json(&ValidateReport {
            input: args.input.display().to_string(),
            output: out.display().to_string(),
            map: args.map.as_ref().map(|path| path.display().to_string()),
            rows: report.total(),
            tally: report.tally,
            geocoded: report.geocoded,
            map_points: report.points().count(),
            missing_columns,
        });
    }

    let color = color_enabled();
    print_rows(&report, color);
    println!();
    print_tally(&report.tally, color);
    if report.geocoded {
        println!("geocoded:     {}", report.points().count());
    }
    println!("Wrote {} rows to {}", report.total(), out.display());
    if let Some(path) = args.map.as_deref() {
        println!("Wrote {} map points to {}", map_points, path.display());
    }
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "addresses".to_string());
    let extension = TableFormat::from_path(input).extension();
    input.with_file_name(format!("{stem}_validated.{extension}"))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}
