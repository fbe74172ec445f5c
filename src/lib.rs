pub mod chart;
pub mod cli;
pub mod constraints;
pub mod data;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod io_utils;
pub mod options;
pub mod summary;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs, OutputFormat},
    constraints::{ConstraintSet, DateRange, ProvinceFilter, RegionFilter},
    dataset::CaseDataset,
    table::Align,
};

pub use crate::{
    constraints::{ALL_PROVINCES, ALL_REGIONS},
    dataset::{CaseRecord, RawRecord, normalize},
    engine::{QueryResult, apply},
    error::{EngineError, LoadError},
    options::{ProvinceOptions, compute_options},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("case_explorer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Summary(args) => handle_summary(&args),
        Commands::Options(args) => handle_options(&args),
        Commands::Inspect(args) => handle_inspect(&args),
    }
}

fn load_dataset(args: &InputArgs) -> Result<CaseDataset> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Reading case records from '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    dataset::load_csv(&args.input, delimiter, encoding)
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let defaults = ConstraintSet::defaults(&dataset).ok_or_else(|| {
        anyhow!(
            "No usable case records in {:?}; every row was missing a field or date",
            args.input.input
        )
    })?;
    let constraints = ConstraintSet {
        status: args
            .status
            .as_deref()
            .map(|status| status.trim().to_string())
            .unwrap_or(defaults.status),
        region: RegionFilter::from_label(&args.region),
        province: ProvinceFilter::from_label(&args.province),
        date_range: DateRange::new(
            args.start.unwrap_or(defaults.date_range.start),
            args.end.unwrap_or(defaults.date_range.end),
        ),
    };
    debug!("Resolved constraints: {constraints:?}");

    let result = engine::apply(&dataset, &constraints)
        .with_context(|| format!("Querying {:?}", args.input.input))?;
    info!(
        "{} record(s) matched across {} province(s)",
        result.total(),
        result.summary.entries().len()
    );

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => print!("{}", render_summary(&result, args.top, args.bar_width)),
    }
    Ok(())
}

/// Text rendering of a query: title, ranked table, bar chart and headline.
pub fn render_summary(result: &QueryResult, top: usize, bar_width: usize) -> String {
    let mut output = format!("{}\n\n", result.title());
    if result.is_empty() {
        output.push_str("No data found for the selected filters.\n");
        return output;
    }
    output.push_str(&table::render_table(
        &["province", "count", "percent"],
        &result.summary.render_rows(top),
        &[Align::Left, Align::Right, Align::Right],
    ));
    output.push('\n');
    output.push_str(&chart::render_bar_chart(result.summary.top(top), bar_width));
    output.push('\n');
    output.push_str(&result.headline());
    output.push('\n');
    output
}

fn handle_options(args: &cli::OptionsArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let region = RegionFilter::from_label(&args.region);
    if let RegionFilter::Only(name) = &region
        && !dataset.has_region(name)
    {
        return Err(EngineError::UnknownRegion(name.clone()).into());
    }
    let options = options::filter_options(&dataset, &region);
    debug!(
        "{} province option(s) under {}",
        options.provinces.provinces.len(),
        region
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Table => {
            let bounds = options
                .date_bounds
                .map(|b| b.to_string())
                .unwrap_or_else(|| "(no records)".to_string());
            let rows = vec![
                vec!["status".to_string(), options.statuses.join(", ")],
                vec!["region".to_string(), options.regions.join(", ")],
                vec![
                    "province".to_string(),
                    options.provinces.labels().join(", "),
                ],
                vec!["date_announced".to_string(), bounds],
            ];
            table::print_table(&["filter", "choices"], &rows);
        }
    }
    Ok(())
}

fn handle_inspect(args: &cli::InspectArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let report = dataset.report();
    let bounds = dataset
        .date_bounds()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "(no records)".to_string());
    let rows = vec![
        vec!["rows_read".to_string(), report.rows_read.to_string()],
        vec!["rows_kept".to_string(), report.rows_kept.to_string()],
        vec!["rows_dropped".to_string(), report.rows_dropped.to_string()],
        vec!["statuses".to_string(), dataset.all_statuses().len().to_string()],
        vec!["regions".to_string(), dataset.all_regions().len().to_string()],
        vec!["provinces".to_string(), dataset.all_provinces().len().to_string()],
        vec!["date_bounds".to_string(), bounds],
    ];
    table::print_table(&["metric", "value"], &rows);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
