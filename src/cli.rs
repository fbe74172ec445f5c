use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    constraints::{ALL_PROVINCES, ALL_REGIONS},
    data::parse_announced_date,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore case records by status, region, province and date", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank provinces by the number of cases matching the selected filters
    Summary(SummaryArgs),
    /// List the selectable statuses, regions, provinces and date bounds
    Options(OptionsArgs),
    /// Report how many rows were loaded and dropped from a case file
    Inspect(InspectArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file with region, province, status and date_announced columns ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Case status to count (defaults to the first status in sorted order)
    #[arg(long)]
    pub status: Option<String>,
    /// Region to restrict to
    #[arg(long, default_value = ALL_REGIONS)]
    pub region: String,
    /// Province to restrict to; must have records in the selected region
    #[arg(long, default_value = ALL_PROVINCES)]
    pub province: String,
    /// First announcement date to include (defaults to the earliest in the data)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,
    /// Last announcement date to include (defaults to the latest in the data)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
    /// Maximum provinces to display (0 = all); the total always covers every match
    #[arg(long, default_value_t = 0)]
    pub top: usize,
    /// Width in characters of the longest bar
    #[arg(long = "bar-width", default_value_t = 40)]
    pub bar_width: usize,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Region whose provinces should be listed
    #[arg(long, default_value = ALL_REGIONS)]
    pub region: String,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_announced_date(value).ok_or_else(|| format!("'{value}' is not a recognised date"))
}
