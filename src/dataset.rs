//! Canonical case dataset: normalization of raw rows and loading from CSV.
//!
//! ```text
//!   CSV / TSV / any row source
//!          │
//!          ▼
//!     RawRecord   four optional text fields
//!          │  normalize(): trim, parse date, drop incomplete rows
//!          ▼
//!     CaseDataset  Vec<CaseRecord> + sorted domains + date bounds
//! ```
//!
//! A [`CaseDataset`] is built once and then only read. Nothing in the crate
//! takes it by `&mut`, so it can be shared freely (including across threads
//! behind an `Arc`).

use std::{collections::BTreeSet, io::Read, path::Path};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use encoding_rs::Encoding;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    constraints::DateRange,
    data::{non_blank, parse_announced_date},
    error::LoadError,
    io_utils,
};

pub const REGION_COLUMN: &str = "region";
pub const PROVINCE_COLUMN: &str = "province";
pub const STATUS_COLUMN: &str = "status";
pub const DATE_COLUMN: &str = "date_announced";

/// One row as it arrives from the data source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub region: Option<String>,
    pub province: Option<String>,
    pub status: Option<String>,
    pub date_announced: Option<String>,
}

impl RawRecord {
    pub fn new(region: &str, province: &str, status: &str, date_announced: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            province: Some(province.to_string()),
            status: Some(status.to_string()),
            date_announced: Some(date_announced.to_string()),
        }
    }
}

/// A complete, validated case record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub region: String,
    pub province: String,
    pub status: String,
    pub date_announced: NaiveDate,
}

impl CaseRecord {
    fn from_raw(raw: RawRecord) -> Option<Self> {
        Some(Self {
            region: non_blank(raw.region.as_deref())?,
            province: non_blank(raw.province.as_deref())?,
            status: non_blank(raw.status.as_deref())?,
            date_announced: parse_announced_date(raw.date_announced.as_deref()?)?,
        })
    }
}

/// Row accounting produced while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct CaseDataset {
    records: Vec<CaseRecord>,
    statuses: Vec<String>,
    regions: Vec<String>,
    provinces: Vec<String>,
    date_bounds: Option<DateRange>,
    report: NormalizeReport,
}

/// Validates raw rows into a canonical dataset. Rows missing any field or
/// carrying an unparseable date are dropped without error.
pub fn normalize<I>(raw_records: I) -> CaseDataset
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut report = NormalizeReport::default();
    let records = raw_records
        .into_iter()
        .filter_map(|raw| {
            report.rows_read += 1;
            CaseRecord::from_raw(raw)
        })
        .collect::<Vec<_>>();
    report.rows_kept = records.len();
    report.rows_dropped = report.rows_read - report.rows_kept;
    CaseDataset::from_records(records, report)
}

impl CaseDataset {
    fn from_records(records: Vec<CaseRecord>, report: NormalizeReport) -> Self {
        let statuses = sorted_distinct(records.iter().map(|r| r.status.as_str()));
        let regions = sorted_distinct(records.iter().map(|r| r.region.as_str()));
        let provinces = sorted_distinct(records.iter().map(|r| r.province.as_str()));
        let date_bounds = records
            .iter()
            .map(|r| r.date_announced)
            .minmax()
            .into_option()
            .map(|(start, end)| DateRange { start, end });
        Self {
            records,
            statuses,
            regions,
            provinces,
            date_bounds,
            report,
        }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct status values.
    pub fn all_statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Sorted distinct region values.
    pub fn all_regions(&self) -> &[String] {
        &self.regions
    }

    /// Sorted distinct province values across every region.
    pub fn all_provinces(&self) -> &[String] {
        &self.provinces
    }

    /// Earliest and latest announcement date; `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.date_bounds
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.date_bounds.map(|bounds| bounds.start)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.date_bounds.map(|bounds| bounds.end)
    }

    pub fn report(&self) -> NormalizeReport {
        self.report
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.statuses
            .binary_search_by(|candidate| candidate.as_str().cmp(status))
            .is_ok()
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions
            .binary_search_by(|candidate| candidate.as_str().cmp(region))
            .is_ok()
    }
}

fn sorted_distinct<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Column positions of the four required fields within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    region: usize,
    province: usize,
    status: usize,
    date_announced: usize,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            region: find(REGION_COLUMN)?,
            province: find(PROVINCE_COLUMN)?,
            status: find(STATUS_COLUMN)?,
            date_announced: find(DATE_COLUMN)?,
        })
    }

    fn extract(&self, record: &csv::ByteRecord, encoding: &'static Encoding) -> RawRecord {
        let field = |idx: usize| {
            record
                .get(idx)
                .and_then(|bytes| io_utils::decode_field(bytes, encoding))
        };
        RawRecord {
            region: field(self.region),
            province: field(self.province),
            status: field(self.status),
            date_announced: field(self.date_announced),
        }
    }
}

/// Reads every row from a delimited source and normalizes it. Only an
/// unreadable source or a missing required column is an error.
pub fn load_from_reader<R>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<CaseDataset, LoadError>
where
    R: Read,
{
    let mut reader = io_utils::open_csv_reader(reader, delimiter);
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let columns = ColumnMap::resolve(&headers)?;
    debug!("Resolved case columns: {columns:?}");

    let mut raw = Vec::new();
    for record in reader.byte_records() {
        raw.push(columns.extract(&record?, encoding));
    }
    Ok(normalize(raw))
}

pub fn load_csv(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<CaseDataset> {
    let input = io_utils::open_input(path)?;
    let dataset = load_from_reader(input, delimiter, encoding)
        .with_context(|| format!("Loading case records from {path:?}"))?;
    let report = dataset.report();
    if report.rows_dropped > 0 {
        warn!(
            "Dropped {} of {} row(s) from {:?} with a missing field or unparseable date",
            report.rows_dropped, report.rows_read, path
        );
    }
    info!(
        "Loaded {} case record(s) from {:?} ({} status(es), {} region(s), {} province(s))",
        dataset.len(),
        path,
        dataset.all_statuses().len(),
        dataset.all_regions().len(),
        dataset.all_provinces().len()
    );
    Ok(dataset)
}
