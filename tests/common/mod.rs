#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use case_explorer::{
    RawRecord,
    constraints::{ConstraintSet, DateRange, ProvinceFilter, RegionFilter},
    dataset::CaseDataset,
    normalize,
};
use chrono::NaiveDate;
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The three-record dataset used by the reference scenarios.
pub fn scenario_dataset() -> CaseDataset {
    normalize(vec![
        RawRecord::new("NCR", "Manila", "Confirmed", "2021-01-01"),
        RawRecord::new("NCR", "Manila", "Died", "2021-01-02"),
        RawRecord::new("NCR", "Quezon City", "Confirmed", "2021-01-03"),
    ])
}

pub fn constraints(
    status: &str,
    region: &str,
    province: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> ConstraintSet {
    ConstraintSet {
        status: status.to_string(),
        region: RegionFilter::from_label(region),
        province: ProvinceFilter::from_label(province),
        date_range: DateRange::new(start, end),
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
