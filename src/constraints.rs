use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::{
    data::format_date,
    dataset::{CaseDataset, CaseRecord},
    error::{EngineError, EngineResult},
    options,
};

/// Label offered to users for "no region restriction".
pub const ALL_REGIONS: &str = "All Regions";
/// Label offered to users for "no province restriction".
pub const ALL_PROVINCES: &str = "All";

/// Closed interval of announcement dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", format_date(self.start), format_date(self.end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed == ALL_REGIONS {
            RegionFilter::All
        } else {
            RegionFilter::Only(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RegionFilter::All => ALL_REGIONS,
            RegionFilter::Only(region) => region,
        }
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(selected) => selected == region,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProvinceFilter {
    #[default]
    All,
    Only(String),
}

impl ProvinceFilter {
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed == ALL_PROVINCES {
            ProvinceFilter::All
        } else {
            ProvinceFilter::Only(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProvinceFilter::All => ALL_PROVINCES,
            ProvinceFilter::Only(province) => province,
        }
    }

    pub fn matches(&self, province: &str) -> bool {
        match self {
            ProvinceFilter::All => true,
            ProvinceFilter::Only(selected) => selected == province,
        }
    }
}

macro_rules! label_display_and_serialize {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    )*};
}

label_display_and_serialize!(RegionFilter, ProvinceFilter);

/// Everything a user selected for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintSet {
    pub status: String,
    pub region: RegionFilter,
    pub province: ProvinceFilter,
    pub date_range: DateRange,
}

impl ConstraintSet {
    /// Initial selection: first status in sorted order, no region or province
    /// restriction, and the dataset's full date span. `None` when the dataset
    /// has no records to select from.
    pub fn defaults(dataset: &CaseDataset) -> Option<Self> {
        Some(Self {
            status: dataset.all_statuses().first()?.clone(),
            region: RegionFilter::All,
            province: ProvinceFilter::All,
            date_range: dataset.date_bounds()?,
        })
    }

    /// A record passes when every constraint holds. Dates are inclusive on
    /// both ends.
    pub fn matches(&self, record: &CaseRecord) -> bool {
        record.status == self.status
            && self.date_range.contains(record.date_announced)
            && self.region.matches(&record.region)
            && self.province.matches(&record.province)
    }

    /// Rejects selections that reference values outside the dataset's domains.
    ///
    /// Date ranges only need to overlap the dataset's bounds; a partially
    /// overlapping range is accepted even when it matches nothing. The range
    /// is checked first, so an empty dataset reports an out-of-bounds range.
    pub fn validate(&self, dataset: &CaseDataset) -> EngineResult<()> {
        let DateRange { start, end } = self.date_range;
        if self.date_range.is_inverted() {
            return Err(EngineError::InvertedDateRange { start, end });
        }
        match dataset.date_bounds() {
            Some(bounds) if bounds.overlaps(&self.date_range) => {}
            bounds => {
                return Err(EngineError::DateRangeOutOfBounds {
                    start,
                    end,
                    bounds: bounds
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "(no records)".to_string()),
                });
            }
        }

        if !dataset.has_status(&self.status) {
            return Err(EngineError::UnknownStatus(self.status.clone()));
        }
        if let RegionFilter::Only(region) = &self.region
            && !dataset.has_region(region)
        {
            return Err(EngineError::UnknownRegion(region.clone()));
        }
        if let ProvinceFilter::Only(province) = &self.province
            && !options::compute_options(dataset, &self.region).contains(province)
        {
            return Err(EngineError::UnknownProvince {
                province: province.clone(),
                region: self.region.label().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RawRecord, normalize};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample() -> CaseDataset {
        normalize(vec![
            RawRecord::new("NCR", "Manila", "Confirmed", "2021-01-01"),
            RawRecord::new("NCR", "Manila", "Died", "2021-01-02"),
            RawRecord::new("Region VII", "Cebu", "Recovered", "2021-01-10"),
        ])
    }

    fn constraints(status: &str, region: &str, province: &str) -> ConstraintSet {
        ConstraintSet {
            status: status.to_string(),
            region: RegionFilter::from_label(region),
            province: ProvinceFilter::from_label(province),
            date_range: DateRange::new(ymd(2021, 1, 1), ymd(2021, 1, 10)),
        }
    }

    #[test]
    fn labels_map_to_sentinels() {
        assert_eq!(RegionFilter::from_label("All Regions"), RegionFilter::All);
        assert_eq!(
            RegionFilter::from_label(" NCR "),
            RegionFilter::Only("NCR".to_string())
        );
        assert_eq!(ProvinceFilter::from_label("All"), ProvinceFilter::All);
        assert_eq!(ProvinceFilter::Only("Cebu".into()).to_string(), "Cebu");
        assert_eq!(RegionFilter::All.to_string(), ALL_REGIONS);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(ymd(2021, 1, 1), ymd(2021, 1, 3));
        assert!(range.contains(ymd(2021, 1, 1)));
        assert!(range.contains(ymd(2021, 1, 3)));
        assert!(!range.contains(ymd(2021, 1, 4)));
        assert!(!range.contains(ymd(2020, 12, 31)));
    }

    #[test]
    fn defaults_take_first_status_and_full_bounds() {
        let dataset = sample();
        let defaults = ConstraintSet::defaults(&dataset).expect("defaults");
        assert_eq!(defaults.status, "Confirmed");
        assert_eq!(defaults.region, RegionFilter::All);
        assert_eq!(defaults.province, ProvinceFilter::All);
        assert_eq!(
            defaults.date_range,
            DateRange::new(ymd(2021, 1, 1), ymd(2021, 1, 10))
        );
        assert!(ConstraintSet::defaults(&normalize(Vec::new())).is_none());
    }

    #[test]
    fn validate_rejects_unknown_values() {
        let dataset = sample();
        assert!(constraints("Died", "NCR", "Manila").validate(&dataset).is_ok());
        assert_eq!(
            constraints("Suspect", "All Regions", "All").validate(&dataset),
            Err(EngineError::UnknownStatus("Suspect".to_string()))
        );
        assert_eq!(
            constraints("Died", "CAR", "All").validate(&dataset),
            Err(EngineError::UnknownRegion("CAR".to_string()))
        );
        assert_eq!(
            constraints("Died", "NCR", "Cebu").validate(&dataset),
            Err(EngineError::UnknownProvince {
                province: "Cebu".to_string(),
                region: "NCR".to_string()
            })
        );
    }

    #[test]
    fn validate_checks_date_ranges() {
        let dataset = sample();
        let mut inverted = constraints("Died", "All Regions", "All");
        inverted.date_range = DateRange::new(ymd(2021, 1, 5), ymd(2021, 1, 4));
        assert!(matches!(
            inverted.validate(&dataset),
            Err(EngineError::InvertedDateRange { .. })
        ));

        let mut disjoint = constraints("Died", "All Regions", "All");
        disjoint.date_range = DateRange::new(ymd(2021, 2, 1), ymd(2021, 2, 28));
        assert!(matches!(
            disjoint.validate(&dataset),
            Err(EngineError::DateRangeOutOfBounds { .. })
        ));

        let empty = normalize(Vec::new());
        assert_eq!(
            constraints("Died", "All Regions", "All").validate(&empty),
            Err(EngineError::DateRangeOutOfBounds {
                start: ymd(2021, 1, 1),
                end: ymd(2021, 1, 10),
                bounds: "(no records)".to_string(),
            })
        );

        let mut partial = constraints("Died", "All Regions", "All");
        partial.date_range = DateRange::new(ymd(2020, 12, 1), ymd(2021, 1, 1));
        assert!(partial.validate(&dataset).is_ok());
    }
}
