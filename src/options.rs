//! Cascading selector options.
//!
//! The province selector depends on the region selector: only provinces
//! that actually have records under the chosen region are offered. Nothing
//! here remembers earlier selections; callers recompute on every region
//! change and use [`ProvinceOptions::reconcile`] to reset a stale choice.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    constraints::{ALL_PROVINCES, ALL_REGIONS, DateRange, ProvinceFilter, RegionFilter},
    dataset::CaseDataset,
};

/// Provinces selectable under one region choice, sorted, without the `"All"`
/// sentinel. Serialized with the sentinel, in selector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceOptions {
    pub region: RegionFilter,
    pub provinces: Vec<String>,
}

impl ProvinceOptions {
    pub fn contains(&self, province: &str) -> bool {
        self.provinces
            .binary_search_by(|candidate| candidate.as_str().cmp(province))
            .is_ok()
    }

    /// Selector entries in display order: `"All"` followed by every province.
    pub fn labels(&self) -> Vec<String> {
        std::iter::once(ALL_PROVINCES.to_string())
            .chain(self.provinces.iter().cloned())
            .collect()
    }

    /// Keeps `selection` if it is still offered, otherwise falls back to `All`.
    pub fn reconcile(&self, selection: &ProvinceFilter) -> ProvinceFilter {
        match selection {
            ProvinceFilter::Only(province) if self.contains(province) => selection.clone(),
            _ => ProvinceFilter::All,
        }
    }
}

impl Serialize for ProvinceOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProvinceOptions", 2)?;
        state.serialize_field("region", &self.region)?;
        state.serialize_field("provinces", &self.labels())?;
        state.end()
    }
}

pub fn compute_options(dataset: &CaseDataset, region: &RegionFilter) -> ProvinceOptions {
    let provinces = match region {
        RegionFilter::All => dataset.all_provinces().to_vec(),
        RegionFilter::Only(selected) => dataset
            .records()
            .iter()
            .filter(|record| &record.region == selected)
            .map(|record| record.province.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    ProvinceOptions {
        region: region.clone(),
        provinces,
    }
}

/// Every selector's choices for the current region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub regions: Vec<String>,
    pub provinces: ProvinceOptions,
    pub date_bounds: Option<DateRange>,
}

pub fn filter_options(dataset: &CaseDataset, region: &RegionFilter) -> FilterOptions {
    FilterOptions {
        statuses: dataset.all_statuses().to_vec(),
        regions: std::iter::once(ALL_REGIONS.to_string())
            .chain(dataset.all_regions().iter().cloned())
            .collect(),
        provinces: compute_options(dataset, region),
        date_bounds: dataset.date_bounds(),
    }
}
