//! Query evaluation over a canonical dataset.
//!
//! [`apply`] validates a [`ConstraintSet`], filters the dataset with it,
//! and summarizes the matching records per province. It is a pure function
//! of its inputs: the dataset is only borrowed and no state survives the
//! call, so repeated queries with equal inputs produce equal results.

use log::debug;
use serde::Serialize;

use crate::{
    constraints::ConstraintSet,
    dataset::{CaseDataset, CaseRecord},
    error::EngineResult,
    options::{FilterOptions, filter_options},
    summary::Summary,
};

/// Outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub constraints: ConstraintSet,
    pub options: FilterOptions,
    pub summary: Summary,
}

impl QueryResult {
    pub fn total(&self) -> usize {
        self.summary.total()
    }

    /// No record matched. A normal outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    pub fn title(&self) -> String {
        format!(
            "{} Cases in {}",
            self.constraints.status,
            self.constraints.region.label()
        )
    }

    pub fn headline(&self) -> String {
        format!(
            "Total {} Cases: {}",
            self.constraints.status,
            self.total()
        )
    }
}

/// Records passing `constraints`, in dataset order. No validation.
pub fn filtered_records<'a>(
    dataset: &'a CaseDataset,
    constraints: &'a ConstraintSet,
) -> impl Iterator<Item = &'a CaseRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |record| constraints.matches(record))
}

pub fn apply(dataset: &CaseDataset, constraints: &ConstraintSet) -> EngineResult<QueryResult> {
    constraints.validate(dataset)?;
    debug!(
        "Applying constraints status={} region={} province={} dates={}",
        constraints.status, constraints.region, constraints.province, constraints.date_range
    );
    let summary = Summary::from_records(filtered_records(dataset, constraints));
    debug!(
        "Matched {} record(s) across {} province(s)",
        summary.total(),
        summary.entries().len()
    );
    Ok(QueryResult {
        constraints: constraints.clone(),
        options: filter_options(dataset, &constraints.region),
        summary,
    })
}
