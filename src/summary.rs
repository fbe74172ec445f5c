use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::CaseRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub province: String,
    pub count: usize,
}

/// Per-province case counts ranked by count descending, then province name
/// ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    entries: Vec<SummaryEntry>,
    total: usize,
}

impl Summary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CaseRecord>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total = 0usize;
        for record in records {
            *counts.entry(record.province.as_str()).or_insert(0) += 1;
            total += 1;
        }
        let mut entries = counts
            .into_iter()
            .map(|(province, count)| SummaryEntry {
                province: province.to_string(),
                count,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.province.cmp(&b.province))
        });
        Self { entries, total }
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    /// Number of records summarized; always the sum of every entry's count.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Leading `top` entries, or all of them when `top` is 0.
    pub fn top(&self, top: usize) -> &[SummaryEntry] {
        if top > 0 && self.entries.len() > top {
            &self.entries[..top]
        } else {
            &self.entries
        }
    }

    /// Percentage of the total held by `entry`.
    pub fn share(&self, entry: &SummaryEntry) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (entry.count as f64 / self.total as f64) * 100.0
    }

    /// Rows of `province, count, percent` for tabular rendering.
    pub fn render_rows(&self, top: usize) -> Vec<Vec<String>> {
        self.top(top)
            .iter()
            .map(|entry| {
                vec![
                    entry.province.clone(),
                    entry.count.to_string(),
                    format!("{:.2}%", self.share(entry)),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(province: &str) -> CaseRecord {
        CaseRecord {
            region: "NCR".to_string(),
            province: province.to_string(),
            status: "Confirmed".to_string(),
            date_announced: NaiveDate::from_ymd_opt(2021, 1, 1).expect("date"),
        }
    }

    #[test]
    fn ranks_by_count_then_name() {
        let records = ["Pasig", "Manila", "Taguig", "Manila", "Pasig", "Cebu"]
            .into_iter()
            .map(record)
            .collect::<Vec<_>>();
        let summary = Summary::from_records(&records);
        let ranked = summary
            .entries()
            .iter()
            .map(|e| (e.province.as_str(), e.count))
            .collect::<Vec<_>>();
        assert_eq!(
            ranked,
            vec![("Manila", 2), ("Pasig", 2), ("Cebu", 1), ("Taguig", 1)]
        );
        assert_eq!(summary.total(), 6);
    }

    #[test]
    fn top_truncates_and_zero_keeps_all() {
        let records = ["A", "B", "B", "C"].into_iter().map(record).collect::<Vec<_>>();
        let summary = Summary::from_records(&records);
        assert_eq!(summary.top(1).len(), 1);
        assert_eq!(summary.top(1)[0].province, "B");
        assert_eq!(summary.top(0).len(), 3);
        assert_eq!(summary.top(10).len(), 3);
    }

    #[test]
    fn renders_share_percentages() {
        let records = ["A", "B", "B", "B"].into_iter().map(record).collect::<Vec<_>>();
        let rows = Summary::from_records(&records).render_rows(0);
        assert_eq!(rows[0], vec!["B", "3", "75.00%"]);
        assert_eq!(rows[1], vec!["A", "1", "25.00%"]);
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = Summary::from_records(std::iter::empty());
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
        assert!(summary.render_rows(0).is_empty());
    }
}
