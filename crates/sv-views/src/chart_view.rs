//! Sightings-per-year line chart aggregation
//!
//! The chart follows the family selection only. Year and radius filters are
//! not applied, so the line always shows the full history of the selected
//! families.

use std::collections::{BTreeMap, BTreeSet};
use sv_core::{ChartViewDataset, ChartViewRow, SightingRecord};

/// Sighting count for one family in one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyYearCount {
    pub family: String,
    pub year: i32,
    pub count: u64,
}

/// Count sightings per `(family, year)` for the selected families, ordered by family then year
pub fn group_counts(records: &[SightingRecord], families: &BTreeSet<String>) -> Vec<FamilyYearCount> {
    let mut groups: BTreeMap<(&str, i32), u64> = BTreeMap::new();
    for record in records.iter().filter(|r| families.contains(&r.family)) {
        *groups.entry((record.family.as_str(), record.year)).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((family, year), count)| FamilyYearCount {
            family: family.to_string(),
            year,
            count,
        })
        .collect()
}

/// Build the published chart dataset.
///
/// Groups that share a year are summed into one row: with several families
/// selected, the chart shows their combined count per year.
pub fn aggregate(records: &[SightingRecord], families: &BTreeSet<String>) -> ChartViewDataset {
    let mut per_year: BTreeMap<i32, u64> = BTreeMap::new();
    for group in group_counts(records, families) {
        *per_year.entry(group.year).or_insert(0) += group.count;
    }

    ChartViewDataset {
        rows: per_year
            .into_iter()
            .map(|(year, count)| ChartViewRow { year: year.to_string(), count })
            .collect(),
    }
}
