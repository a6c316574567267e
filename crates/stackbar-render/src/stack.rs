//! Stacked-bar ordering and cumulative offsets.
//!
//! Primary categories are ordered by descending bar total and secondary categories by
//! descending total across every bar. Both sorts are stable, so equal totals keep the insertion
//! order of the value table.

use crate::model::StackSegment;
use indexmap::IndexMap;
use stackbar_core::ValueTable;

/// Sum of each primary category's secondary values, in table order.
pub fn primary_totals(values: &ValueTable) -> IndexMap<&str, f64> {
    values
        .iter()
        .map(|(primary, row)| (primary.as_str(), row.values().sum()))
        .collect()
}

/// Sum of each secondary category across all primary categories, in first-seen order.
pub fn secondary_totals(values: &ValueTable) -> IndexMap<&str, f64> {
    let mut sums: IndexMap<&str, f64> = IndexMap::new();
    for row in values.values() {
        for (secondary, value) in row {
            *sums.entry(secondary.as_str()).or_insert(0.0) += *value;
        }
    }
    sums
}

/// Keys ordered by descending total, stable on ties.
pub fn sorted_desc_totals<'a>(totals: &IndexMap<&'a str, f64>) -> Vec<&'a str> {
    let mut keys: Vec<(&str, f64)> = totals.iter().map(|(k, v)| (*k, *v)).collect();
    keys.sort_by(|a, b| b.1.total_cmp(&a.1));
    keys.into_iter().map(|(k, _)| k).collect()
}

pub fn sorted_primary_categories(values: &ValueTable) -> Vec<&str> {
    sorted_desc_totals(&primary_totals(values))
}

pub fn sorted_secondary_categories(values: &ValueTable) -> Vec<&str> {
    sorted_desc_totals(&secondary_totals(values))
}

/// Flattens the table into stack segments, primary by primary in the given orders.
///
/// Offsets restart at zero for each primary category and end at its total. Secondary
/// categories a primary category has no value for produce no segment.
pub fn stack_segments(
    values: &ValueTable,
    primaries: &[&str],
    secondaries: &[&str],
) -> Vec<StackSegment> {
    let mut out = Vec::new();
    for primary in primaries {
        let Some(row) = values.get(*primary) else {
            continue;
        };
        let mut y = 0.0;
        for secondary in secondaries {
            let Some(value) = row.get(*secondary) else {
                continue;
            };
            out.push(StackSegment {
                primary_category: primary.to_string(),
                secondary_category: secondary.to_string(),
                y_start: y,
                y_end: y + value,
            });
            y += value;
        }
    }
    out
}

/// Sorts both category axes and stacks the table in that order.
pub fn stacked_layout(values: &ValueTable) -> Vec<StackSegment> {
    let primaries = sorted_primary_categories(values);
    let secondaries = sorted_secondary_categories(values);
    stack_segments(values, &primaries, &secondaries)
}
