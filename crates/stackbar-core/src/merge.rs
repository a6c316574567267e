//! Combines the data of several markers into one cluster chart.

use crate::model::BarData;

/// Id carried by merged cluster data.
pub const GROUP_ID: &str = "<Group>";

/// Deep-sums values and aggregates of every input and unions their location names.
///
/// Category colors are copied from the first input only; they are not re-evaluated against the
/// merged categories. An empty input yields empty group data.
pub fn merge_bar_data<'a, I>(items: I) -> BarData
where
    I: IntoIterator<Item = &'a BarData>,
{
    let mut merged = BarData {
        id: Some(GROUP_ID.to_string()),
        ..BarData::default()
    };

    for (i, item) in items.into_iter().enumerate() {
        for (primary, row) in &item.values {
            let merged_row = merged.values.entry(primary.clone()).or_default();
            for (secondary, value) in row {
                *merged_row.entry(secondary.clone()).or_insert(0.0) += *value;
            }
        }

        for (category, value) in &item.aggregated_values {
            *merged
                .aggregated_values
                .entry(category.clone())
                .or_insert(0.0) += *value;
        }

        merged
            .aggregated_location_names
            .extend(item.aggregated_location_names.iter().cloned());

        if i == 0 {
            merged.category_colors = item.category_colors.clone();
        }
    }

    merged
}
