use super::aggregate_json;
use crate::*;
use serde_json::json;

fn marker(lat: f64, name: &str, rows: &[(&str, &str, f64)], color: Option<&str>) -> BarData {
    let records: Vec<_> = rows
        .iter()
        .map(|(p, s, v)| json!({ "loc": name, "lat": lat, "lng": 0.5, "pri": p, "sec": s, "val": v }))
        .collect();
    let rules: Vec<ColorRule> = color
        .map(|c| {
            vec![ColorRule::new(FilterOperation::Regex, Some(".".into()), Some(c.into())).unwrap()]
        })
        .unwrap_or_default();
    aggregate_json(json!(records), AggregationFunction::Sum, &rules)
        .remove(0)
        .data
}

#[test]
fn merge_deep_sums_values_and_aggregates() {
    let a = marker(1.0, "A", &[("food", "fruit", 10.0), ("food", "veg", 5.0)], None);
    let b = marker(2.0, "B", &[("food", "fruit", 1.0), ("drink", "tea", 2.0)], None);

    let merged = merge_bar_data([&a, &b]);
    assert_eq!(merged.id.as_deref(), Some(GROUP_ID));
    assert_eq!(
        serde_json::to_value(&merged.values).unwrap(),
        json!({ "food": { "fruit": 11.0, "veg": 5.0 }, "drink": { "tea": 2.0 } })
    );
    assert_eq!(merged.aggregated_values["food"], 16.0);
    assert_eq!(merged.aggregated_values["fruit"], 11.0);
    assert_eq!(merged.aggregated_values["tea"], 2.0);
    assert_eq!(
        merged.aggregated_location_names.iter().collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[test]
fn merge_is_order_and_grouping_independent_for_numbers() {
    let a = marker(1.0, "A", &[("x", "p", 1.0), ("y", "q", 2.0)], None);
    let b = marker(2.0, "B", &[("x", "q", 3.0)], None);
    let c = marker(3.0, "C", &[("z", "p", 4.0), ("x", "p", 8.0)], None);

    let left = merge_bar_data([&merge_bar_data([&a, &b]), &c]);
    let right = merge_bar_data([&a, &merge_bar_data([&b, &c])]);
    let shuffled = merge_bar_data([&c, &a, &b]);

    assert_eq!(left.values, right.values);
    assert_eq!(left.values, shuffled.values);
    assert_eq!(left.aggregated_values, right.aggregated_values);
    assert_eq!(left.aggregated_values, shuffled.aggregated_values);
}

#[test]
fn merge_takes_colors_from_the_first_marker_only() {
    let a = marker(1.0, "A", &[("x", "p", 1.0)], Some("red"));
    let b = marker(2.0, "B", &[("x", "p", 1.0)], Some("blue"));

    assert_eq!(
        merge_bar_data([&a, &b]).category_colors.get("x").map(String::as_str),
        Some("red")
    );
    assert_eq!(
        merge_bar_data([&b, &a]).category_colors.get("x").map(String::as_str),
        Some("blue")
    );

    let same = marker(3.0, "C", &[("x", "p", 1.0)], Some("red"));
    assert_eq!(
        merge_bar_data([&a, &same]).category_colors,
        merge_bar_data([&same, &a]).category_colors
    );
}

#[test]
fn merge_of_nothing_is_empty_group_data() {
    let merged = merge_bar_data(std::iter::empty());
    assert_eq!(merged.id.as_deref(), Some(GROUP_ID));
    assert!(merged.is_empty());
    assert!(merged.aggregated_values.is_empty());
    assert!(merged.category_colors.is_empty());
    assert!(merged.aggregated_location_names.is_empty());
}
