use serde_json::{Value, json};
use stackbar::*;

fn records() -> JsonRecords {
    JsonRecords::from_value(json!([
        { "city": "Brno", "lat": 49.19, "lng": 16.61, "kind": "food", "sub": "fruit", "amount": 10 },
        { "city": "Brno", "lat": 49.19, "lng": 16.61, "kind": "food", "sub": "veg", "amount": 5 },
        { "city": "Vienna", "lat": 48.21, "lng": 16.37, "kind": "food", "sub": "fruit", "amount": 3 },
        { "city": "Vienna", "lat": 48.21, "lng": 16.37, "kind": "drink", "sub": "tea", "amount": 7 },
        { "city": "New York", "lat": 40.71, "lng": -74.0, "kind": "drink", "sub": "tea", "amount": 1 },
        { "city": "Nowhere", "lng": 1.0, "kind": "drink", "sub": "tea", "amount": 100 }
    ]))
}

fn config(extra: Value) -> BarLayerToolConfig {
    let mut value = json!({
        "data": {
            "locationName": "city",
            "latitude": "lat",
            "longitude": "lng",
            "primaryCategory": "kind",
            "secondaryCategory": "sub",
            "value": "amount",
            "aggregation": "sum"
        },
        "categoryColorRules": [
            { "operation": "=", "value": "tea", "color": "#00aa00" },
            { "operation": "regex", "value": "^f", "color": "#aa0000" }
        ]
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(value).unwrap()
}

#[test]
fn initial_layer_pass_builds_one_marker_per_location() {
    let tool = BarLayerTool::from_config(records(), &config(json!({})));
    let markers = tool.markers();

    assert_eq!(markers.len(), 3);
    assert_eq!((markers[0].lat(), markers[0].lng()), (49.19, 16.61));
    assert_eq!(markers[0].data().aggregated_values["food"], 15.0);
    assert_eq!(markers[0].popup.caption, "Brno");
    assert_eq!(markers[0].icon.chart_color.as_deref(), Some("#E32400"));
    assert!(!markers[0].icon.is_group);
    assert_eq!(
        markers[1].data().category_colors.get("tea").map(String::as_str),
        Some("#00aa00")
    );
}

#[test]
fn incomplete_dimensions_leave_the_layer_empty() {
    let tool = BarLayerTool::new(records());
    assert!(tool.markers().is_empty());
    assert!(tool.state().work_data().is_empty());
}

#[test]
fn dimension_updates_pick_the_matching_render_pass() {
    let mut tool = BarLayerTool::from_config(records(), &config(json!({})));

    assert_eq!(
        tool.update_dimension(Dimension::ChartColor, "#111111").unwrap(),
        RenderType::Style
    );
    assert_eq!(tool.markers()[0].icon.chart_color.as_deref(), Some("#111111"));

    assert_eq!(
        tool.update_dimension(Dimension::Aggregation, "count").unwrap(),
        RenderType::Data
    );
    assert_eq!(tool.markers()[0].data().aggregated_values["food"], 2.0);

    assert_eq!(
        tool.update_dimension(Dimension::Latitude, "lng").unwrap(),
        RenderType::Layer
    );
    // every record now sits at (lng, lng)
    assert!(tool.markers().iter().all(|m| m.lat() == m.lng()));

    assert!(tool.update_dimension(Dimension::ChartSize, "big").is_err());
}

#[test]
fn data_change_event_reaggregates_the_new_source() {
    let mut tool = BarLayerTool::from_config(records(), &config(json!({})));
    tool.replace_source(JsonRecords::from_value(json!([
        { "city": "Oslo", "lat": 59.9, "lng": 10.7, "kind": "food", "sub": "fruit", "amount": 1 }
    ])));
    assert_eq!(tool.markers().len(), 3);

    tool.handle_event(Event::DataChanged);
    assert_eq!(tool.markers().len(), 1);
    assert_eq!(tool.markers()[0].popup.caption, "Oslo");

    tool.handle_event(Event::SelectionChanged);
    assert_eq!(tool.markers().len(), 1);
}

#[test]
fn style_passes_reuse_existing_aggregates() {
    let mut tool = BarLayerTool::from_config(records(), &config(json!({})));
    tool.replace_source(JsonRecords::from_value(json!([
        { "city": "A", "lat": 1, "lng": 1, "kind": "food", "sub": "fruit", "amount": 1 },
        { "city": "B", "lat": 2, "lng": 2, "kind": "food", "sub": "fruit", "amount": 1 }
    ])));

    tool.handle_event(Event::SelectionChanged);
    assert_eq!(tool.markers().len(), 3);
    assert_eq!(tool.markers()[0].popup.caption, "Brno");

    assert_eq!(
        tool.update_dimension(Dimension::ChartColor, "#123456").unwrap(),
        RenderType::Style
    );
    assert_eq!(tool.markers().len(), 3);
    assert_eq!(tool.markers()[0].popup.caption, "Brno");
    assert_eq!(tool.markers()[0].icon.chart_color.as_deref(), Some("#123456"));

    tool.handle_event(Event::DataChanged);
    assert_eq!(tool.markers().len(), 2);
    assert_eq!(tool.markers()[0].popup.caption, "A");
}

#[test]
fn new_color_rules_recolor_categories() {
    let mut tool = BarLayerTool::from_config(records(), &config(json!({})));
    let rule =
        ColorRule::new(FilterOperation::Neq, Some("x".into()), Some("black".into())).unwrap();
    tool.set_category_color_rules(vec![rule]);

    let colors = &tool.markers()[0].data().category_colors;
    assert_eq!(colors.get("fruit").map(String::as_str), Some("black"));
    assert_eq!(colors.get("food").map(String::as_str), Some("black"));
}

#[test]
fn disabled_tool_renders_nothing() {
    let tool = BarLayerTool::from_config(records(), &config(json!({ "enabled": false })));
    assert!(tool.markers().is_empty());
}

#[test]
fn low_zoom_clusters_nearby_markers() {
    let tool = BarLayerTool::from_config(records(), &config(json!({})));

    let items = tool.layer_items(3.0);
    assert_eq!(items.len(), 2);

    let LayerItem::Cluster(cluster) = &items[0] else {
        panic!("expected Brno and Vienna to cluster");
    };
    assert_eq!(cluster.members, vec![0, 1]);
    assert!(cluster.icon.is_group);
    assert_eq!(cluster.data.id.as_deref(), Some(GROUP_ID));
    assert_eq!(cluster.data.value("food", "fruit"), Some(13.0));
    assert_eq!(cluster.data.aggregated_values["food"], 18.0);
    assert_eq!(cluster.popup.caption, "Brno, Vienna");
    // colors come from the first member
    assert_eq!(cluster.data.category_colors, tool.markers()[0].data().category_colors);

    match &items[1] {
        LayerItem::Marker { index, marker } => {
            assert_eq!(*index, 2);
            assert_eq!(marker.popup.caption, "New York");
        }
        LayerItem::Cluster(_) => panic!("New York should stay a marker"),
    }

    assert!(tool.clusters(14.0).is_empty());
    assert_eq!(tool.clusters(3.0).len(), 1);
}

#[test]
fn cluster_icon_layout_stacks_merged_values() {
    let tool = BarLayerTool::from_config(records(), &config(json!({})));
    let cluster = tool.clusters(3.0).remove(0);
    let layout = cluster.icon_layout(3.0);

    // food: 15 + 3, drink: 7
    assert_eq!(layout.primary_categories, vec!["food", "drink"]);
    assert_eq!(layout.max_primary_total, 18.0);
    let food_end = layout
        .segments
        .iter()
        .filter(|s| s.primary_category == "food")
        .map(|s| s.y_end)
        .fold(0.0, f64::max);
    assert_eq!(food_end, 18.0);
}

#[test]
fn serialize_reflects_updates() {
    let mut tool = BarLayerTool::from_config(records(), &config(json!({ "id": "bars" })));
    tool.update_dimension(Dimension::ShowAxisLabels, "true").unwrap();

    let out = serde_json::to_value(tool.serialize()).unwrap();
    assert_eq!(out["id"], "bars");
    assert_eq!(out["data"]["showAxisLabels"], true);
    assert_eq!(out["data"]["aggregation"], "sum");
    assert_eq!(out["categoryColorRules"].as_array().map(Vec::len), Some(2));

    let mut other = BarLayerTool::new(records());
    other.deserialize(&tool.serialize());
    assert_eq!(other.markers(), tool.markers());
}
