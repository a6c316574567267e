use serde_json::json;
use stackbar_render::{Error, IconOptions, layout_bar_icon_json};

fn options() -> IconOptions {
    IconOptions {
        is_group: true,
        chart_size: 0,
        chart_color: None,
        show_axis_labels: false,
    }
}

#[test]
fn json_bar_data_lays_out() {
    let data = json!({
        "id": "<Group>",
        "values": { "A": { "x": 5, "y": 25 }, "B": { "x": 50 } },
        "aggregatedValues": { "A": 30, "B": 50, "x": 55, "y": 25 },
        "categoryColors": { "x": "red" },
        "aggregatedLocationNames": ["P", "Q"]
    });

    let layout = layout_bar_icon_json(&data, &options(), 2.0).unwrap();
    assert_eq!(layout.frame.bars_size, 20.0);
    assert_eq!(layout.primary_categories, vec!["B", "A"]);
    assert_eq!(layout.secondary_categories, vec!["x", "y"]);
    assert_eq!(layout.bars.len(), 3);
    assert_eq!(layout.bars[0].fill, "red");
    // no rule color and no chart color
    assert_eq!(layout.bars[2].fill, "steelblue");
    assert_eq!(layout.x_ticks.len(), 2);
}

#[test]
fn malformed_json_is_reported() {
    let err = layout_bar_icon_json(&json!({ "values": [1, 2] }), &options(), 2.0).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn negative_zoom_is_rejected() {
    let err = layout_bar_icon_json(&json!({}), &options(), -1.0).unwrap_err();
    assert!(matches!(err, Error::InvalidModel { .. }));
}
