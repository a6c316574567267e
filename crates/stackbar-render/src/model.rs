use serde::{Deserialize, Serialize};

/// One stacked piece of a primary category's bar, in value units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSegment {
    pub primary_category: String,
    pub secondary_category: String,
    pub y_start: f64,
    pub y_end: f64,
}

/// Options a marker icon is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconOptions {
    pub is_group: bool,
    pub chart_size: u32,
    pub chart_color: Option<String>,
    pub show_axis_labels: bool,
}

/// Pixel frame of a bar icon: plot area plus axis legend reserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconFrame {
    pub bars_size: f64,
    pub upper_text_reserve: f64,
    pub x_axis_legend_height: f64,
    pub y_axis_legend_width: f64,
    pub x_path_width: f64,
    pub y_path_width: f64,
    pub tick_size: f64,
    pub font_size: f64,
    pub width: f64,
    pub height: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// A bar rectangle in plot-area pixels (y grows downwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub primary_category: String,
    pub secondary_category: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub label: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarIconLayout {
    pub frame: IconFrame,
    pub primary_categories: Vec<String>,
    pub secondary_categories: Vec<String>,
    pub max_primary_total: f64,
    pub segments: Vec<StackSegment>,
    pub bars: Vec<BarRect>,
    pub x_ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRow {
    pub header: String,
    pub cells: Vec<PopupCell>,
}

/// Tabular popup content of a marker or cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupTable {
    pub caption: String,
    pub column_headers: Vec<String>,
    pub rows: Vec<PopupRow>,
    pub footer: PopupRow,
}

/// A group of markers that share one icon at a given zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerGroup {
    pub lat: f64,
    pub lng: f64,
    /// Indices into the clustered marker slice, in input order.
    pub members: Vec<usize>,
}
