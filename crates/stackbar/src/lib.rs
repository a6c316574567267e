#![forbid(unsafe_code)]

//! `stackbar` draws stacked bar-chart markers on a map, headless.
//!
//! Records are aggregated per coordinate into `primary -> secondary -> value` tables, turned into
//! markers with popup tables, and merged into cluster charts when markers are grouped at low zoom.
//!
//! ```
//! use serde_json::json;
//! use stackbar::{BarLayerTool, BarLayerToolConfig, JsonRecords};
//!
//! let records = JsonRecords::from_value(json!([
//!     { "loc": "P", "lat": 1, "lng": 1, "pri": "food", "sec": "fruit", "val": 10 },
//!     { "loc": "P", "lat": 1, "lng": 1, "pri": "food", "sec": "veg", "val": 5 }
//! ]));
//! let config: BarLayerToolConfig = serde_json::from_value(json!({
//!     "data": {
//!         "locationName": "loc", "latitude": "lat", "longitude": "lng",
//!         "primaryCategory": "pri", "secondaryCategory": "sec", "value": "val",
//!         "aggregation": "sum"
//!     }
//! }))?;
//!
//! let tool = BarLayerTool::from_config(records, &config);
//! assert_eq!(tool.markers().len(), 1);
//! assert_eq!(tool.markers()[0].data().aggregated_values["food"], 15.0);
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod marker;
pub mod tool;

pub use stackbar_core::*;
pub use stackbar_render as render;

pub use marker::{BarMarker, ClusterMarker, LayerItem};
pub use tool::{BarLayerTool, BarLayerToolState, Event, RenderType};
