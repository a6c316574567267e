#![forbid(unsafe_code)]

//! Headless presentation layout for stacked bar-chart markers: stack ordering, icon geometry,
//! popup tables and screen-space clustering.

pub mod cluster;
pub mod icon;
pub mod model;
pub mod popup;
pub mod stack;

pub use cluster::{ClusterOptions, cluster_points};
pub use icon::layout_bar_icon;
pub use model::{
    AxisTick, BarIconLayout, BarRect, IconFrame, IconOptions, MarkerGroup, PopupCell, PopupRow,
    PopupTable, StackSegment,
};
pub use stack::stacked_layout;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid chart model: {message}")]
    InvalidModel { message: String },
    #[error("chart model JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads [`stackbar_core::BarData`] from its JSON form and lays out its icon.
pub fn layout_bar_icon_json(
    data: &serde_json::Value,
    options: &IconOptions,
    zoom: f64,
) -> Result<BarIconLayout> {
    if !zoom.is_finite() || zoom < 0.0 {
        return Err(Error::InvalidModel {
            message: format!("zoom must be a non-negative number, got {zoom}"),
        });
    }
    let data: stackbar_core::BarData = serde_json::from_value(data.clone())?;
    Ok(layout_bar_icon(&data, options, zoom))
}
