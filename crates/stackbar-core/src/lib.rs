#![forbid(unsafe_code)]

//! Data shaping for stacked bar-chart map markers (headless).
//!
//! - [`aggregate::Aggregator`] turns flat records into per-location category tables
//! - [`merge::merge_bar_data`] recombines marker data when markers are clustered
//! - [`config`] holds the tool configuration, its defaults and (de)serialization

pub mod aggregate;
pub mod aggregation;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod merge;
pub mod model;

pub use aggregate::{Aggregator, RecordDimensions, UNKNOWN_LOCATION};
pub use aggregation::AggregationFunction;
pub use color::{CategoryColorRuleConfig, ColorRule, DEFAULT_RULE_COLOR};
pub use config::{
    BarLayerDimensions, BarLayerSettings, BarLayerToolConfig, BarLayerToolDefaults,
    BarLayerToolDimensionsConfig, Dimension,
};
pub use data::{JsonRecords, RecordSource};
pub use error::{Error, Result};
pub use filter::FilterOperation;
pub use merge::{GROUP_ID, merge_bar_data};
pub use model::{BarData, LocationAggregate, SecondaryValues, ValueTable};

#[cfg(test)]
mod tests;
