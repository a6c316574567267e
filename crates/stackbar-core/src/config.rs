//! Tool configuration: the serialized document, its defaults and the typed selection.

use crate::aggregate::RecordDimensions;
use crate::aggregation::AggregationFunction;
use crate::color::{CategoryColorRuleConfig, ColorRule, rules_from_config_lenient};
use crate::filter::FilterOperation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serialized layer tool config. Absent fields fall back to [`BarLayerToolDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayerToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BarLayerToolDimensionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color_rules: Option<Vec<CategoryColorRuleConfig>>,
}

impl BarLayerToolConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayerToolDimensionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_axis_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color_op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

/// Built-in defaults of the bar layer tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarLayerToolDefaults;

impl BarLayerToolDefaults {
    pub const TYPE: &'static str = "geovisto-tool-layer-bar";
    pub const LAYER_NAME: &'static str = "Bar layer";
    pub const CHART_COLOR: &'static str = "#E32400";
    pub const CHART_SIZE: u32 = 0;
    pub const CHART_SIZE_MAX: u32 = 50;
    pub const CATEGORY_COLOR: &'static str = "#4682B4";

    pub fn layer_name(self) -> &'static str {
        Self::LAYER_NAME
    }

    pub fn dimensions(self) -> BarLayerDimensions {
        BarLayerDimensions {
            location_name: None,
            latitude: None,
            longitude: None,
            primary_category: None,
            secondary_category: None,
            value: None,
            aggregation: AggregationFunction::default(),
            chart_color: Self::CHART_COLOR.to_string(),
            chart_size: Self::CHART_SIZE,
            show_axis_labels: false,
            category_color_op: FilterOperation::default(),
            category_color_value: String::new(),
            category_color: Self::CATEGORY_COLOR.to_string(),
        }
    }
}

/// One selectable dimension of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    LocationName,
    Latitude,
    Longitude,
    PrimaryCategory,
    SecondaryCategory,
    Value,
    Aggregation,
    ChartColor,
    ChartSize,
    ShowAxisLabels,
    CategoryColorOp,
    CategoryColorValue,
    CategoryColor,
}

impl Dimension {
    pub const ALL: [Dimension; 13] = [
        Self::LocationName,
        Self::Latitude,
        Self::Longitude,
        Self::PrimaryCategory,
        Self::SecondaryCategory,
        Self::Value,
        Self::Aggregation,
        Self::ChartColor,
        Self::ChartSize,
        Self::ShowAxisLabels,
        Self::CategoryColorOp,
        Self::CategoryColorValue,
        Self::CategoryColor,
    ];

    /// Config key of the dimension (`data.<key>`).
    pub fn key(self) -> &'static str {
        match self {
            Self::LocationName => "locationName",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::PrimaryCategory => "primaryCategory",
            Self::SecondaryCategory => "secondaryCategory",
            Self::Value => "value",
            Self::Aggregation => "aggregation",
            Self::ChartColor => "chartColor",
            Self::ChartSize => "chartSize",
            Self::ShowAxisLabels => "showAxisLabels",
            Self::CategoryColorOp => "categoryColorOp",
            Self::CategoryColorValue => "categoryColorValue",
            Self::CategoryColor => "categoryColor",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| Error::InvalidConfig {
                message: format!("unknown dimension: {s}"),
            })
    }
}

/// Current dimension selection.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayerDimensions {
    pub location_name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub primary_category: Option<String>,
    pub secondary_category: Option<String>,
    pub value: Option<String>,
    pub aggregation: AggregationFunction,
    pub chart_color: String,
    pub chart_size: u32,
    pub show_axis_labels: bool,
    pub category_color_op: FilterOperation,
    pub category_color_value: String,
    pub category_color: String,
}

impl Default for BarLayerDimensions {
    fn default() -> Self {
        BarLayerToolDefaults.dimensions()
    }
}

impl BarLayerDimensions {
    /// The record dimensions, or `None` while any of them is unselected.
    pub fn record_dimensions(&self) -> Option<RecordDimensions> {
        Some(RecordDimensions {
            location_name: self.location_name.clone()?,
            latitude: self.latitude.clone()?,
            longitude: self.longitude.clone()?,
            primary_category: self.primary_category.clone()?,
            secondary_category: self.secondary_category.clone()?,
            value: self.value.clone()?,
        })
    }

    /// Sets a dimension from its textual form. An empty string clears a data dimension.
    pub fn set(&mut self, dimension: Dimension, value: &str) -> Result<()> {
        fn data_name(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        match dimension {
            Dimension::LocationName => self.location_name = data_name(value),
            Dimension::Latitude => self.latitude = data_name(value),
            Dimension::Longitude => self.longitude = data_name(value),
            Dimension::PrimaryCategory => self.primary_category = data_name(value),
            Dimension::SecondaryCategory => self.secondary_category = data_name(value),
            Dimension::Value => self.value = data_name(value),
            Dimension::Aggregation => self.aggregation = AggregationFunction::from_name(value)?,
            Dimension::ChartColor => self.chart_color = value.to_string(),
            Dimension::ChartSize => {
                let size: u32 = value.trim().parse().map_err(|_| Error::InvalidConfig {
                    message: format!("chart size is not a non-negative integer: {value}"),
                })?;
                self.chart_size = clamp_chart_size(size);
            }
            Dimension::ShowAxisLabels => {
                self.show_axis_labels = value.trim().parse().map_err(|_| Error::InvalidConfig {
                    message: format!("show axis labels is not a boolean: {value}"),
                })?;
            }
            Dimension::CategoryColorOp => {
                self.category_color_op = FilterOperation::from_name(value)?;
            }
            Dimension::CategoryColorValue => self.category_color_value = value.to_string(),
            Dimension::CategoryColor => self.category_color = value.to_string(),
        }
        Ok(())
    }

    /// Applies every present field of `config`. Fields that cannot be interpreted are logged and
    /// leave the current selection untouched.
    pub fn apply_config(&mut self, config: &BarLayerToolDimensionsConfig) {
        let data_fields = [
            (&config.location_name, &mut self.location_name),
            (&config.latitude, &mut self.latitude),
            (&config.longitude, &mut self.longitude),
            (&config.primary_category, &mut self.primary_category),
            (&config.secondary_category, &mut self.secondary_category),
            (&config.value, &mut self.value),
        ];
        for (incoming, slot) in data_fields {
            if let Some(name) = incoming.as_deref().filter(|name| !name.is_empty()) {
                *slot = Some(name.to_string());
            }
        }

        if let Some(name) = config.aggregation.as_deref() {
            match AggregationFunction::from_name(name) {
                Ok(aggregation) => self.aggregation = aggregation,
                Err(err) => tracing::warn!(error = %err, "keeping current aggregation"),
            }
        }
        if let Some(color) = config.chart_color.as_deref().filter(|c| !c.is_empty()) {
            self.chart_color = color.to_string();
        }
        if let Some(size) = config.chart_size {
            self.chart_size = clamp_chart_size(size);
        }
        if let Some(show) = config.show_axis_labels {
            self.show_axis_labels = show;
        }
        if let Some(name) = config.category_color_op.as_deref() {
            match FilterOperation::from_name(name) {
                Ok(op) => self.category_color_op = op,
                Err(err) => {
                    tracing::warn!(error = %err, "keeping current category color operation")
                }
            }
        }
        if let Some(value) = config.category_color_value.as_deref() {
            self.category_color_value = value.to_string();
        }
        if let Some(color) = config.category_color.as_deref().filter(|c| !c.is_empty()) {
            self.category_color = color.to_string();
        }
    }

    pub fn to_config(&self) -> BarLayerToolDimensionsConfig {
        BarLayerToolDimensionsConfig {
            location_name: self.location_name.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            primary_category: self.primary_category.clone(),
            secondary_category: self.secondary_category.clone(),
            value: self.value.clone(),
            aggregation: Some(self.aggregation.name().to_string()),
            chart_color: Some(self.chart_color.clone()),
            chart_size: Some(self.chart_size),
            show_axis_labels: Some(self.show_axis_labels),
            category_color_op: Some(self.category_color_op.name().to_string()),
            category_color_value: Some(self.category_color_value.clone()),
            category_color: Some(self.category_color.clone()),
        }
    }
}

fn clamp_chart_size(size: u32) -> u32 {
    size.min(BarLayerToolDefaults::CHART_SIZE_MAX)
}

/// Everything the tool persists: identity, dimension selection and color rules.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayerSettings {
    pub id: Option<String>,
    pub enabled: bool,
    pub layer_name: String,
    pub dimensions: BarLayerDimensions,
    pub category_color_rules: Vec<ColorRule>,
}

impl Default for BarLayerSettings {
    fn default() -> Self {
        let defaults = BarLayerToolDefaults;
        Self {
            id: None,
            enabled: true,
            layer_name: defaults.layer_name().to_string(),
            dimensions: defaults.dimensions(),
            category_color_rules: Vec::new(),
        }
    }
}

impl BarLayerSettings {
    pub fn from_config(config: &BarLayerToolConfig) -> Self {
        let mut settings = Self::default();
        settings.deserialize(config);
        settings
    }

    /// Applies a config over the current settings. Color rules are replaced only when the config
    /// carries a rule list; unusable rules are dropped.
    pub fn deserialize(&mut self, config: &BarLayerToolConfig) {
        if let Some(tool_type) = config.tool_type.as_deref() {
            if tool_type != BarLayerToolDefaults::TYPE {
                tracing::warn!(tool_type, "config declares a different tool type");
            }
        }
        if let Some(id) = &config.id {
            self.id = Some(id.clone());
        }
        if let Some(enabled) = config.enabled {
            self.enabled = enabled;
        }
        if let Some(name) = &config.layer_name {
            self.layer_name = name.clone();
        }
        if let Some(data) = &config.data {
            self.dimensions.apply_config(data);
        }
        if let Some(rules) = &config.category_color_rules {
            self.category_color_rules = rules_from_config_lenient(rules);
        }
    }

    pub fn serialize(&self) -> BarLayerToolConfig {
        BarLayerToolConfig {
            id: self.id.clone(),
            tool_type: Some(BarLayerToolDefaults::TYPE.to_string()),
            enabled: Some(self.enabled),
            layer_name: Some(self.layer_name.clone()),
            data: Some(self.dimensions.to_config()),
            category_color_rules: Some(
                self.category_color_rules
                    .iter()
                    .map(ColorRule::to_config)
                    .collect(),
            ),
        }
    }
}
