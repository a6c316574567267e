//! Per-location bar-chart data.
//!
//! Category keys are arbitrary strings. Every mapping here is an [`IndexMap`] so iteration order
//! is insertion order, which keeps layout sorting stable and popup columns deterministic.

use crate::aggregation::AggregationFunction;
use crate::color::{ColorRule, first_match};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// `secondaryCategory -> value` for one primary category.
pub type SecondaryValues = IndexMap<String, f64>;

/// `primaryCategory -> secondaryCategory -> value`.
pub type ValueTable = IndexMap<String, SecondaryValues>;

/// The data behind one chart: a single location or a merged cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 2D table of values.
    #[serde(default)]
    pub values: ValueTable,
    /// Aggregates keyed by category name, primary and secondary alike.
    #[serde(default)]
    pub aggregated_values: IndexMap<String, f64>,
    /// Colors keyed by category name. Secondary colors take precedence when a cell is drawn.
    #[serde(default)]
    pub category_colors: IndexMap<String, String>,
    #[serde(default)]
    pub aggregated_location_names: IndexSet<String>,
}

impl BarData {
    pub fn is_empty(&self) -> bool {
        self.values.values().all(IndexMap::is_empty)
    }

    pub fn value(&self, primary: &str, secondary: &str) -> Option<f64> {
        self.values.get(primary)?.get(secondary).copied()
    }

    /// Stores one record's contribution.
    ///
    /// The cell value is overwritten (last write wins) while both category aggregates are
    /// incremented according to `aggregation`.
    pub fn record(
        &mut self,
        primary: &str,
        secondary: &str,
        value: f64,
        aggregation: AggregationFunction,
    ) {
        self.values
            .entry(primary.to_string())
            .or_default()
            .insert(secondary.to_string(), value);

        let increment = aggregation.increment(value);
        *self
            .aggregated_values
            .entry(primary.to_string())
            .or_insert(0.0) += increment;
        *self
            .aggregated_values
            .entry(secondary.to_string())
            .or_insert(0.0) += increment;
    }

    /// Colors the primary and the secondary category independently, each by its first
    /// matching rule. Categories no rule matches keep whatever color they already have.
    pub fn assign_category_colors(&mut self, rules: &[ColorRule], primary: &str, secondary: &str) {
        for category in [primary, secondary] {
            if let Some(color) = first_match(rules, category) {
                tracing::trace!(category, color, "category color rule matched");
                self.category_colors
                    .insert(category.to_string(), color.to_string());
            }
        }
    }

    /// Color of a `(primary, secondary)` cell: secondary first, then primary.
    pub fn cell_color(&self, primary: &str, secondary: &str) -> Option<&str> {
        self.category_colors
            .get(secondary)
            .or_else(|| self.category_colors.get(primary))
            .map(String::as_str)
    }

    /// Secondary categories in first-seen order across all primary categories.
    pub fn secondary_categories(&self) -> IndexSet<&str> {
        self.values
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }
}

/// Accumulated data for one exact `(lat, lng)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAggregate {
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub data: BarData,
}

impl LocationAggregate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            data: BarData::default(),
        }
    }
}
