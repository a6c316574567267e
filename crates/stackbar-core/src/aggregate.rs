//! Builds per-location aggregates from flat records.

use crate::aggregation::AggregationFunction;
use crate::color::ColorRule;
use crate::data::{RecordSource, single_number, single_string};
use crate::model::LocationAggregate;
use rustc_hash::FxHashMap;

/// Location name used when a record does not carry exactly one string name.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Dimension names the aggregator reads from each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDimensions {
    pub location_name: String,
    pub latitude: String,
    pub longitude: String,
    pub primary_category: String,
    pub secondary_category: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    dimensions: &'a RecordDimensions,
    aggregation: AggregationFunction,
    rules: &'a [ColorRule],
}

impl<'a> Aggregator<'a> {
    pub fn new(
        dimensions: &'a RecordDimensions,
        aggregation: AggregationFunction,
        rules: &'a [ColorRule],
    ) -> Self {
        Self {
            dimensions,
            aggregation,
            rules,
        }
    }

    /// Scans every record and returns one aggregate per distinct coordinate pair, in order of
    /// first appearance.
    ///
    /// Records without a usable latitude or longitude are skipped entirely. Records with
    /// coordinates but without a usable value or primary category still register their
    /// location (and its name) but contribute nothing else.
    pub fn aggregate<S: RecordSource + ?Sized>(&self, source: &S) -> Vec<LocationAggregate> {
        let dims = self.dimensions;
        let mut out: Vec<LocationAggregate> = Vec::new();
        let mut by_coord: FxHashMap<(u64, u64), usize> = FxHashMap::default();

        for index in 0..source.len() {
            let Some(lat) = single_number(&source.record_values(index, &dims.latitude)) else {
                tracing::debug!(index, "skipping record without a latitude");
                continue;
            };
            let Some(lng) = single_number(&source.record_values(index, &dims.longitude)) else {
                tracing::debug!(index, "skipping record without a longitude");
                continue;
            };

            let names = source.record_values(index, &dims.location_name);
            let location_name = single_string(&names).unwrap_or(UNKNOWN_LOCATION);

            let slot = *by_coord
                .entry((coord_key(lat), coord_key(lng)))
                .or_insert_with(|| {
                    out.push(LocationAggregate::new(lat, lng));
                    out.len() - 1
                });
            let data = &mut out[slot].data;
            data.aggregated_location_names
                .insert(location_name.to_string());

            let Some(value) = single_number(&source.record_values(index, &dims.value)) else {
                tracing::debug!(index, "record has no numeric value; location kept");
                continue;
            };
            let primaries = source.record_values(index, &dims.primary_category);
            let Some(primary) = single_string(&primaries) else {
                tracing::debug!(index, "record has no primary category; location kept");
                continue;
            };
            let secondaries = source.record_values(index, &dims.secondary_category);
            let secondary = single_string(&secondaries).unwrap_or("");

            data.record(primary, secondary, value, self.aggregation);
            data.assign_category_colors(self.rules, primary, secondary);
        }

        tracing::debug!(
            records = source.len(),
            locations = out.len(),
            aggregation = %self.aggregation,
            "aggregated records"
        );
        out
    }
}

fn coord_key(v: f64) -> u64 {
    // `0.0 == -0.0`, so both must land on the same key.
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}
