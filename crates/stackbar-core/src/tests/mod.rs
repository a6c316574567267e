mod merge;

use crate::*;
use serde_json::Value;

pub(crate) fn dims() -> RecordDimensions {
    RecordDimensions {
        location_name: "loc".to_string(),
        latitude: "lat".to_string(),
        longitude: "lng".to_string(),
        primary_category: "pri".to_string(),
        secondary_category: "sec".to_string(),
        value: "val".to_string(),
    }
}

pub(crate) fn aggregate_json(
    records: Value,
    aggregation: AggregationFunction,
    rules: &[ColorRule],
) -> Vec<LocationAggregate> {
    let dims = dims();
    let source = JsonRecords::from_value(records);
    Aggregator::new(&dims, aggregation, rules).aggregate(&source)
}
