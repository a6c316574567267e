use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The increment rule applied to category aggregates for every contributing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunction {
    #[default]
    Count,
    Sum,
}

impl AggregationFunction {
    pub const ALL: [AggregationFunction; 2] = [Self::Count, Self::Sum];

    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "sum" => Ok(Self::Sum),
            _ => Err(Error::UnknownAggregation {
                name: name.to_string(),
            }),
        }
    }

    /// How much one record carrying `value` adds to a category aggregate.
    pub fn increment(self, value: f64) -> f64 {
        match self {
            Self::Count => 1.0,
            Self::Sum => value,
        }
    }
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments() {
        assert_eq!(AggregationFunction::Count.increment(42.0), 1.0);
        assert_eq!(AggregationFunction::Sum.increment(42.0), 42.0);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(
            AggregationFunction::from_name(" SUM ").unwrap(),
            AggregationFunction::Sum
        );
        let err = AggregationFunction::from_name("avg").unwrap_err().to_string();
        assert_eq!(err, "Unknown aggregation function: avg");
    }
}
