//! Category color rules.
//!
//! A rule pairs a [`FilterOperation`] and a match value with a color. Rules are evaluated in
//! order against a category name and the first matching rule decides that category's color.

use crate::filter::FilterOperation;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Color used when a matching rule carries no color of its own.
pub const DEFAULT_RULE_COLOR: &str = "steelblue";

/// Serialized form of a color rule; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColorRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ColorRule {
    operation: FilterOperation,
    value: Option<String>,
    color: Option<String>,
    regex: Option<Regex>,
}

impl ColorRule {
    pub fn new(
        operation: FilterOperation,
        value: Option<String>,
        color: Option<String>,
    ) -> Result<Self> {
        let regex = match operation {
            FilterOperation::Regex => {
                let pattern = value.as_deref().unwrap_or("");
                Some(Regex::new(pattern).map_err(|err| Error::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                })?)
            }
            FilterOperation::Eq | FilterOperation::Neq => None,
        };
        Ok(Self {
            operation,
            value,
            color,
            regex,
        })
    }

    pub fn from_config(config: &CategoryColorRuleConfig) -> Result<Self> {
        let Some(name) = config.operation.as_deref() else {
            return Err(Error::InvalidConfig {
                message: "category color rule without an operation".to_string(),
            });
        };
        let operation = FilterOperation::from_name(name)?;
        Self::new(operation, config.value.clone(), config.color.clone())
    }

    pub fn to_config(&self) -> CategoryColorRuleConfig {
        CategoryColorRuleConfig {
            operation: Some(self.operation.name().to_string()),
            value: self.value.clone(),
            color: self.color.clone(),
        }
    }

    pub fn operation(&self) -> FilterOperation {
        self.operation
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// The color this rule assigns, falling back to [`DEFAULT_RULE_COLOR`].
    pub fn effective_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_RULE_COLOR)
    }

    pub fn matches(&self, category: &str) -> bool {
        match (&self.regex, self.operation) {
            (Some(re), _) => re.is_match(category),
            (None, op) => op.matches(category, self.value.as_deref().unwrap_or("")),
        }
    }
}

impl PartialEq for ColorRule {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.value == other.value && self.color == other.color
    }
}

/// Returns the color of the first rule matching `category`.
pub fn first_match<'a>(rules: &'a [ColorRule], category: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(category))
        .map(ColorRule::effective_color)
}

/// Builds rules from config entries, dropping (and logging) the ones that cannot be used.
pub fn rules_from_config_lenient(configs: &[CategoryColorRuleConfig]) -> Vec<ColorRule> {
    configs
        .iter()
        .filter_map(|config| match ColorRule::from_config(config) {
            Ok(rule) => Some(rule),
            Err(err) => {
                tracing::warn!(error = %err, ?config, "dropping category color rule");
                None
            }
        })
        .collect()
}
