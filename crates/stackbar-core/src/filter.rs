use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A string predicate used by color rules: `matches(candidate, rule_value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperation {
    Eq,
    Neq,
    Regex,
}

impl FilterOperation {
    /// Operations in the order the rule form offers them; the first one is the default.
    pub const ALL: [FilterOperation; 3] = [Self::Regex, Self::Eq, Self::Neq];

    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Regex => "regex",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" | "equals" => Ok(Self::Eq),
            "!=" | "<>" | "neq" | "not-equals" => Ok(Self::Neq),
            "regex" | "reg" | "regex-match" => Ok(Self::Regex),
            _ => Err(Error::UnknownFilterOperation {
                name: name.to_string(),
            }),
        }
    }

    /// Evaluates the operation, compiling the pattern on every call for [`Self::Regex`].
    ///
    /// Rules should prefer [`crate::color::ColorRule`], which compiles once. An invalid pattern
    /// never matches.
    pub fn matches(self, candidate: &str, rule_value: &str) -> bool {
        match self {
            Self::Eq => candidate == rule_value,
            Self::Neq => candidate != rule_value,
            Self::Regex => Regex::new(rule_value)
                .map(|re| re.is_match(candidate))
                .unwrap_or(false),
        }
    }
}

impl Default for FilterOperation {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
