//! Query configuration that callers can serialize/deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What happens when a column name cannot be resolved against the naming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Unknown columns read as `null`; unknown count targets count 0.
    #[default]
    Lenient,
    /// Unknown columns and count targets are errors.
    Strict,
}

impl Resolution {
    pub fn is_strict(self) -> bool {
        self == Resolution::Strict
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Resolution::Lenient),
            "strict" => Ok(Resolution::Strict),
            other => Err(Error::Config(format!(
                "unknown resolution '{other}' (expected 'lenient' or 'strict')"
            ))),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Lenient => f.write_str("lenient"),
            Resolution::Strict => f.write_str("strict"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Policy for names missing from the active column naming.
    pub resolution: Resolution,

    /// Name the columns of an unnamed source after the projection's column
    /// references (positionally) when a query is built.
    pub infer_column_names: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Lenient,
            infer_column_names: true,
        }
    }
}

impl QueryConfig {
    pub fn strict() -> Self {
        Self {
            resolution: Resolution::Strict,
            ..Self::default()
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_inferred_column_names(mut self, enabled: bool) -> Self {
        self.infer_column_names = enabled;
        self
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RINQ_RESOLUTION`: `lenient` or `strict`
    /// - `RINQ_INFER_COLUMNS`: `true`/`false`/`1`/`0`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("RINQ_RESOLUTION") {
            if let Ok(v) = s.parse::<Resolution>() {
                cfg.resolution = v;
            }
        }

        if let Ok(s) = std::env::var("RINQ_INFER_COLUMNS") {
            if let Some(v) = parse_flag(&s) {
                cfg.infer_column_names = v;
            }
        }

        cfg
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
