//! Result output settings used by front ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The `{ rules, top_items, stats }` document.
    #[default]
    Json,
    /// Two-section CSV report.
    Csv,
    /// Plain-text tables for terminals.
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown output format '{other}' (expected json, csv, table)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Table => "table",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Default: json.
    pub format: Option<OutputFormat>,
    /// Pretty-print JSON. Default: true.
    pub pretty: Option<bool>,
}

impl OutputConfig {
    pub fn effective_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn effective_pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }

    pub fn merge(&mut self, other: &OutputConfig) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.pretty.is_some() {
            self.pretty = other.pretty;
        }
    }
}
