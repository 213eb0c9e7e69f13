//! Logging configuration consumed by `crate::tracing::init_tracing`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-friendly multi-line output.
    #[default]
    Pretty,
    /// Single-line human output.
    Compact,
    /// JSON lines.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "basket_analysis=debug".
    /// `BASKET_LOG` takes precedence at runtime. Default: "info".
    pub level: Option<String>,
    /// Default: pretty.
    pub format: Option<LogFormat>,
}

impl LogConfig {
    pub fn effective_level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn effective_format(&self) -> LogFormat {
        self.format.unwrap_or_default()
    }

    pub fn merge(&mut self, other: &LogConfig) {
        if other.level.is_some() {
            self.level = other.level.clone();
        }
        if other.format.is_some() {
            self.format = other.format;
        }
    }
}
