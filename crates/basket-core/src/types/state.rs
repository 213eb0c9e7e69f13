//! Analysis run state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The state of a single analysis run.
///
/// ```text
/// Idle → Parsing → Counting(1) → Filtering(1) → [Counting(k+1) → Filtering(k+1)]*
///      → RuleGeneration → Done
/// ```
/// Any non-terminal state may move to `Failed` or `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Parsing,
    Counting { level: usize },
    Filtering { level: usize },
    RuleGeneration,
    Done,
    Cancelled,
    Failed { reason: String },
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed { .. })
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: &EngineState) -> bool {
        use EngineState::*;

        if self.is_terminal() {
            return false;
        }
        if matches!(next, Failed { .. } | Cancelled) {
            return true;
        }
        match (self, next) {
            (Idle, Parsing) => true,
            // Pre-parsed transactions skip straight to counting.
            (Idle, Counting { level: 1 }) => true,
            (Parsing, Counting { level: 1 }) => true,
            (Counting { level: a }, Filtering { level: b }) => a == b,
            (Filtering { level: a }, Counting { level: b }) => *b == a + 1,
            (Filtering { .. }, RuleGeneration) => true,
            (RuleGeneration, Done) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Counting { .. } => "counting",
            Self::Filtering { .. } => "filtering",
            Self::RuleGeneration => "rule_generation",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counting { level } | Self::Filtering { level } => {
                write!(f, "{}(k={level})", self.name())
            }
            Self::Failed { reason } => write!(f, "failed({reason})"),
            other => f.write_str(other.name()),
        }
    }
}
