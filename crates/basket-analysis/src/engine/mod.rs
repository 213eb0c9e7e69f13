//! The analysis pipeline and its run state.

pub mod pipeline;
pub mod state;
pub mod types;

pub use pipeline::{run_analysis, AnalysisEngine};
pub use state::StateMachine;
pub use types::{AnalysisResult, AnalysisStats, ItemFrequency, HIGH_CONFIDENCE_THRESHOLD};
