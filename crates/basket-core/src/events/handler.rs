//! Event handler trait. Every method defaults to a no-op so handlers only
//! override what they care about.

use super::types::*;

pub trait AnalysisEventHandler: Send + Sync {
    fn on_analysis_started(&self, _event: &AnalysisStartedEvent) {}

    fn on_state_changed(&self, _event: &StateChangedEvent) {}

    fn on_parse_complete(&self, _event: &ParseCompleteEvent) {}

    fn on_level_complete(&self, _event: &LevelCompleteEvent) {}

    fn on_analysis_complete(&self, _event: &AnalysisCompleteEvent) {}

    fn on_analysis_error(&self, _event: &AnalysisErrorEvent) {}
}

/// Handler that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventHandler;

impl AnalysisEventHandler for NoOpEventHandler {}
