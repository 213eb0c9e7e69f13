//! Fan-out dispatcher over registered handlers.

use std::sync::Arc;

use super::handler::AnalysisEventHandler;
use super::types::*;

/// Forwards every event to each registered handler, in registration order.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn AnalysisEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn AnalysisEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl AnalysisEventHandler for EventDispatcher {
    fn on_analysis_started(&self, event: &AnalysisStartedEvent) {
        for h in &self.handlers {
            h.on_analysis_started(event);
        }
    }

    fn on_state_changed(&self, event: &StateChangedEvent) {
        for h in &self.handlers {
            h.on_state_changed(event);
        }
    }

    fn on_parse_complete(&self, event: &ParseCompleteEvent) {
        for h in &self.handlers {
            h.on_parse_complete(event);
        }
    }

    fn on_level_complete(&self, event: &LevelCompleteEvent) {
        for h in &self.handlers {
            h.on_level_complete(event);
        }
    }

    fn on_analysis_complete(&self, event: &AnalysisCompleteEvent) {
        for h in &self.handlers {
            h.on_analysis_complete(event);
        }
    }

    fn on_analysis_error(&self, event: &AnalysisErrorEvent) {
        for h in &self.handlers {
            h.on_analysis_error(event);
        }
    }
}
