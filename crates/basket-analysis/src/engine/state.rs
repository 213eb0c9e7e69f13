//! Tracks the state of one analysis run and reports every transition.

use basket_core::events::{AnalysisErrorEvent, StateChangedEvent};
use basket_core::{AnalysisError, AnalysisEventHandler, BasketErrorCode, EngineState};

/// Owns the current [`EngineState`] of a run. Illegal transitions are
/// rejected and logged; the state is left unchanged.
pub struct StateMachine<'h> {
    current: EngineState,
    history: Vec<EngineState>,
    events: &'h dyn AnalysisEventHandler,
}

impl<'h> StateMachine<'h> {
    pub fn new(events: &'h dyn AnalysisEventHandler) -> Self {
        Self {
            current: EngineState::Idle,
            history: vec![EngineState::Idle],
            events,
        }
    }

    pub fn current(&self) -> &EngineState {
        &self.current
    }

    /// Every state visited, starting with `Idle`.
    pub fn history(&self) -> &[EngineState] {
        &self.history
    }

    pub fn events(&self) -> &'h dyn AnalysisEventHandler {
        self.events
    }

    /// Move to `next`. Returns false if the transition is illegal.
    pub fn advance(&mut self, next: EngineState) -> bool {
        if !self.current.can_transition_to(&next) {
            tracing::warn!(from = %self.current, to = %next, "illegal engine state transition");
            return false;
        }

        tracing::debug!(from = %self.current, to = %next, "engine state");
        let from = std::mem::replace(&mut self.current, next.clone());
        self.history.push(next.clone());
        self.events
            .on_state_changed(&StateChangedEvent { from, to: next });
        true
    }

    /// Move to the terminal state matching `error` and report it.
    pub fn fail(&mut self, error: &AnalysisError) {
        if self.current.is_terminal() {
            return;
        }
        let next = match error {
            AnalysisError::Cancelled { .. } => EngineState::Cancelled,
            other => EngineState::Failed {
                reason: other.to_string(),
            },
        };
        self.advance(next);
        self.events.on_analysis_error(&AnalysisErrorEvent {
            code: error.error_code(),
            message: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use basket_core::events::NoOpEventHandler;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        transitions: Mutex<Vec<(EngineState, EngineState)>>,
        errors: Mutex<Vec<&'static str>>,
    }

    impl AnalysisEventHandler for Recorder {
        fn on_state_changed(&self, event: &StateChangedEvent) {
            self.transitions
                .lock()
                .unwrap()
                .push((event.from.clone(), event.to.clone()));
        }

        fn on_analysis_error(&self, event: &AnalysisErrorEvent) {
            self.errors.lock().unwrap().push(event.code);
        }
    }

    #[test]
    fn advance_records_history_and_events() {
        let recorder = Recorder::default();
        let mut machine = StateMachine::new(&recorder);
        assert!(machine.advance(EngineState::Parsing));
        assert!(machine.advance(EngineState::Counting { level: 1 }));
        assert_eq!(machine.current(), &EngineState::Counting { level: 1 });
        assert_eq!(machine.history().len(), 3);

        let transitions = recorder.transitions.lock().unwrap();
        assert_eq!(transitions[0], (EngineState::Idle, EngineState::Parsing));
    }

    #[test]
    fn illegal_transition_leaves_state_unchanged() {
        let handler = NoOpEventHandler;
        let mut machine = StateMachine::new(&handler);
        assert!(!machine.advance(EngineState::RuleGeneration));
        assert_eq!(machine.current(), &EngineState::Idle);
        assert_eq!(machine.history(), &[EngineState::Idle]);
    }

    #[test]
    fn cancellation_maps_to_cancelled_state() {
        let recorder = Recorder::default();
        let mut machine = StateMachine::new(&recorder);
        machine.advance(EngineState::Parsing);
        machine.fail(&AnalysisError::cancelled("parsing"));
        assert_eq!(machine.current(), &EngineState::Cancelled);
        assert_eq!(recorder.errors.lock().unwrap().as_slice(), &["CANCELLED"]);
    }

    #[test]
    fn fail_after_terminal_is_ignored() {
        let handler = NoOpEventHandler;
        let mut machine = StateMachine::new(&handler);
        machine.fail(&AnalysisError::invalid_parameter("min_support", 0.0, "in (0, 1]"));
        assert!(matches!(machine.current(), EngineState::Failed { .. }));
        machine.fail(&AnalysisError::cancelled("late"));
        assert!(matches!(machine.current(), EngineState::Failed { .. }));
    }
}
