//! Observer surface - how collaborators hear about a session
//!
//! Delivery is synchronous, single-threaded and in emission order. Observers
//! cannot reach back into the engine from a callback.

use std::cell::RefCell;
use std::rc::Rc;

use gravity_match_core::EngineEvent;
use log::debug;

pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent);
}

impl<F> EngineObserver for F
where
    F: FnMut(&EngineEvent),
{
    fn on_event(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Collects every event; clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(EngineEvent::name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EngineObserver for EventRecorder {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Writes each event name to the `debug` log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl EngineObserver for LogObserver {
    fn on_event(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::TurnComplete(score) => {
                debug!("event turn_complete: {} points", score.final_score)
            }
            EngineEvent::GuaranteedMoveGenerated(pos) | EngineEvent::QueueExhausted(pos) => {
                debug!("event {} at {}", event.name(), pos)
            }
            _ => debug!("event {}", event.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_buffer() {
        let recorder = EventRecorder::new();
        let mut observer = recorder.clone();
        observer.on_event(&EngineEvent::GravityComplete);
        observer.on_event(&EngineEvent::NoMatchesFound);
        assert_eq!(recorder.names(), vec!["gravity_complete", "no_matches_found"]);
        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut observer = |_: &EngineEvent| seen += 1;
            observer.on_event(&EngineEvent::MaxHeatReached);
            observer.on_event(&EngineEvent::QueueRefilled);
        }
        assert_eq!(seen, 2);
    }
}
