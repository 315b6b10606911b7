//! Where the mission engine publishes its domain events.

use std::sync::{Arc, Mutex};

use super::{DomainEvent, MissionCompletedEvent};

/// Receives events after the mutation behind them has been committed.
///
/// Delivery is best-effort: an implementation that drops or fails to forward
/// an event must not undo the award or the closure that produced it.
/// [`CompletionListeners`](super::CompletionListeners) is the production sink.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

/// Sink that records every event in memory, for assertions in tests.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Completion payloads, in emission order.
    pub fn completed(&self) -> Vec<MissionCompletedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                DomainEvent::MissionCompleted(completed) => Some(completed.clone()),
                _ => None,
            })
            .collect()
    }

    /// Competition IDs from every `CompetitionsClosed` event, flattened.
    pub fn closed_competitions(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                DomainEvent::CompetitionsClosed { competition_ids } => {
                    Some(competition_ids.clone())
                }
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}
