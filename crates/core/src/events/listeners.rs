//! In-memory fan-out of mission completions to registered callbacks.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DomainEvent, DomainEventSink, MissionCompletedEvent};
use crate::errors::{Error, Result};

/// Callback invoked once per mission completion.
pub type CompletionListener = Arc<dyn Fn(&MissionCompletedEvent) -> Result<()> + Send + Sync>;

/// Handle returned on registration, used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(u64);

/// Registry of completion listeners.
///
/// Delivery is synchronous, in registration order, on the emitting thread.
/// A listener that fails or panics is logged and skipped; the remaining
/// listeners still run.
#[derive(Default)]
pub struct CompletionListeners {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, CompletionListener)>>,
}

impl CompletionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_completion_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&MissionCompletedEvent) -> Result<()> + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write_listeners().push((id, Arc::new(listener)));
        debug!("Registered completion listener {:?}", id);
        id
    }

    /// Deregisters a listener. Unknown ids are ignored; returns whether one was removed.
    pub fn remove_completion_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.write_listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    pub fn len(&self) -> usize {
        self.read_listeners().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_listeners().is_empty()
    }

    pub fn clear(&self) {
        self.write_listeners().clear();
    }

    /// Delivers an event to every listener and returns the failures.
    pub fn notify(&self, event: &MissionCompletedEvent) -> Vec<Error> {
        // Snapshot so listeners may (de)register from inside their callback
        let snapshot: Vec<(ListenerId, CompletionListener)> = self.read_listeners().clone();

        let mut failures = Vec::new();
        for (id, listener) in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(event)));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(Error::Listener(format!("listener {:?}: {}", id.0, e))),
                Err(panic) => Some(Error::Listener(format!(
                    "listener {:?} panicked: {}",
                    id.0,
                    panic_message(&panic)
                ))),
            };
            if let Some(err) = failure {
                warn!(
                    "Completion listener failed for club {} / competition {}: {}",
                    event.club.id, event.competition.id, err
                );
                failures.push(err);
            }
        }
        failures
    }

    // A listener panicking while we hold the lock would poison it; recover the data.
    fn read_listeners(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, Vec<(ListenerId, CompletionListener)>> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_listeners(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, Vec<(ListenerId, CompletionListener)>> {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl DomainEventSink for CompletionListeners {
    fn emit(&self, event: DomainEvent) {
        match event {
            DomainEvent::MissionCompleted(completed) => {
                self.notify(&completed);
            }
            DomainEvent::CompetitionsClosed { competition_ids } => {
                debug!("Competitions closed: {:?}", competition_ids);
            }
        }
    }
}
