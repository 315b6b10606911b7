//! Background scheduler driving the mission engine.
//!
//! Each pass recomputes every club's progress and then closes expired
//! competitions. Passes run on a fixed interval and on demand.

use std::sync::{Arc, Mutex};

use log::{debug, error, info};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::missions::MissionServiceTrait;

/// Handle to the running scheduler task.
pub struct MissionScheduler {
    trigger: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MissionScheduler {
    /// Validates the config and spawns the scheduler task.
    ///
    /// The first pass runs immediately. Must be called inside a tokio runtime.
    pub fn start(service: Arc<dyn MissionServiceTrait>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let trigger = Arc::new(Notify::new());
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let period = config.refresh_interval;
        let task_trigger = trigger.clone();

        let handle = tokio::spawn(async move {
            info!("Mission scheduler started ({:?} interval)", period);

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = task_trigger.notified() => {
                        debug!("Manual mission refresh requested");
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }
                run_pass(service.as_ref()).await;
            }

            info!("Mission scheduler stopped");
        });

        Ok(Self {
            trigger,
            shutdown,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Requests an immediate pass. Requests made while a pass is running
    /// collapse into a single follow-up pass.
    pub fn trigger_now(&self) {
        self.trigger.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Stops the timer and waits for an in-flight pass to finish.
    pub async fn stop(&self) {
        let _ = self.shutdown.send(true);

        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Mission scheduler task ended abnormally: {}", e);
            }
        }
    }
}

/// Runs one recompute pass followed by the expiry check.
///
/// The service logs its own summary; only failures of a whole step are reported here.
async fn run_pass(service: &dyn MissionServiceTrait) {
    if let Err(e) = service.recompute_all().await {
        error!("Mission recompute failed: {}", e);
    }
    if let Err(e) = service.check_expired_missions().await {
        error!("Expired mission check failed: {}", e);
    }
}
