//! Latest-wins debouncer
//!
//! A single slot: scheduling a new action cancels the pending one. Each
//! debouncer owns a root [`CancellationToken`]; every scheduled timer runs
//! under a child of it, so [`Debouncer::cancel`] and `Drop` cancel whatever
//! is pending. An action whose timer already fired runs to completion.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Slot {
    generation: u64,
    /// Generation whose timer has not fired yet
    armed: Option<u64>,
    token: Option<CancellationToken>,
    tasks: Vec<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    root: CancellationToken,
    slot: Arc<Mutex<Slot>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            root: CancellationToken::new(),
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                armed: None,
                token: None,
                tasks: Vec::new(),
            })),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` once `delay` has passed without another `schedule` call
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let mut slot = lock(&self.slot);
        if let Some(previous) = slot.token.replace(token.clone()) {
            previous.cancel();
        }
        slot.generation += 1;
        let generation = slot.generation;
        slot.armed = Some(generation);
        slot.tasks.retain(|task| !task.is_finished());

        let delay = self.delay;
        let shared = Arc::clone(&self.slot);
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            {
                let mut slot = lock(&shared);
                if slot.armed == Some(generation) {
                    slot.armed = None;
                }
            }
            action.await;
        });
        slot.tasks.push(task);
    }

    /// Cancel the pending timer, if any
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.armed = None;
        if let Some(token) = slot.token.take() {
            token.cancel();
        }
    }

    /// Whether a timer is armed and has not fired
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).armed.is_some()
    }

    /// Wait until every scheduled task has finished or been cancelled
    pub async fn flush(&self) {
        let tasks = std::mem::take(&mut lock(&self.slot).tasks);
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("Debounced task failed: {e}");
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

fn lock(slot: &Mutex<Slot>) -> std::sync::MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
