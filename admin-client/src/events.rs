//! Console event bus
//!
//! Typed in-process broadcast of [`ConsoleEvent`]s. Components that approve
//! users or create categories publish; the header, catalog and user views
//! subscribe explicitly and re-fetch on receipt.
//!
//! ```text
//! UserApprovals ──┐                         ┌──▶ HeaderActions (pending list)
//!                 ├──▶ broadcast::Sender ───┼──▶ UserManagement (report)
//! HeaderActions ──┘                         └──▶ CatalogEditor (categories)
//! ```
//!
//! Listeners spawned with [`EventBus::listen`] run until their [`Listener`]
//! is stopped or dropped, or until the bus shuts down.

use shared::ConsoleEvent;
use shared::message::EventKind;
use std::future::Future;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ConsoleEvent>,
    shutdown: CancellationToken,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Broadcast an event; returns how many subscribers received it
    pub fn publish(&self, event: ConsoleEvent) -> usize {
        tracing::debug!(%event, "Publishing console event");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Run `handler` for every event of `kind` until the returned listener
    /// is stopped or dropped
    pub fn listen<F, Fut>(&self, kind: EventKind, handler: F) -> Listener
    where
        F: Fn(ConsoleEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let token = self.shutdown.child_token();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    event = subscription.recv() => match event {
                        Some(event) if event.kind() == kind => handler(event).await,
                        Some(_) => {}
                        None => break,
                    },
                }
            }
            tracing::debug!(%kind, "Event listener stopped");
        });

        Listener { token, handle }
    }

    /// Stop every listener spawned from this bus
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Receiving end of the bus
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ConsoleEvent>,
}

impl Subscription {
    /// Next event; `None` once the bus is gone. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<ConsoleEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Console event subscriber lagged {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    pub fn try_recv(&mut self) -> Option<ConsoleEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Handle of a spawned listener task
#[derive(Debug)]
pub struct Listener {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Listener {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
