//! The watch coordinator: one task that owns the debounce state and runs
//! regenerations one at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::debouncer::Debouncer;
use super::error::WatchError;
use super::handler::{PageEvent, Regenerate};

/// Consumes queued page events and triggers one regeneration per quiet window.
pub struct WatchCoordinator {
    queue: mpsc::Receiver<PageEvent>,
    debouncer: Debouncer,
    regenerator: Arc<dyn Regenerate>,
    shutdown: CancellationToken,
}

impl WatchCoordinator {
    /// Create a coordinator and the sending half of its queue.
    pub fn new(
        regenerator: Arc<dyn Regenerate>,
        debounce_ms: u64,
        queue_capacity: usize,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::Sender<PageEvent>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let coordinator = Self {
            queue: rx,
            debouncer: Debouncer::new(debounce_ms),
            regenerator,
            shutdown,
        };
        (coordinator, tx)
    }

    /// Run the coordinator on its own task.
    pub fn spawn(
        regenerator: Arc<dyn Regenerate>,
        debounce_ms: u64,
        queue_capacity: usize,
    ) -> CoordinatorHandle {
        let shutdown = CancellationToken::new();
        let (coordinator, sender) =
            Self::new(regenerator, debounce_ms, queue_capacity, shutdown.clone());
        let task = tokio::spawn(coordinator.run());

        CoordinatorHandle {
            sender,
            shutdown,
            task,
        }
    }

    /// Event loop. Returns on shutdown or when every sender is gone; a
    /// pending batch is dropped in both cases.
    pub async fn run(mut self) {
        crate::debug_event!(
            "coordinator",
            "started",
            "{}ms window",
            self.debouncer.window().as_millis()
        );

        loop {
            let deadline = self.debouncer.deadline();
            let timer = sleep_until(deadline.map_or_else(Instant::now, Instant::from_std));

            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                _ = timer, if deadline.is_some() => self.fire().await,

                event = self.queue.recv() => match event {
                    Some(event) => {
                        // A window that elapsed while the queue stayed busy
                        // fires before the event joins a batch
                        self.fire().await;
                        self.record(event);
                    }
                    None => break,
                },
            }
        }

        if self.debouncer.has_pending() {
            crate::debug_event!(
                "coordinator",
                "dropped",
                "{} pending events",
                self.debouncer.pending_count()
            );
            self.debouncer.clear();
        }
        crate::debug_event!("coordinator", "stopped");
    }

    fn record(&mut self, event: PageEvent) {
        let now = Instant::now().into_std();
        crate::debug_event!("coordinator", event.action, "{}", event.path);

        if self.debouncer.record(event, now) {
            crate::debug_event!(
                "coordinator",
                "armed",
                "{}ms",
                self.debouncer.window().as_millis()
            );
        }
    }

    async fn fire(&mut self) {
        let Some(batch) = self.debouncer.take_ready(Instant::now().into_std()) else {
            return;
        };

        if self.shutdown.is_cancelled() {
            return;
        }

        crate::log_event!(
            "coordinator",
            "regenerating",
            "{} {} ({} events)",
            batch.trigger.action,
            batch.trigger.path,
            batch.events.len()
        );

        if let Err(e) = self.regenerator.regenerate(&batch.trigger).await {
            tracing::error!("[coordinator] regeneration failed: {e}");
        }
    }
}

/// Handle to a spawned coordinator.
pub struct CoordinatorHandle {
    sender: mpsc::Sender<PageEvent>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub fn sender(&self) -> mpsc::Sender<PageEvent> {
        self.sender.clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Queue an event from async code.
    pub async fn send(&self, event: PageEvent) -> Result<(), WatchError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| WatchError::ChannelClosed)
    }

    /// Stop the coordinator and wait for an in-flight regeneration to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("[coordinator] task failed: {e}");
        }
    }
}
