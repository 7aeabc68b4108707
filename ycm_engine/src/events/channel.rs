//! Stateless pub-sub event channels
//!
//! Components of the engine publish events (a booking was settled, a member is running low on points) and any number
//! of producers can feed a single handler. The handler only ever sees the event itself; it has no access to the
//! engine's internal state. Handlers are async, and each event is handled on its own task, so a slow email relay does
//! not hold up the webhook response.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size);
        Self { listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs until every producer has been dropped, then waits for in-flight events to finish.
    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // Only producers may keep the channel open
        drop(self.sender);
        let mut jobs = JoinSet::new();
        loop {
            tokio::select! {
                ev = self.listener.recv() => match ev {
                    Some(ev) => {
                        trace!("📬️ Handling event");
                        let handler = Arc::clone(&self.handler);
                        jobs.spawn(async move { (handler)(ev).await });
                    },
                    None => break,
                },
                Some(result) = jobs.join_next(), if !jobs.is_empty() => log_job_result(result),
            }
        }
        if !jobs.is_empty() {
            debug!("📬️ Waiting for {} event jobs to complete", jobs.len());
        }
        while let Some(result) = jobs.join_next().await {
            log_job_result(result);
        }
        debug!("📬️ Event handler has shut down");
    }
}

fn log_job_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => trace!("📬️ Event handled"),
        Err(e) => error!("📬️ An event handler failed to complete. {e}"),
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    /// Queues the event for the handler. Failures are logged; publishing never fails the caller.
    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
