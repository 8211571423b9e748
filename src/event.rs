//! Presentation events published by the salon and its agents.
//!
//! Observers are fire-and-forget: the monitor always publishes with its lock
//! released, so an observer may see intermediate states and must never be
//! relied upon for synchronization.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::ClientId;

/// Something visible happened in the salon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SalonEvent {
    ClientEntered { client: ClientId },
    ClientWaiting { client: ClientId, chair: usize },
    BarberWoken { by: ClientId },
    ClientSeated { client: ClientId },
    ClientServed { client: ClientId },
    ClientWalkingAround { client: ClientId },
    ClientRegrowing { client: ClientId },
    ClientWentHome { client: ClientId },
    BarberSleeping,
    BarberAwake,
    BarberCutting { client: ClientId },
    SalonClosed,
}

/// Receiver for salon events.
pub trait SalonObserver: Send + Sync {
    fn on_event(&self, event: &SalonEvent);
}

/// Observer that discards everything.
pub struct NoopObserver;

impl SalonObserver for NoopObserver {
    fn on_event(&self, _event: &SalonEvent) {}
}

/// Observer that turns events into structured `tracing` records.
pub struct LogObserver;

impl SalonObserver for LogObserver {
    fn on_event(&self, event: &SalonEvent) {
        match *event {
            SalonEvent::ClientEntered { client } => {
                tracing::info!(client, "entered the salon");
            }
            SalonEvent::ClientWaiting { client, chair } => {
                tracing::info!(client, chair, "sat down in the waiting room");
            }
            SalonEvent::BarberWoken { by } => {
                tracing::info!(client = by, "woke the barber");
            }
            SalonEvent::ClientSeated { client } => {
                tracing::info!(client, "sat on the work chair");
            }
            SalonEvent::ClientServed { client } => {
                tracing::info!(client, "haircut done");
            }
            SalonEvent::ClientWalkingAround { client } => {
                tracing::info!(client, "salon full, walking around");
            }
            SalonEvent::ClientRegrowing { client } => {
                tracing::info!(client, "waiting for hair to grow back");
            }
            SalonEvent::ClientWentHome { client } => {
                tracing::info!(client, "salon closed, going home");
            }
            SalonEvent::BarberSleeping => tracing::info!("barber napping"),
            SalonEvent::BarberAwake => tracing::info!("barber back at the chair"),
            SalonEvent::BarberCutting { client } => {
                tracing::info!(client, "barber cutting hair");
            }
            SalonEvent::SalonClosed => tracing::info!("salon closed"),
        }
    }
}

/// Forwards every event to each inner observer, in order.
pub struct Fanout(pub Vec<Arc<dyn SalonObserver>>);

impl SalonObserver for Fanout {
    fn on_event(&self, event: &SalonEvent) {
        for observer in &self.0 {
            observer.on_event(event);
        }
    }
}

/// Observer that keeps every event in arrival order.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<SalonEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn snapshot(&self) -> Vec<SalonEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&SalonEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl SalonObserver for EventLog {
    fn on_event(&self, event: &SalonEvent) {
        self.events.lock().push(event.clone());
    }
}
