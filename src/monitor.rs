//! Monitor-based salon: one lock, four condition variables.
//!
//! Every wait re-checks its predicate after waking, so a notification sent
//! before the waiter blocks is never lost and spurious wakeups are harmless.
//!
//! | condvar         | waiter  | wakes when                                   |
//! |-----------------|---------|----------------------------------------------|
//! | `client_turn`   | clients | `queue.front == id` and the work chair is free |
//! | `client_seated` | barber  | a client sits on the work chair              |
//! | `haircut_done`  | client  | the work chair no longer holds that client   |
//! | `barber_idle`   | barber  | `sleeping` cleared or the salon closed       |

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::event::{SalonEvent, SalonObserver};
use crate::salon::Salon;
use crate::types::{Capacity, ClientId};

/// Counters kept by the monitor for run summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SalonStats {
    pub admitted: u64,
    pub rejected: u64,
    pub served: u64,
    /// Largest number of clients observed inside the salon at once.
    pub peak_occupancy: usize,
}

struct SalonState {
    /// Arrival order; the head is on the work chair or next to sit there.
    queue: VecDeque<ClientId>,
    /// Client currently on the work chair.
    chair: Option<ClientId>,
    sleeping: bool,
    open: bool,
    /// Only used to pick a waiting chair for display.
    waiting_counter: usize,
    stats: SalonStats,
}

pub struct MonitorSalon {
    capacity: Capacity,
    state: Mutex<SalonState>,
    client_turn: Condvar,
    client_seated: Condvar,
    haircut_done: Condvar,
    barber_idle: Condvar,
    observer: Arc<dyn SalonObserver>,
}

impl MonitorSalon {
    /// Create an open salon with an empty queue and an awake barber.
    pub fn new(capacity: Capacity, observer: Arc<dyn SalonObserver>) -> Self {
        Self {
            capacity,
            state: Mutex::new(SalonState {
                queue: VecDeque::with_capacity(capacity.total()),
                chair: None,
                sleeping: false,
                open: true,
                waiting_counter: 0,
                stats: SalonStats::default(),
            }),
            client_turn: Condvar::new(),
            client_seated: Condvar::new(),
            haircut_done: Condvar::new(),
            barber_idle: Condvar::new(),
            observer,
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Snapshot of the run counters.
    pub fn stats(&self) -> SalonStats {
        self.state.lock().stats.clone()
    }

    fn publish(&self, event: SalonEvent) {
        self.observer.on_event(&event);
    }

    /// Publish with the lock released, then take it back.
    fn publish_unlocked(&self, state: &mut MutexGuard<'_, SalonState>, event: SalonEvent) {
        MutexGuard::unlocked(state, || self.publish(event));
    }

    #[cfg(test)]
    fn queue_for_test(&self) -> Vec<ClientId> {
        self.state.lock().queue.iter().copied().collect()
    }

    #[cfg(test)]
    fn chair_for_test(&self) -> Option<ClientId> {
        self.state.lock().chair
    }
}

impl Salon for MonitorSalon {
    fn try_enter(&self, client: ClientId) -> bool {
        let mut events = Vec::with_capacity(3);
        {
            let mut state = self.state.lock();
            if !state.open || state.queue.len() == self.capacity.total() {
                state.stats.rejected += 1;
                return false;
            }

            state.queue.push_back(client);
            state.stats.admitted += 1;
            state.stats.peak_occupancy = state.stats.peak_occupancy.max(state.queue.len());
            events.push(SalonEvent::ClientEntered { client });

            if state.sleeping {
                state.sleeping = false;
                self.barber_idle.notify_one();
                events.push(SalonEvent::BarberWoken { by: client });
            }

            if state.queue.front() != Some(&client) {
                let chair = self.capacity.waiting_chair_for(state.waiting_counter);
                state.waiting_counter = state.waiting_counter.wrapping_add(1);
                events.push(SalonEvent::ClientWaiting { client, chair });
            }
        }

        for event in events {
            self.publish(event);
        }
        true
    }

    fn await_turn_and_sit(&self, client: ClientId) {
        let mut state = self.state.lock();
        while state.queue.front() != Some(&client) || state.chair.is_some() {
            self.client_turn.wait(&mut state);
        }

        state.chair = Some(client);
        self.client_seated.notify_one();
        self.publish_unlocked(&mut state, SalonEvent::ClientSeated { client });

        while state.chair == Some(client) {
            self.haircut_done.wait(&mut state);
        }
    }

    fn walk_around(&self, client: ClientId) {
        self.publish(SalonEvent::ClientWalkingAround { client });
    }

    fn wait_for_regrowth(&self, client: ClientId) {
        self.publish(SalonEvent::ClientRegrowing { client });
    }

    fn go_home(&self, client: ClientId) {
        self.publish(SalonEvent::ClientWentHome { client });
    }

    fn client_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    fn go_to_sleep(&self) {
        let mut state = self.state.lock();
        // A client may have slipped in since the barber last looked.
        if !state.queue.is_empty() || !state.open {
            return;
        }

        state.sleeping = true;
        self.publish_unlocked(&mut state, SalonEvent::BarberSleeping);
        while state.sleeping && state.open {
            self.barber_idle.wait(&mut state);
        }
        state.sleeping = false;
        drop(state);

        self.publish(SalonEvent::BarberAwake);
    }

    fn pick_next_client(&self) {
        let state = self.state.lock();
        if state.chair.is_none() {
            // Only the head of the queue passes its predicate; the rest block again.
            self.client_turn.notify_all();
        }
    }

    fn wait_client_seated(&self) {
        let mut state = self.state.lock();
        let client = loop {
            if let Some(client) = state.chair {
                break client;
            }
            self.client_seated.wait(&mut state);
        };
        drop(state);

        self.publish(SalonEvent::BarberCutting { client });
    }

    fn complete_service(&self) {
        let mut state = self.state.lock();
        let Some(client) = state.chair.take() else {
            if !cfg!(debug_assertions) {
                tracing::error!("complete_service called with an empty work chair");
            }
            debug_assert!(false, "complete_service called with an empty work chair");
            return;
        };

        let head = state.queue.pop_front();
        debug_assert_eq!(
            head,
            Some(client),
            "served client was not at the head of the queue"
        );
        state.stats.served += 1;
        self.haircut_done.notify_one();
        drop(state);

        self.publish(SalonEvent::ClientServed { client });
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn shutdown(&self) {
        let mut state = self.state.lock();
        if !state.open {
            return;
        }
        state.open = false;
        if state.sleeping {
            state.sleeping = false;
            self.barber_idle.notify_one();
        }
        drop(state);

        self.publish(SalonEvent::SalonClosed);
    }
}
