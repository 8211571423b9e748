//! A salon client: keeps coming back for haircuts until closing time.

use std::sync::Arc;

use crate::pace::Pace;
use crate::salon::Salon;
use crate::types::ClientId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientState {
    Arriving,
    Rejected,
    Queued,
    BeingServed,
    Recovering,
    Departed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientReport {
    pub id: ClientId,
    pub haircuts: u64,
    /// Times the salon was full (or had just closed) on arrival.
    pub walks: u64,
}

pub struct Client<S: Salon + ?Sized> {
    id: ClientId,
    salon: Arc<S>,
    walk: Pace,
    regrow: Pace,
}

impl<S: Salon + ?Sized> Client<S> {
    pub fn new(id: ClientId, salon: Arc<S>, walk: Pace, regrow: Pace) -> Self {
        Self {
            id,
            salon,
            walk,
            regrow,
        }
    }

    /// Visit the salon until it closes, then go home.
    pub fn run(&self) -> ClientReport {
        let mut report = ClientReport {
            id: self.id,
            ..ClientReport::default()
        };
        let mut state = ClientState::Arriving;
        while state != ClientState::Departed {
            let next = self.step(state, &mut report);
            tracing::debug!(client = self.id, from = ?state, to = ?next, "client transition");
            state = next;
        }
        self.salon.go_home(self.id);
        tracing::debug!(
            client = self.id,
            haircuts = report.haircuts,
            walks = report.walks,
            "client went home"
        );
        report
    }

    fn step(&self, state: ClientState, report: &mut ClientReport) -> ClientState {
        match state {
            ClientState::Arriving => {
                if !self.salon.is_open() {
                    ClientState::Departed
                } else if self.salon.try_enter(self.id) {
                    ClientState::Queued
                } else {
                    ClientState::Rejected
                }
            }
            ClientState::Rejected => {
                report.walks += 1;
                self.salon.walk_around(self.id);
                self.walk.pause();
                ClientState::Arriving
            }
            ClientState::Queued => {
                self.salon.await_turn_and_sit(self.id);
                ClientState::BeingServed
            }
            ClientState::BeingServed => {
                report.haircuts += 1;
                ClientState::Recovering
            }
            ClientState::Recovering => {
                self.salon.wait_for_regrowth(self.id);
                self.regrow.pause();
                ClientState::Arriving
            }
            ClientState::Departed => ClientState::Departed,
        }
    }
}
