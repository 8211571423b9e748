//! Public contract of the salon shared by the barber and its clients.
//!
//! ```text
//! client:  try_enter ──► await_turn_and_sit ──► wait_for_regrowth ──► ...
//!              └─ false ─► walk_around ──► try_enter
//! barber:  client_count ─0─► go_to_sleep
//!                      └>0─► pick_next_client ─► wait_client_seated ─► complete_service
//! owner:   shutdown
//! ```
//!
//! [`MonitorSalon`](crate::monitor::MonitorSalon) is the monitor-based
//! implementation; tests substitute scripted fakes to drive the agents.

use crate::types::ClientId;

pub trait Salon: Send + Sync {
    // Client side.

    /// Non-blocking admission. `false` means the salon is full or closed.
    fn try_enter(&self, client: ClientId) -> bool;

    /// Block until `client` is at the head of the queue, sit on the work
    /// chair, then block until the barber finishes the haircut.
    fn await_turn_and_sit(&self, client: ClientId);

    fn walk_around(&self, client: ClientId);

    fn wait_for_regrowth(&self, client: ClientId);

    fn go_home(&self, client: ClientId);

    // Barber side.

    /// Clients in the salon, including the one on the work chair.
    fn client_count(&self) -> usize;

    /// Nap until a client arrives or the salon closes.
    fn go_to_sleep(&self);

    /// Call the head of the queue to the work chair.
    fn pick_next_client(&self);

    /// Block until the called client is seated.
    fn wait_client_seated(&self);

    /// Finish the current haircut and release that client.
    fn complete_service(&self);

    // Shared.

    fn is_open(&self) -> bool;

    /// Stop admitting clients and wake a sleeping barber.
    fn shutdown(&self);
}
