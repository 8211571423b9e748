//! Shared identifiers and the capacity policy used across the salon.

use crate::error::SalonError;

/// Unique identifier for a client thread.
pub type ClientId = u64;

/// Seat layout of the salon: a number of waiting chairs plus one work chair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
    waiting_slots: usize,
}

impl Capacity {
    /// Number of work chairs; the salon has a single barber.
    pub const SERVICE_SLOTS: usize = 1;

    /// Build a capacity with `waiting_slots` chairs in the waiting room.
    pub fn new(waiting_slots: usize) -> Result<Self, SalonError> {
        if waiting_slots == 0 {
            return Err(SalonError::InvalidCapacity { waiting_slots });
        }
        Ok(Self { waiting_slots })
    }

    pub fn waiting_slots(&self) -> usize {
        self.waiting_slots
    }

    pub fn service_slots(&self) -> usize {
        Self::SERVICE_SLOTS
    }

    /// Clients the salon can hold at once, including the one being served.
    pub fn total(&self) -> usize {
        self.waiting_slots + Self::SERVICE_SLOTS
    }

    /// Waiting chair shown for the `counter`-th client that had to wait.
    pub fn waiting_chair_for(&self, counter: usize) -> usize {
        counter % self.waiting_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_counts_the_work_chair() {
        let capacity = Capacity::new(2).expect("valid capacity");
        assert_eq!(capacity.waiting_slots(), 2);
        assert_eq!(capacity.service_slots(), 1);
        assert_eq!(capacity.total(), 3);
    }

    #[test]
    fn zero_waiting_chairs_is_rejected() {
        let err = Capacity::new(0).unwrap_err();
        assert!(matches!(
            err,
            SalonError::InvalidCapacity { waiting_slots: 0 }
        ));
    }

    #[test]
    fn waiting_chairs_wrap_around() {
        let capacity = Capacity::new(3).expect("valid capacity");
        let chairs: Vec<usize> = (0..7).map(|n| capacity.waiting_chair_for(n)).collect();
        assert_eq!(chairs, vec![0, 1, 2, 0, 1, 2, 0]);
    }
}
