//! The barber: naps while the salon is empty, serves the head of the queue
//! otherwise, and drains the queue after closing time before going home.

use std::sync::Arc;

use crate::pace::Pace;
use crate::salon::Salon;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarberState {
    Idle,
    Sleeping,
    Picking,
    Serving,
    Terminated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BarberReport {
    pub served: u64,
}

pub struct Barber<S: Salon + ?Sized> {
    salon: Arc<S>,
    haircut: Pace,
}

impl<S: Salon + ?Sized> Barber<S> {
    pub fn new(salon: Arc<S>, haircut: Pace) -> Self {
        Self { salon, haircut }
    }

    /// Work until the salon is closed and empty.
    pub fn run(&self) -> BarberReport {
        let mut report = BarberReport::default();
        let mut state = BarberState::Idle;
        tracing::debug!("barber ready to work");
        while state != BarberState::Terminated {
            let next = self.step(state, &mut report);
            tracing::debug!(from = ?state, to = ?next, "barber transition");
            state = next;
        }
        tracing::debug!(served = report.served, "barber done for the day");
        report
    }

    fn step(&self, state: BarberState, report: &mut BarberReport) -> BarberState {
        match state {
            BarberState::Idle => {
                // Read `open` first: once closed, the queue can only shrink.
                let open = self.salon.is_open();
                if self.salon.client_count() > 0 {
                    BarberState::Picking
                } else if open {
                    BarberState::Sleeping
                } else {
                    BarberState::Terminated
                }
            }
            BarberState::Sleeping => {
                self.salon.go_to_sleep();
                BarberState::Idle
            }
            BarberState::Picking => {
                self.salon.pick_next_client();
                self.salon.wait_client_seated();
                BarberState::Serving
            }
            BarberState::Serving => {
                self.haircut.pause();
                self.salon.complete_service();
                report.served += 1;
                BarberState::Idle
            }
            BarberState::Terminated => BarberState::Terminated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientId;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Salon whose answers are scripted and whose calls are recorded.
    struct ScriptedSalon {
        open: Mutex<VecDeque<bool>>,
        counts: Mutex<VecDeque<usize>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedSalon {
        fn new(open: &[bool], counts: &[usize]) -> Self {
            Self {
                open: Mutex::new(open.iter().copied().collect()),
                counts: Mutex::new(counts.iter().copied().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().expect("calls mutex poisoned").push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("calls mutex poisoned").clone()
        }
    }

    impl Salon for ScriptedSalon {
        fn try_enter(&self, _client: ClientId) -> bool {
            unreachable!("barber never enters")
        }
        fn await_turn_and_sit(&self, _client: ClientId) {
            unreachable!("barber never sits")
        }
        fn walk_around(&self, _client: ClientId) {}
        fn wait_for_regrowth(&self, _client: ClientId) {}
        fn go_home(&self, _client: ClientId) {}
        fn client_count(&self) -> usize {
            self.counts
                .lock()
                .expect("counts mutex poisoned")
                .pop_front()
                .unwrap_or(0)
        }
        fn go_to_sleep(&self) {
            self.record("sleep");
        }
        fn pick_next_client(&self) {
            self.record("pick");
        }
        fn wait_client_seated(&self) {
            self.record("wait_seated");
        }
        fn complete_service(&self) {
            self.record("complete");
        }
        fn is_open(&self) -> bool {
            self.open
                .lock()
                .expect("open mutex poisoned")
                .pop_front()
                .unwrap_or(false)
        }
        fn shutdown(&self) {}
    }

    #[test]
    fn empty_open_salon_sends_barber_to_sleep() {
        let salon = Arc::new(ScriptedSalon::new(&[true], &[0]));
        let barber = Barber::new(Arc::clone(&salon), Pace::instant());
        let mut report = BarberReport::default();
        assert_eq!(
            barber.step(BarberState::Idle, &mut report),
            BarberState::Sleeping
        );
        assert_eq!(
            barber.step(BarberState::Sleeping, &mut report),
            BarberState::Idle
        );
        assert_eq!(salon.calls(), vec!["sleep"]);
    }

    #[test]
    fn serves_then_terminates_once_closed_and_empty() {
        // Cycle 1: open with one client; cycle 2: open and empty (nap);
        // cycle 3: closed with one left; cycle 4: closed and empty.
        let salon = Arc::new(ScriptedSalon::new(
            &[true, true, false, false],
            &[1, 0, 1, 0],
        ));
        let report = Barber::new(Arc::clone(&salon), Pace::instant()).run();
        assert_eq!(report.served, 2);
        assert_eq!(
            salon.calls(),
            vec![
                "pick",
                "wait_seated",
                "complete",
                "sleep",
                "pick",
                "wait_seated",
                "complete",
            ]
        );
    }

    #[test]
    fn closed_salon_with_queue_is_drained_before_leaving() {
        let salon = Arc::new(ScriptedSalon::new(&[false], &[2]));
        let barber = Barber::new(Arc::clone(&salon), Pace::instant());
        let mut report = BarberReport::default();
        assert_eq!(
            barber.step(BarberState::Idle, &mut report),
            BarberState::Picking
        );
    }

    /// Shared buffer the fmt subscriber writes into.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .expect("log buffer poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn transitions_are_logged_at_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let salon = Arc::new(ScriptedSalon::new(&[false], &[0]));
        let barber = Barber::new(salon, Pace::instant());
        tracing::subscriber::with_default(subscriber, || barber.run());

        let output = String::from_utf8(captured.0.lock().expect("log buffer poisoned").clone())
            .expect("utf8 log output");
        assert!(output.contains("barber transition"), "{output}");
        assert!(output.contains("Terminated"), "{output}");
    }

    #[test]
    fn terminated_is_final() {
        let salon = Arc::new(ScriptedSalon::new(&[], &[]));
        let barber = Barber::new(Arc::clone(&salon), Pace::instant());
        let mut report = BarberReport::default();
        assert_eq!(
            barber.step(BarberState::Terminated, &mut report),
            BarberState::Terminated
        );
        assert!(salon.calls().is_empty());
    }
}
