//! Demo, benchmark, and stress-test runners: the salon owner's side.
//!
//! Each run opens a salon, starts one barber and `clients` client threads,
//! keeps the doors open for `open_ms`, then closes and waits for everybody
//! to finish. The barber drains the queue, so every admitted client gets
//! served before the run ends.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::barber::{Barber, BarberReport};
use crate::client::{Client, ClientReport};
use crate::config::SalonConfig;
use crate::error::SalonError;
use crate::event::{EventLog, Fanout, LogObserver, NoopObserver, SalonEvent, SalonObserver};
use crate::monitor::{MonitorSalon, SalonStats};
use crate::salon::Salon;
use crate::types::{Capacity, ClientId};

const CSV_HEADER: &str = "clients,waiting_chairs,open_ms,elapsed_ms,served,rejected,throughput_per_s,cpu_user_s,cpu_sys_s,peak_occupancy,capacity_violation,lost_haircuts";

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    use libc::{RUSAGE_SELF, getrusage, rusage, timeval};
    let zero = timeval {
        tv_sec: 0,
        tv_usec: 0,
    };
    let mut usage = rusage {
        ru_utime: zero,
        ru_stime: zero,
        ru_maxrss: 0,
        ru_ixrss: 0,
        ru_idrss: 0,
        ru_isrss: 0,
        ru_minflt: 0,
        ru_majflt: 0,
        ru_nswap: 0,
        ru_inblock: 0,
        ru_oublock: 0,
        ru_msgsnd: 0,
        ru_msgrcv: 0,
        ru_nsignals: 0,
        ru_nvcsw: 0,
        ru_nivcsw: 0,
    };
    let rc = unsafe { getrusage(RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let user = usage.ru_utime.tv_sec as f64 + (usage.ru_utime.tv_usec as f64 / 1_000_000.0);
    let sys = usage.ru_stime.tv_sec as f64 + (usage.ru_stime.tv_usec as f64 / 1_000_000.0);
    Some((user, sys))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

/// Everything observed during one opening of the salon.
#[derive(Debug)]
pub struct RunSummary {
    pub capacity: Capacity,
    pub barber: BarberReport,
    pub clients: Vec<ClientReport>,
    pub stats: SalonStats,
    pub queue_left: usize,
    pub elapsed: Duration,
    pub cpu_user_s: Option<f64>,
    pub cpu_sys_s: Option<f64>,
}

impl RunSummary {
    pub fn client_haircuts(&self) -> u64 {
        self.clients.iter().map(|c| c.haircuts).sum()
    }

    pub fn capacity_violation(&self) -> bool {
        self.stats.peak_occupancy > self.capacity.total()
    }

    /// Disagreement between the barber's, the clients' and the monitor's counts.
    pub fn lost_haircuts(&self) -> u64 {
        let barber = self.barber.served;
        let clients = self.client_haircuts();
        let monitor = self.stats.served;
        barber.abs_diff(clients).max(barber.abs_diff(monitor))
    }

    fn csv_row(&self, config: &SalonConfig) -> String {
        let elapsed_ms = self.elapsed.as_secs_f64() * 1000.0;
        let throughput = if elapsed_ms > 0.0 {
            self.barber.served as f64 / (elapsed_ms / 1000.0)
        } else {
            0.0
        };
        let cpu_user = self
            .cpu_user_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        let cpu_sys = self
            .cpu_sys_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        format!(
            "{},{},{},{:.2},{},{},{:.2},{},{},{},{},{}",
            config.clients,
            config.waiting_chairs,
            config.open_ms,
            elapsed_ms,
            self.barber.served,
            self.stats.rejected,
            throughput,
            cpu_user,
            cpu_sys,
            self.stats.peak_occupancy,
            self.capacity_violation(),
            self.lost_haircuts()
        )
    }
}

fn spawn_named<T, F>(name: String, f: F) -> Result<thread::JoinHandle<T>, SalonError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| SalonError::Spawn { name, source })
}

fn join_named<T>(name: &str, handle: thread::JoinHandle<T>) -> Result<T, SalonError> {
    handle
        .join()
        .map_err(|_| SalonError::AgentPanicked(name.to_string()))
}

/// Open the salon, let it run for `open_ms`, close it and collect reports.
pub fn run_salon(
    config: &SalonConfig,
    observer: Arc<dyn SalonObserver>,
) -> Result<RunSummary, SalonError> {
    config.validate()?;
    let salon = Arc::new(MonitorSalon::new(config.capacity()?, observer));
    tracing::debug!(
        clients = config.clients,
        waiting_chairs = salon.capacity().waiting_slots(),
        "salon opening"
    );

    let cpu_start = cpu_times_seconds();
    let start = Instant::now();

    let barber = {
        let barber = Barber::new(Arc::clone(&salon), config.haircut_pace());
        spawn_named("barber".to_string(), move || barber.run())
    };
    let barber = match barber {
        Ok(handle) => handle,
        Err(err) => {
            salon.shutdown();
            return Err(err);
        }
    };

    let mut handles = Vec::with_capacity(config.clients);
    for id in 0..config.clients as ClientId {
        let client = Client::new(
            id,
            Arc::clone(&salon),
            config.walk_pace(),
            config.regrow_pace(),
        );
        match spawn_named(format!("client-{id}"), move || client.run()) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                // Already-running agents see the closed salon and wind down.
                salon.shutdown();
                return Err(err);
            }
        }
    }

    thread::sleep(Duration::from_millis(config.open_ms));
    salon.shutdown();
    tracing::debug!("salon closed, waiting for agents");

    let mut clients = Vec::with_capacity(handles.len());
    for (id, handle) in handles.into_iter().enumerate() {
        clients.push(join_named(&format!("client-{id}"), handle)?);
    }
    let barber = join_named("barber", barber)?;
    let elapsed = start.elapsed();

    let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
        (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
            (Some(user_end - user_start), Some(sys_end - sys_start))
        }
        _ => (None, None),
    };

    Ok(RunSummary {
        capacity: salon.capacity(),
        barber,
        clients,
        stats: salon.stats(),
        queue_left: salon.client_count(),
        elapsed,
        cpu_user_s,
        cpu_sys_s,
    })
}

/// Run the default demo and print a human-readable summary.
pub fn run_demo(config: &SalonConfig) -> Result<(), SalonError> {
    tracing::debug!("[DEMO] start");
    let log = Arc::new(EventLog::new());
    let observers: Vec<Arc<dyn SalonObserver>> = vec![Arc::new(LogObserver), log.clone()];
    let summary = run_salon(config, Arc::new(Fanout(observers)))?;
    tracing::debug!("[DEMO] finished in {}ms", summary.elapsed.as_millis());

    let haircuts: Vec<u64> = summary.clients.iter().map(|c| c.haircuts).collect();
    let walks: u64 = summary.clients.iter().map(|c| c.walks).sum();
    let naps = log.count(|e| *e == SalonEvent::BarberSleeping);
    let wakeups = log.count(|e| matches!(e, SalonEvent::BarberWoken { .. }));
    println!("DEMO SUMMARY");
    println!(
        "clients={} capacity={}+{} open_ms={}",
        config.clients,
        summary.capacity.waiting_slots(),
        summary.capacity.service_slots(),
        config.open_ms
    );
    println!("haircuts_per_client={haircuts:?}");
    println!("served={}", summary.barber.served);
    println!("rejected={} walks={walks}", summary.stats.rejected);
    println!("barber_naps={naps} barber_wakeups={wakeups}");
    println!("peak_occupancy={}", summary.stats.peak_occupancy);
    println!("capacity_violation={}", summary.capacity_violation());
    println!("lost_haircuts={}", summary.lost_haircuts());
    println!("queue_left={}", summary.queue_left);
    Ok(())
}

/// Run a single benchmark and print CSV output.
pub fn run_benchmark(config: &SalonConfig) -> Result<(), SalonError> {
    let summary = run_salon(config, Arc::new(NoopObserver))?;
    println!("{CSV_HEADER}");
    println!("{}", summary.csv_row(config));
    report_anomalies(&summary);
    Ok(())
}

/// Sweep client counts and waiting-room sizes, one CSV row per combination.
pub fn run_stress(
    client_sets: &[usize],
    chair_sets: &[usize],
    base: &SalonConfig,
) -> Result<(), SalonError> {
    if client_sets.is_empty() || client_sets.contains(&0) {
        return Err(SalonError::InvalidConfig(
            "client sets must be non-empty and > 0".to_string(),
        ));
    }
    if chair_sets.is_empty() || chair_sets.contains(&0) {
        return Err(SalonError::InvalidConfig(
            "chair sets must be non-empty and > 0".to_string(),
        ));
    }

    println!("{CSV_HEADER}");
    for &clients in client_sets {
        for &waiting_chairs in chair_sets {
            let config = SalonConfig {
                clients,
                waiting_chairs,
                ..base.clone()
            };
            let summary = run_salon(&config, Arc::new(NoopObserver))?;
            println!("{}", summary.csv_row(&config));
            report_anomalies(&summary);
        }
    }
    Ok(())
}

fn report_anomalies(summary: &RunSummary) {
    if summary.queue_left > 0 {
        eprintln!("# warning,queue_left,{}", summary.queue_left);
    }
    if summary.capacity_violation() {
        eprintln!("# violation,capacity");
    }
    if summary.lost_haircuts() > 0 {
        eprintln!("# violation,lost_haircuts,{}", summary.lost_haircuts());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(clients: usize, waiting_chairs: usize) -> SalonConfig {
        SalonConfig {
            clients,
            waiting_chairs,
            open_ms: 150,
            service_ms: 2,
            walk_ms: 1,
            regrow_ms: 3,
            jitter_ms: 2,
        }
    }

    #[test]
    fn run_drains_queue_and_counts_agree() {
        let summary = run_salon(&quick_config(6, 2), Arc::new(NoopObserver)).expect("run");
        assert_eq!(summary.queue_left, 0);
        assert_eq!(summary.clients.len(), 6);
        assert!(summary.barber.served > 0);
        assert_eq!(summary.lost_haircuts(), 0);
        assert!(!summary.capacity_violation());
        assert!(summary.stats.peak_occupancy <= 3);
        assert_eq!(summary.stats.admitted, summary.stats.served);
    }

    #[test]
    fn every_client_goes_home_once() {
        let log = Arc::new(EventLog::new());
        let summary = run_salon(&quick_config(4, 1), log.clone()).expect("run");
        for report in &summary.clients {
            let id = report.id;
            assert_eq!(
                log.count(|e| *e == SalonEvent::ClientWentHome { client: id }),
                1
            );
        }
        assert_eq!(log.count(|e| *e == SalonEvent::SalonClosed), 1);
        let served = log.count(|e| matches!(e, SalonEvent::ClientServed { .. }));
        assert_eq!(served as u64, summary.barber.served);
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let err = run_salon(&quick_config(0, 2), Arc::new(NoopObserver)).unwrap_err();
        assert!(matches!(err, SalonError::InvalidConfig(_)));
    }

    #[cfg(unix)]
    #[test]
    fn cpu_times_are_reported_on_unix() {
        let (user, sys) = cpu_times_seconds().expect("getrusage");
        assert!(user >= 0.0);
        assert!(sys >= 0.0);
    }

    #[test]
    fn stress_rejects_empty_sets() {
        let base = quick_config(1, 1);
        assert!(run_stress(&[], &[1], &base).is_err());
        assert!(run_stress(&[1], &[0], &base).is_err());
    }
}
