// src/stats/reporter.rs
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use sysinfo::{Components, System};

/// Hashing throughput figures
#[derive(Debug, Clone, Default)]
pub struct HashStats {
    /// Total number of digests computed
    pub hashes_total: u64,
    /// Seconds since the reporter was created
    pub elapsed_secs: f64,
    /// Average rate since start (hashes per second)
    pub avg_hashrate: f64,
}

/// Statistics related to hardware performance
#[derive(Debug, Clone)]
pub struct HardwareStats {
    /// Current CPU usage percentage (0-100)
    pub cpu_usage: f32,
    /// Memory currently in use system-wide (in bytes)
    pub memory_used: u64,
    /// Current CPU temperature in Celsius, 0 when no sensor is exposed
    pub temperature: f32,
}

/// Sending half handed to hashing threads, plus the listener it feeds
pub struct HashFeed {
    /// Clone this into every hashing thread; send the number of digests done
    pub sender: Sender<u64>,
    listener: JoinHandle<()>,
}

impl HashFeed {
    /// Drops the sender and waits until every queued count has been tallied
    ///
    /// All clones of the sender must have been dropped first, otherwise this
    /// blocks.
    pub fn close(self) {
        drop(self.sender);
        if self.listener.join().is_err() {
            log::error!("Hash count listener panicked");
        }
    }
}

/// Collects and reports hashing and hardware statistics
pub struct StatsReporter {
    counters: Arc<Counters>,
    system: System,
    components: Components,
    report_interval: Duration,
    reporting: Mutex<Option<ReportingThread>>,
}

struct Counters {
    hashes: AtomicU64,
    start_time: Instant,
}

/// Periodic logger; dropping `stop` wakes it out of its wait
struct ReportingThread {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl StatsReporter {
    /// Creates a new StatsReporter with the specified reporting interval
    ///
    /// # Arguments
    /// * `report_interval` - How often to log statistics
    pub fn new(report_interval: Duration) -> Self {
        StatsReporter {
            counters: Arc::new(Counters {
                hashes: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
            system: System::new_all(),
            components: Components::new_with_refreshed_list(),
            report_interval,
            reporting: Mutex::new(None),
        }
    }

    /// Creates a channel for hash counts and starts its listener thread
    pub fn hash_feed(&self) -> HashFeed {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let listener = self.start_hashrate_listener(receiver);
        HashFeed { sender, listener }
    }

    /// Gets the current hashing statistics
    pub fn get_stats(&self) -> HashStats {
        snapshot(&self.counters)
    }

    /// Gets the current hardware statistics
    ///
    /// This refreshes system information before returning the stats.
    pub fn get_hardware_stats(&mut self) -> HardwareStats {
        sample_hardware(&mut self.system, &mut self.components)
    }

    /// Starts the periodic reporting of statistics
    ///
    /// Spawns a background thread that logs hash rate and hardware load at
    /// the configured interval until [`StatsReporter::stop_reporting`] is
    /// called. Calling it while a reporter is already running does nothing.
    pub fn start_reporting(&self) {
        let mut slot = match self.reporting.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.is_some() {
            return;
        }

        let counters = self.counters.clone();
        let interval = self.report_interval;
        let (stop, stopped) = crossbeam_channel::bounded::<()>(0);

        let handle = std::thread::spawn(move || {
            let mut system = System::new_all();
            let mut components = Components::new_with_refreshed_list();

            while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(interval) {
                let hardware = sample_hardware(&mut system, &mut components);
                let stats = snapshot(&counters);

                log::info!(
                    "Hashrate: {:.2} H/s | Total: {} | CPU: {:.1}% | Mem: {} MiB | Temp: {:.1}°C",
                    stats.avg_hashrate,
                    stats.hashes_total,
                    hardware.cpu_usage,
                    hardware.memory_used / (1024 * 1024),
                    hardware.temperature
                );
            }
        });

        *slot = Some(ReportingThread { stop, handle });
    }

    /// Stops the periodic reporter and waits for its thread to exit
    pub fn stop_reporting(&self) {
        let thread = match self.reporting.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(ReportingThread { stop, handle }) = thread {
            drop(stop);
            if handle.join().is_err() {
                log::error!("Stats reporting thread panicked");
            }
        }
    }

    /// `true` while the periodic reporter thread is running
    pub fn is_reporting(&self) -> bool {
        match self.reporting.lock() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    fn start_hashrate_listener(&self, receiver: Receiver<u64>) -> JoinHandle<()> {
        let counters = self.counters.clone();

        std::thread::spawn(move || {
            for count in receiver {
                counters.hashes.fetch_add(count, Ordering::Relaxed);
            }
        })
    }
}

/// Refreshes CPU, memory and sensor readings and averages CPU load over all cores
fn sample_hardware(system: &mut System, components: &mut Components) -> HardwareStats {
    system.refresh_cpu_all();
    system.refresh_memory();
    components.refresh(true);

    let cpus = system.cpus();
    let cpu_usage = if cpus.is_empty() {
        0.0
    } else {
        cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
    };

    let temperature = components
        .iter()
        .find(|c| c.label().contains("CPU"))
        .and_then(|c| c.temperature())
        .unwrap_or(0.0);

    HardwareStats {
        cpu_usage,
        memory_used: system.used_memory(),
        temperature,
    }
}

fn snapshot(counters: &Counters) -> HashStats {
    let elapsed_secs = counters.start_time.elapsed().as_secs_f64();
    let hashes_total = counters.hashes.load(Ordering::Relaxed);

    HashStats {
        hashes_total,
        elapsed_secs,
        avg_hashrate: if elapsed_secs > 0.0 {
            hashes_total as f64 / elapsed_secs
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_counts_are_tallied_after_close() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let feed = reporter.hash_feed();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sender = feed.sender.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        sender.send(5).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        feed.close();

        let stats = reporter.get_stats();
        assert_eq!(stats.hashes_total, 200);
        assert!(stats.avg_hashrate > 0.0);
    }

    #[test]
    fn hardware_sample_is_in_range() {
        let mut reporter = StatsReporter::new(Duration::from_secs(60));
        let hw = reporter.get_hardware_stats();
        assert!(hw.cpu_usage >= 0.0);
        assert!(hw.memory_used > 0);
    }

    #[test]
    fn stop_reporting_joins_without_waiting_out_the_interval() {
        let reporter = StatsReporter::new(Duration::from_secs(30));
        reporter.start_reporting();
        assert!(reporter.is_reporting());

        let started = Instant::now();
        reporter.stop_reporting();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!reporter.is_reporting());

        // Stopping twice is harmless
        reporter.stop_reporting();
    }

    #[test]
    fn elapsed_time_feeds_the_average() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let feed = reporter.hash_feed();
        feed.sender.send(10).unwrap();
        feed.close();
        std::thread::sleep(Duration::from_millis(20));

        let stats = reporter.get_stats();
        assert!(stats.elapsed_secs >= 0.02);
        assert_eq!(stats.hashes_total, 10);
        let expected = stats.hashes_total as f64 / stats.elapsed_secs;
        assert!((stats.avg_hashrate - expected).abs() < 1e-9);
    }

    #[test]
    fn fresh_reporter_is_empty() {
        let reporter = StatsReporter::new(Duration::from_secs(1));
        assert_eq!(reporter.get_stats().hashes_total, 0);
    }
}
