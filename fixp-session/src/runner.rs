/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Background task runner.
//!
//! The runner executes a periodic callback on a dedicated OS thread. The
//! session coordinates with it through an atomic stop flag, and a completion
//! channel gives a join with a bounded wait.

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use fixp_core::error::SessionError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest single sleep of the worker loop, so a stop request is noticed
/// without waiting for a full period.
const MAX_SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Period of the background counter task.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background work owned by a session.
pub trait Worker: Send {
    /// Asks the worker to stop. Returns immediately.
    fn request_stop(&self);

    /// Waits up to `timeout` for the worker to finish.
    ///
    /// Returns true if the worker finished in time.
    fn join_timeout(&mut self, timeout: Duration) -> bool;
}

/// Periodic task running on its own thread.
#[derive(Debug)]
pub struct TaskRunner {
    name: String,
    stop: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    done: Receiver<()>,
    finished: bool,
}

impl TaskRunner {
    /// Spawns the runner thread.
    ///
    /// The callback receives the tick count after each period until a stop is
    /// requested.
    ///
    /// # Arguments
    /// * `name` - Thread name
    /// * `period` - Time between ticks
    /// * `on_tick` - Callback invoked with the running count
    ///
    /// # Errors
    /// Returns `SessionError::Worker` if the thread cannot be spawned.
    pub fn spawn<F>(name: impl Into<String>, period: Duration, mut on_tick: F) -> Result<Self, SessionError>
    where
        F: FnMut(u64) + Send + 'static,
    {
        let name = name.into();
        let stop = Arc::new(AtomicBool::new(false));
        let ticks = Arc::new(AtomicU64::new(0));
        let (done_tx, done) = bounded(1);

        let thread_stop = Arc::clone(&stop);
        let thread_ticks = Arc::clone(&ticks);
        let thread_name = name.clone();

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                info!(worker = %thread_name, "Background task started");
                'run: loop {
                    let deadline = Instant::now() + period;
                    loop {
                        if thread_stop.load(Ordering::Acquire) {
                            break 'run;
                        }
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        if remaining.is_zero() {
                            break;
                        }
                        thread::sleep(remaining.min(MAX_SLEEP_SLICE));
                    }
                    let count = thread_ticks.fetch_add(1, Ordering::Relaxed) + 1;
                    on_tick(count);
                }
                info!(worker = %thread_name, "Background task stopped");
                let _ = done_tx.send(());
            })
            .map_err(|e| SessionError::Worker(e.to_string()))?;

        Ok(Self {
            name,
            stop,
            ticks,
            done,
            finished: false,
        })
    }

    /// Spawns the background counter task, logging each tick.
    ///
    /// # Errors
    /// Returns `SessionError::Worker` if the thread cannot be spawned.
    pub fn counter(period: Duration) -> Result<Self, SessionError> {
        Self::spawn("fixp-counter", period, |count| {
            info!(count, "Background task tick");
        })
    }

    /// Returns the thread name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Returns true once a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

impl Worker for TaskRunner {
    fn request_stop(&self) {
        debug!(worker = %self.name, "Stop requested");
        self.stop.store(true, Ordering::Release);
    }

    fn join_timeout(&mut self, timeout: Duration) -> bool {
        if self.finished {
            return true;
        }
        match self.done.recv_timeout(timeout) {
            // A disconnected channel means the thread exited without signalling.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_runner_ticks_until_stopped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut runner = TaskRunner::spawn("test-runner", Duration::from_millis(5), move |n| {
            sink.lock().unwrap().push(n);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(60));
        runner.request_stop();
        assert!(runner.is_stop_requested());
        assert!(runner.join_timeout(Duration::from_secs(1)));

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert_eq!(seen.first(), Some(&1));
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(runner.ticks(), *seen.last().unwrap());
    }

    #[test]
    fn test_stop_is_noticed_before_long_period() {
        let mut runner = TaskRunner::spawn("slow-runner", Duration::from_secs(60), |_| {}).unwrap();
        runner.request_stop();
        assert!(runner.join_timeout(Duration::from_secs(1)));
        assert_eq!(runner.ticks(), 0);
    }

    #[test]
    fn test_join_times_out_on_blocked_callback() {
        let mut runner = TaskRunner::spawn("blocked-runner", Duration::from_millis(1), |_| {
            thread::sleep(Duration::from_millis(300));
        })
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        runner.request_stop();
        assert!(!runner.join_timeout(Duration::from_millis(10)));
        assert!(runner.join_timeout(Duration::from_secs(2)));
        assert!(runner.join_timeout(Duration::ZERO));
    }

    #[test]
    fn test_runner_name() {
        let runner = TaskRunner::spawn("named", Duration::from_millis(10), |_| {}).unwrap();
        assert_eq!(runner.name(), "named");
    }
}
