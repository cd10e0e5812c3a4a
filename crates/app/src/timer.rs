use std::{sync::Arc, time::Duration};

use gymtracker_domain as domain;
use log::debug;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, interval_at},
};

const TICK: Duration = Duration::from_secs(1);

/// Counts down a rest timer once per second in a background task.
///
/// The task is aborted when the timer is stopped, restarted or the driver is dropped.
pub struct RestTimerDriver {
    state: Arc<watch::Sender<domain::RestTimer>>,
    task: Option<JoinHandle<()>>,
}

impl RestTimerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(domain::RestTimer::default())),
            task: None,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<domain::RestTimer> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn timer(&self) -> domain::RestTimer {
        *self.state.borrow()
    }

    pub fn start(&mut self, seconds: u32) {
        self.abort();
        self.state.send_modify(|timer| timer.start(seconds));
        self.restart_ticker();
    }

    /// Extend the countdown. The tick phase restarts, the remaining time is kept.
    pub fn add(&mut self, seconds: u32) {
        self.state.send_modify(|timer| timer.add(seconds));
        self.restart_ticker();
    }

    pub fn stop(&mut self) {
        self.abort();
        self.state.send_modify(domain::RestTimer::stop);
    }

    /// Replace the ticking task, so that no previous task can end the countdown concurrently.
    fn restart_ticker(&mut self) {
        self.abort();
        if !self.state.borrow().is_running() {
            return;
        }

        let state = Arc::clone(&self.state);
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                let mut running = false;
                state.send_modify(|timer| {
                    if timer.tick() {
                        debug!("rest timer elapsed");
                    }
                    running = timer.is_running();
                });
                if !running {
                    break;
                }
            }
        }));
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for RestTimerDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RestTimerDriver {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn sleep(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown() {
        let mut driver = RestTimerDriver::new();
        driver.start(3);
        assert_eq!(
            driver.timer(),
            domain::RestTimer {
                remaining: 3,
                running: true
            }
        );

        sleep(1500).await;
        assert_eq!(driver.timer().remaining, 2);

        sleep(2000).await;
        assert_eq!(
            driver.timer(),
            domain::RestTimer {
                remaining: 0,
                running: false
            }
        );

        sleep(5000).await;
        assert_eq!(driver.timer().remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add() {
        let mut driver = RestTimerDriver::new();
        driver.start(3);
        sleep(1500).await;

        driver.add(domain::EXTRA_REST_SECONDS);
        assert_eq!(driver.timer().remaining, 32);

        sleep(1200).await;
        assert_eq!(driver.timer().remaining, 31);
        assert!(driver.timer().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_when_elapsing() {
        let mut driver = RestTimerDriver::new();
        driver.start(1);
        sleep(1000).await;

        driver.add(domain::EXTRA_REST_SECONDS);
        let remaining = driver.timer().remaining;
        assert!(driver.timer().is_running());

        sleep(1500).await;
        assert_eq!(driver.timer().remaining, remaining - 1);
        assert!(driver.timer().is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_keeps_ticking_on_multi_thread_runtime() {
        let mut driver = RestTimerDriver::new();
        driver.start(1);
        sleep(1000).await;

        driver.add(2);
        assert!(driver.timer().is_running());

        sleep(4000).await;
        assert_eq!(
            driver.timer(),
            domain::RestTimer {
                remaining: 0,
                running: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_after_elapsed() {
        let mut driver = RestTimerDriver::new();
        driver.start(1);
        sleep(1500).await;
        assert!(!driver.timer().is_running());

        driver.add(domain::EXTRA_REST_SECONDS);
        assert!(driver.timer().is_running());

        sleep(2200).await;
        assert_eq!(driver.timer().remaining, 28);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart() {
        let mut driver = RestTimerDriver::new();
        driver.start(10);
        sleep(3500).await;
        assert_eq!(driver.timer().remaining, 7);

        driver.start(10);
        sleep(1500).await;
        assert_eq!(driver.timer().remaining, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop() {
        let mut driver = RestTimerDriver::new();
        let mut receiver = driver.subscribe();
        driver.start(domain::DEFAULT_REST_SECONDS);
        sleep(1500).await;

        driver.stop();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), domain::RestTimer::default());

        sleep(5000).await;
        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop() {
        let mut driver = RestTimerDriver::new();
        driver.start(domain::DEFAULT_REST_SECONDS);
        let receiver = driver.subscribe();

        drop(driver);
        sleep(1500).await;

        assert!(receiver.has_changed().is_err());
    }
}
