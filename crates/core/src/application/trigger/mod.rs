//! Job Trigger - wall-clock daily dispatch of background jobs
//!
//! Each registered job gets its own slot (tokio task) that sleeps until the
//! next occurrence of its configured time of day in the deployment zone.
//! Missed ticks and clock changes are not compensated. An optional one-shot
//! run fires every registered job once shortly after start (non-production
//! verification).

pub mod constants;
mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::port::TimeProvider;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use constants::STOP_GRACE_PERIOD;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Background work the trigger can fire
///
/// Runs are fire-and-forget: failures are logged by the job itself.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self);
}

/// Next wall-clock occurrence of `at` strictly after `now`
pub fn next_fire(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

fn until(now: NaiveDateTime, target: NaiveDateTime) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

struct DailySlot {
    at: NaiveTime,
    job: Arc<dyn ScheduledJob>,
}

/// Trigger table (built before `start`)
pub struct JobTrigger {
    time_provider: Arc<dyn TimeProvider>,
    slots: Vec<DailySlot>,
    startup_delay: Option<Duration>,
    grace: Duration,
}

impl JobTrigger {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            slots: Vec::new(),
            startup_delay: None,
            grace: STOP_GRACE_PERIOD,
        }
    }

    /// Fire `job` every day at `at` (local wall clock)
    pub fn daily(mut self, at: NaiveTime, job: Arc<dyn ScheduledJob>) -> Self {
        self.slots.push(DailySlot { at, job });
        self
    }

    /// Also fire every registered job once, `delay` after start
    pub fn with_startup_run(mut self, delay: Duration) -> Self {
        self.startup_delay = Some(delay);
        self
    }

    /// Total time `stop()` waits for busy slots before aborting them
    pub fn stop_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Spawn one task per slot (plus the startup run, if configured)
    pub fn start(self) -> RunningTrigger {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let mut handles = Vec::with_capacity(self.slots.len() + 1);

        if let Some(delay) = self.startup_delay {
            let jobs: Vec<Arc<dyn ScheduledJob>> =
                self.slots.iter().map(|slot| Arc::clone(&slot.job)).collect();
            let token = shutdown_rx.clone();
            handles.push((
                "startup".to_string(),
                tokio::spawn(run_startup(jobs, delay, token)),
            ));
        }

        for slot in self.slots {
            let name = slot.job.name().to_string();
            info!(job = %name, at = %slot.at.format("%H:%M"), "Daily trigger registered");
            let token = shutdown_rx.clone();
            let time_provider = Arc::clone(&self.time_provider);
            handles.push((name, tokio::spawn(run_daily(slot, time_provider, token))));
        }

        RunningTrigger {
            shutdown: shutdown_tx,
            handles,
            grace: self.grace,
        }
    }
}

async fn run_startup(
    jobs: Vec<Arc<dyn ScheduledJob>>,
    delay: Duration,
    mut shutdown: ShutdownToken,
) {
    tokio::select! {
        _ = sleep(delay) => {},
        _ = shutdown.wait() => return,
    }

    info!(jobs = jobs.len(), "Startup verification run");
    futures::future::join_all(jobs.iter().map(|job| job.run())).await;
}

async fn run_daily(
    slot: DailySlot,
    time_provider: Arc<dyn TimeProvider>,
    mut shutdown: ShutdownToken,
) {
    let name = slot.job.name().to_string();
    let mut last_target: Option<NaiveDateTime> = None;

    loop {
        if shutdown.is_shutdown() {
            break;
        }

        let now = time_provider.local_now();
        let mut target = next_fire(now, slot.at);
        // A wake-up slightly before the target must not fire the same tick twice
        if last_target == Some(target) {
            target += ChronoDuration::days(1);
        }
        debug!(job = %name, next = %target, "Next trigger scheduled");

        tokio::select! {
            _ = sleep(until(now, target)) => {},
            _ = shutdown.wait() => break,
        }

        last_target = Some(target);
        info!(job = %name, "Trigger fired");
        slot.job.run().await;
    }

    debug!(job = %name, "Trigger slot stopped");
}

/// Handle to the started trigger; owned by the process entry point
pub struct RunningTrigger {
    shutdown: ShutdownSender,
    handles: Vec<(String, JoinHandle<()>)>,
    grace: Duration,
}

impl RunningTrigger {
    /// Signal every slot and wait for it, aborting slots still busy after the grace period
    ///
    /// The grace period is one deadline shared by all slots.
    pub async fn stop(self) {
        self.shutdown.shutdown();
        let deadline = Instant::now() + self.grace;

        for (name, mut handle) in self.handles {
            match timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(job = %name, error = %e, "Trigger slot ended abnormally"),
                Err(_) => {
                    warn!(job = %name, "Trigger slot still busy after grace period, aborting");
                    handle.abort();
                }
            }
        }
        info!("Job trigger stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        name: &'static str,
        runs: AtomicUsize,
    }

    impl CountingJob {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                runs: AtomicUsize::new(0),
            })
        }

        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScheduledJob for CountingJob {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    struct BusyJob {
        name: &'static str,
    }

    #[async_trait]
    impl ScheduledJob for BusyJob {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) {
            sleep(Duration::from_secs(3600)).await;
        }
    }

    #[test]
    fn test_next_fire_later_today() {
        assert_eq!(next_fire(at(5, 0, 0, 0), time(6, 0)), at(6, 0, 0, 0));
    }

    #[test]
    fn test_next_fire_rolls_over_when_passed_or_equal() {
        let tomorrow_six = at(6, 0, 0, 0) + ChronoDuration::days(1);
        assert_eq!(next_fire(at(7, 0, 0, 0), time(6, 0)), tomorrow_six);
        assert_eq!(next_fire(at(6, 0, 0, 0), time(6, 0)), tomorrow_six);
    }

    #[tokio::test]
    async fn test_startup_run_fires_every_job_once() {
        let clock = Arc::new(FixedTimeProvider::new(at(12, 0, 0, 0)));
        let reminder = CountingJob::new("reminder");
        let audit = CountingJob::new("audit");

        let running = JobTrigger::new(clock)
            .daily(time(6, 0), reminder.clone())
            .daily(time(6, 30), audit.clone())
            .with_startup_run(Duration::from_millis(10))
            .start();

        sleep(Duration::from_millis(200)).await;
        running.stop().await;

        assert_eq!(reminder.runs(), 1);
        assert_eq!(audit.runs(), 1);
    }

    #[tokio::test]
    async fn test_daily_slot_fires_once_per_tick() {
        // 50ms before the trigger time; the frozen clock never advances
        let clock = Arc::new(FixedTimeProvider::new(at(5, 59, 59, 950)));
        let reminder = CountingJob::new("reminder");

        let running = JobTrigger::new(clock)
            .daily(time(6, 0), reminder.clone())
            .start();

        sleep(Duration::from_millis(300)).await;
        running.stop().await;

        assert_eq!(reminder.runs(), 1);
    }

    #[tokio::test]
    async fn test_stop_ends_idle_slots_without_running() {
        let clock = Arc::new(FixedTimeProvider::new(at(12, 0, 0, 0)));
        let reminder = CountingJob::new("reminder");

        let running = JobTrigger::new(clock)
            .daily(time(6, 0), reminder.clone())
            .with_startup_run(Duration::from_secs(3600))
            .start();

        tokio::time::timeout(Duration::from_secs(1), running.stop())
            .await
            .expect("stop should not wait for pending sleeps");

        assert_eq!(reminder.runs(), 0);
    }

    #[tokio::test]
    async fn test_stop_grace_is_shared_by_busy_slots() {
        let clock = Arc::new(FixedTimeProvider::new(at(5, 59, 59, 950)));
        let grace = Duration::from_millis(300);

        let running = JobTrigger::new(clock)
            .daily(time(6, 0), Arc::new(BusyJob { name: "reminder" }))
            .daily(time(6, 0), Arc::new(BusyJob { name: "audit" }))
            .stop_grace(grace)
            .start();

        // both slots fire and stay busy
        sleep(Duration::from_millis(150)).await;
        let started = Instant::now();
        tokio::time::timeout(Duration::from_secs(2), running.stop())
            .await
            .expect("busy slots should be aborted");

        let elapsed = started.elapsed();
        assert!(elapsed >= grace, "{elapsed:?}");
        assert!(elapsed < grace * 2, "{elapsed:?}");
    }
}
