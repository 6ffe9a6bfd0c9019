//! Background timers: periodic data refresh and the status label ticker.

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::dashboard::{Dashboard, RefreshPolicy};

pub const DEFAULT_REFRESH_EVERY: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_STATUS_EVERY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub refresh_every: Duration,
    pub status_every: Duration,
    pub policy: RefreshPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_every: DEFAULT_REFRESH_EVERY,
            status_every: DEFAULT_STATUS_EVERY,
            policy: RefreshPolicy::default(),
        }
    }
}

pub struct Scheduler;

impl Scheduler {
    /// Spawn both timers on the current tokio runtime.
    ///
    /// The data refresh waits one full period before its first run; the
    /// initial load is the caller's job. The status ticker publishes right away.
    pub fn start(dashboard: Arc<Dashboard>, config: SchedulerConfig) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(dashboard.status_line(Utc::now()));

        let data = tokio::spawn(data_refresh_loop(
            dashboard.clone(),
            config.refresh_every,
            config.policy,
            cancel.clone(),
        ));
        let status = tokio::spawn(status_loop(dashboard, config.status_every, status_tx, cancel.clone()));

        tracing::info!(
            "Scheduler started: data refresh every {:?} ({}), status every {:?}",
            config.refresh_every,
            config.policy,
            config.status_every
        );

        SchedulerHandle {
            cancel,
            status_rx,
            tasks: vec![data, status],
        }
    }
}

/// Owns the running timers. Dropping it stops them; [`SchedulerHandle::shutdown`]
/// also waits for them to finish.
#[derive(Debug)]
pub struct SchedulerHandle {
    cancel: CancellationToken,
    status_rx: watch::Receiver<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Latest status line, updated by the ticker.
    pub fn status(&self) -> watch::Receiver<String> {
        self.status_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub async fn shutdown(mut self) {
        self.cancel.cancel();

        for task in std::mem::take(&mut self.tasks) {
            if let Err(err) = task.await {
                tracing::warn!("Scheduler task ended abnormally: {err}");
            }
        }

        tracing::info!("Scheduler stopped");
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn ticker(every: Duration) -> Interval {
    let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn data_refresh_loop(
    dashboard: Arc<Dashboard>,
    every: Duration,
    policy: RefreshPolicy,
    cancel: CancellationToken,
) {
    let mut interval = ticker(every);
    // first tick is immediate
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            summary = dashboard.scheduled_refresh(policy) => {
                if !summary.failed.is_empty() {
                    tracing::warn!("Scheduled refresh failed for: {:?}", summary.failed);
                }
            }
        }
    }

    tracing::debug!("Data refresh loop exited");
}

async fn status_loop(
    dashboard: Arc<Dashboard>,
    every: Duration,
    status_tx: watch::Sender<String>,
    cancel: CancellationToken,
) {
    let mut interval = ticker(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let line = dashboard.status_line(Utc::now());
        status_tx.send_if_modified(|current| {
            if *current == line {
                false
            } else {
                *current = line;
                true
            }
        });
    }

    tracing::debug!("Status loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{city::CityId, locale::Locale, store::AppState, testing::FakeApi};

    fn dashboard(api: Arc<FakeApi>) -> Arc<Dashboard> {
        Arc::new(Dashboard::new(
            api,
            Arc::new(AppState::new()),
            CityId::default_set().to_vec(),
            Locale::En,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn data_refresh_fires_each_period_and_survives_failures() {
        let api = Arc::new(FakeApi::default());
        let dash = dashboard(api.clone());
        let handle = Scheduler::start(dash.clone(), SchedulerConfig::default());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.current_calls(), 0, "no refresh before the first period");

        tokio::time::sleep(DEFAULT_REFRESH_EVERY).await;
        assert_eq!(api.current_calls(), 5);

        for city in CityId::default_set() {
            api.set_failing(city.as_str(), true);
        }
        tokio::time::sleep(DEFAULT_REFRESH_EVERY).await;
        assert_eq!(api.current_calls(), 10);
        assert!(handle.is_running());

        for city in CityId::default_set() {
            api.set_failing(city.as_str(), false);
        }
        api.set_temperature(9.0);
        tokio::time::sleep(DEFAULT_REFRESH_EVERY).await;
        assert_eq!(api.current_calls(), 15);
        assert_eq!(dash.state().snapshot(CityId::Zadar).unwrap().temperature_c, 9.0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn status_moves_from_loading_to_just_now() {
        let api = Arc::new(FakeApi::failing_for(&["dubrovnik"]));
        let dash = dashboard(api);
        let handle = Scheduler::start(dash.clone(), SchedulerConfig::default());

        let mut status = handle.status();
        assert_eq!(*status.borrow(), "Loading...");

        let summary = dash.refresh_all().await;
        assert_eq!(summary.refreshed.len(), 4);

        status.changed().await.unwrap();
        assert_eq!(*status.borrow(), "Last refresh: just now");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn last_viewed_timer_keeps_refreshing_before_any_view() {
        let api = Arc::new(FakeApi::default());
        let dash = dashboard(api.clone());
        dash.refresh_all().await;
        assert_eq!(api.current_calls(), 5);

        let config = SchedulerConfig {
            policy: RefreshPolicy::LastViewed,
            ..SchedulerConfig::default()
        };
        let handle = Scheduler::start(dash.clone(), config);

        tokio::time::sleep(DEFAULT_REFRESH_EVERY * 2 + Duration::from_secs(5)).await;
        assert_eq!(api.current_calls(), 15, "two ticks, each covering all cities");

        dash.load_weather(CityId::Split).await.unwrap();
        assert_eq!(api.current_calls(), 16);

        tokio::time::sleep(DEFAULT_REFRESH_EVERY).await;
        assert_eq!(api.current_calls(), 17, "only the viewed city once one exists");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_both_timers() {
        let api = Arc::new(FakeApi::default());
        let dash = dashboard(api.clone());
        let config = SchedulerConfig {
            refresh_every: Duration::from_secs(10),
            ..SchedulerConfig::default()
        };

        let handle = Scheduler::start(dash, config);
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(api.current_calls(), 5);

        let mut status = handle.status();
        handle.shutdown().await;
        status.borrow_and_update();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.current_calls(), 5);
        assert!(status.changed().await.is_err(), "status sender should be gone");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let api = Arc::new(FakeApi::default());
        let dash = dashboard(api.clone());
        let config = SchedulerConfig {
            refresh_every: Duration::from_secs(10),
            ..SchedulerConfig::default()
        };

        drop(Scheduler::start(dash, config));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.current_calls(), 0);
    }
}
