//! Timer-driven metrics polling with exponential backoff.
//!
//! A [`PollingService`] runs one fetch loop per instance: fetch, notify
//! subscribers, sleep for the configured interval, repeat. Consecutive
//! failures back off exponentially; once the retry ceiling is exceeded the
//! loop surfaces a [`PollEvent::Failed`] and stops itself. Instances are
//! independent; there is no coordination between pollers beyond each one's
//! own start/stop.

use crate::adaptor::{ContainerAdaptor, ContainerGateway};
use crate::config::polling::PollingConfig;
use crate::errors::{Result, UiError};
use crate::models::{DashboardMetrics, TimeRange};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Ceiling on any single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Where the poller gets its metrics from.
pub trait MetricsSource: Send + Sync + 'static {
    /// Fetches the current metrics reading.
    fn fetch(&self) -> impl Future<Output = Result<DashboardMetrics>> + Send;
}

/// Source backed by the adaptor's cache-bypassing metrics fetch.
pub struct AdaptorMetricsSource<G> {
    adaptor: Arc<ContainerAdaptor<G>>,
    container_id: i64,
    range: TimeRange,
}

impl<G> AdaptorMetricsSource<G> {
    /// Creates a source polling one container over one time range.
    pub const fn new(adaptor: Arc<ContainerAdaptor<G>>, container_id: i64, range: TimeRange) -> Self {
        Self {
            adaptor,
            container_id,
            range,
        }
    }
}

impl<G: ContainerGateway + 'static> MetricsSource for AdaptorMetricsSource<G> {
    async fn fetch(&self) -> Result<DashboardMetrics> {
        self.adaptor
            .fresh_metrics(self.container_id, self.range)
            .await
    }
}

/// Event delivered to poll subscribers.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A fetch succeeded
    Metrics(DashboardMetrics),
    /// The retry ceiling was exceeded and the poller stopped
    Failed(UiError),
}

/// Handle identifying one poll subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&PollEvent) + Send + Sync>;

#[derive(Default)]
struct SubscriberList {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

/// Timer-driven repeated-fetch service with backoff-on-failure.
pub struct PollingService {
    config: PollingConfig,
    subscribers: Arc<Mutex<SubscriberList>>,
    active: Arc<AtomicBool>,
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl PollingService {
    /// Creates a stopped service with the given settings.
    #[must_use]
    pub fn new(config: PollingConfig) -> Self {
        Self {
            config,
            subscribers: Arc::new(Mutex::new(SubscriberList::default())),
            active: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Registers a callback for poll events; returns the removal handle.
    pub fn subscribe(&self, subscriber: impl Fn(&PollEvent) + Send + Sync + 'static) -> SubscriptionId {
        let mut list = self.subscribers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let id = SubscriptionId(list.next_id);
        list.next_id += 1;
        list.entries.push((id, Box::new(subscriber)));
        id
    }

    /// Removes one subscriber; returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut list = self.subscribers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = list.entries.len();
        list.entries.retain(|(entry_id, _)| *entry_id != id);
        list.entries.len() != before
    }

    /// Whether the fetch loop is currently running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts the fetch loop against `source`. No-op if already polling.
    ///
    /// The first fetch happens immediately; subsequent fetches follow the
    /// configured interval, or the backoff schedule after failures.
    pub fn start<S: MetricsSource>(&mut self, source: S) {
        if self.is_polling() {
            debug!("poll start ignored; already polling");
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let subscribers = Arc::clone(&self.subscribers);
        // Fresh flag per run so a task outliving `stop` cannot clobber the
        // state of a later run.
        let active = Arc::new(AtomicBool::new(true));
        self.active = Arc::clone(&active);
        let config = self.config;

        let handle = tokio::spawn(async move {
            let mut retries: u32 = 0;
            loop {
                match source.fetch().await {
                    Ok(metrics) => {
                        retries = 0;
                        notify(&subscribers, &PollEvent::Metrics(metrics));
                    }
                    Err(e) => {
                        retries += 1;
                        if retries > config.max_retries {
                            warn!(error = %e, retries, "poll retry ceiling exceeded; stopping");
                            notify(&subscribers, &PollEvent::Failed(UiError::classify(&e)));
                            break;
                        }
                        debug!(error = %e, retry = retries, "poll fetch failed; backing off");
                    }
                }

                let delay = if retries == 0 {
                    config.interval
                } else {
                    backoff_delay(config.backoff_base, retries)
                };

                tokio::select! {
                    _ = stop_rx.changed() => break,
                    () = sleep(delay) => {}
                }
            }
            active.store(false, Ordering::SeqCst);
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        info!("metrics polling started");
    }

    /// Stops the fetch loop. No further fetches are scheduled after this.
    ///
    /// A fetch already in flight is allowed to finish; its result is still
    /// delivered, matching the best-effort cancellation the console needs.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            info!("metrics polling stopped");
        }
        self.active.store(false, Ordering::SeqCst);
        self.handle.take();
    }
}

impl Drop for PollingService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn notify(subscribers: &Arc<Mutex<SubscriberList>>, event: &PollEvent) {
    let list = subscribers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for (_, subscriber) in &list.entries {
        subscriber(event);
    }
}

/// Delay before retry number `attempt` (1-based): base doubled per failure,
/// capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(2_u32.saturating_pow(exponent)).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::sample_metrics;
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail_first: usize,
    }

    impl MetricsSource for CountingSource {
        async fn fetch(&self) -> Result<DashboardMetrics> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(Error::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(sample_metrics(22.0))
            }
        }
    }

    fn counting_source(fail_first: usize) -> (CountingSource, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingSource {
                calls: Arc::clone(&calls),
                fail_first,
            },
            calls,
        )
    }

    fn test_config() -> PollingConfig {
        PollingConfig {
            interval: Duration::from_secs(30),
            backoff_base: Duration::from_secs(1),
            max_retries: 2,
        }
    }

    #[test]
    fn test_backoff_delay_doubles_and_caps() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
        assert_eq!(backoff_delay(base, 30), MAX_BACKOFF);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_fetches_on_each_interval() {
        let (source, calls) = counting_source(0);
        let mut service = PollingService::new(test_config());
        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = Arc::clone(&events);
        service.subscribe(move |event| {
            if matches!(event, PollEvent::Metrics(_)) {
                events_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        service.start(source);
        tokio::time::sleep(Duration::from_secs(65)).await;

        let fetched = calls.load(Ordering::SeqCst);
        assert!(fetched >= 2, "expected repeated fetches, got {fetched}");
        assert_eq!(events.load(Ordering::SeqCst), fetched);
        assert!(service.is_polling());
        service.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_fetches() {
        let (source, calls) = counting_source(0);
        let mut service = PollingService::new(test_config());

        service.start(source);
        tokio::time::sleep(Duration::from_secs(1)).await;
        service.stop();
        let after_stop = calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
        assert!(!service.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_ceiling_stops_and_surfaces_error() {
        let (source, calls) = counting_source(usize::MAX);
        let mut service = PollingService::new(test_config());
        let failed = Arc::new(AtomicUsize::new(0));
        let failed_clone = Arc::clone(&failed);
        service.subscribe(move |event| {
            if matches!(event, PollEvent::Failed(_)) {
                failed_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        service.start(source);
        // Failures at t=0, t=1, t=3 (backoff 1s then 2s), then give up.
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(failed.load(Ordering::SeqCst), 1);
        assert!(!service.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_retry_count() {
        let (source, calls) = counting_source(1);
        let mut service = PollingService::new(test_config());
        let metrics_events = Arc::new(AtomicUsize::new(0));
        let metrics_clone = Arc::clone(&metrics_events);
        service.subscribe(move |event| {
            if matches!(event, PollEvent::Metrics(_)) {
                metrics_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        service.start(source);
        // Failure at t=0 (retry 1), success at t=1, then normal cadence.
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(metrics_events.load(Ordering::SeqCst), 1);
        assert!(service.is_polling());
        service.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribed_callback_stops_receiving() {
        let (source, _calls) = counting_source(0);
        let mut service = PollingService::new(test_config());
        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = Arc::clone(&events);
        let id = service.subscribe(move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        });

        service.start(source);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let before = events.load(Ordering::SeqCst);
        assert!(before >= 1);

        assert!(service.unsubscribe(id));
        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(events.load(Ordering::SeqCst), before);
        service.stop();
    }
}
