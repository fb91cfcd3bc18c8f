//! Container detail page view model.
//!
//! Orchestrates the initial parallel load of everything the detail page
//! shows, tab and time-range selection, the settings save flow, and the
//! metrics polling lifecycle (start on mount, stop on dispose).

use crate::adaptor::{ContainerAdaptor, ContainerGateway};
use crate::config::polling::PollingConfig;
use crate::errors::{UiError, UiErrorKind};
use crate::models::{
    ActorType, ContainerOverview, ContainerSettings, CropSummaryRow, DashboardMetrics,
    EnvironmentLinks, NewActivityEntry, TimeRange,
};
use crate::observer::{ListenerId, ListenerSet};
use crate::polling::{AdaptorMetricsSource, PollEvent, PollingService};
use crate::viewmodels::settings::validate_settings;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Tabs on the container detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    /// Overview and crop summary
    #[default]
    Overview,
    /// Metric cards and charts
    Metrics,
    /// Activity log
    Activity,
    /// Settings editor
    Settings,
}

/// Observable state of the detail page.
#[derive(Debug, Default)]
pub struct DetailState {
    /// Loaded container overview
    pub overview: Option<ContainerOverview>,
    /// Per-seed-type crop summary rows
    pub crop_summary: Vec<CropSummaryRow>,
    /// Historical metric snapshots for the selected range
    pub snapshots: Vec<DashboardMetrics>,
    /// Environment links
    pub environment_links: Option<EnvironmentLinks>,
    /// Latest reading delivered by the poller
    pub latest_metrics: Option<DashboardMetrics>,
    /// Active tab
    pub active_tab: DetailTab,
    /// Selected metrics time range
    pub time_range: TimeRange,
    /// Whether the initial load is in flight
    pub loading: bool,
    /// Last load/save failure
    pub error: Option<UiError>,
    /// Terminal polling failure, if the poller gave up
    pub poll_error: Option<UiError>,
}

/// View model backing the container detail page.
pub struct ContainerDetailViewModel<G> {
    adaptor: Arc<ContainerAdaptor<G>>,
    container_id: i64,
    state: DetailState,
    listeners: ListenerSet,
    poller: PollingService,
    poll_rx: mpsc::UnboundedReceiver<PollEvent>,
}

impl<G: ContainerGateway + 'static> ContainerDetailViewModel<G> {
    /// Creates a view model for one container's detail page.
    pub fn new(
        adaptor: Arc<ContainerAdaptor<G>>,
        container_id: i64,
        polling: PollingConfig,
    ) -> Self {
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();
        let poller = PollingService::new(polling);
        poller.subscribe(move |event| {
            let _ = poll_tx.send(event.clone());
        });

        Self {
            adaptor,
            container_id,
            state: DetailState::default(),
            listeners: ListenerSet::new(),
            poller,
            poll_rx,
        }
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Removes a change listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Loads everything the page shows, fetching the four sections in
    /// parallel. Any failure lands in the error state; previously loaded
    /// data is kept.
    pub async fn load(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.listeners.notify();

        let id = self.container_id;
        let range = self.state.time_range;
        let (overview, crops, snapshots, links) = tokio::join!(
            self.adaptor.overview(id),
            self.adaptor.crop_summary(id),
            self.adaptor.metric_snapshots(id, range),
            self.adaptor.environment_links(id),
        );

        match (overview, crops, snapshots, links) {
            (Ok(overview), Ok(crops), Ok(snapshots), Ok(links)) => {
                self.state.overview = Some(overview);
                self.state.crop_summary = crops;
                self.state.snapshots = snapshots;
                self.state.environment_links = Some(links);
            }
            (overview, crops, snapshots, links) => {
                let first_error = overview
                    .err()
                    .or_else(|| crops.err())
                    .or_else(|| snapshots.err())
                    .or_else(|| links.err());
                if let Some(e) = first_error {
                    self.state.error = Some(UiError::classify(&e));
                }
            }
        }
        self.state.loading = false;
        self.listeners.notify();
    }

    /// Switches the active tab.
    pub fn select_tab(&mut self, tab: DetailTab) {
        if self.state.active_tab != tab {
            self.state.active_tab = tab;
            self.listeners.notify();
        }
    }

    /// Switches the metrics time range, reloads the snapshot series, and
    /// repoints a running poller at the new range.
    pub async fn select_time_range(&mut self, range: TimeRange) {
        if self.state.time_range == range {
            return;
        }
        self.state.time_range = range;
        match self
            .adaptor
            .metric_snapshots(self.container_id, range)
            .await
        {
            Ok(snapshots) => {
                self.state.snapshots = snapshots;
                self.state.error = None;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        // A running poller captured the old range in its source.
        if self.is_polling() {
            self.stop_polling();
            self.start_polling();
        }
        self.listeners.notify();
    }

    /// Validates and saves a settings block, logs the change, and reloads.
    ///
    /// On validation failure nothing is sent; the first field message is
    /// stored as a validation error.
    pub async fn save_settings(&mut self, settings: ContainerSettings) {
        let field_errors = validate_settings(&settings);
        if let Some((_, message)) = field_errors.into_iter().next() {
            self.state.error = Some(UiError {
                kind: UiErrorKind::Validation,
                message,
                retryable: false,
            });
            self.listeners.notify();
            return;
        }

        match self
            .adaptor
            .update_settings(self.container_id, &settings)
            .await
        {
            Ok(container) => {
                info!(container_id = self.container_id, "settings saved from detail page");
                self.adaptor
                    .log_activity(
                        self.container_id,
                        &NewActivityEntry {
                            actor_type: ActorType::User,
                            actor_id: "console".to_string(),
                            action_type: "settings_changed".to_string(),
                            description: format!("Settings updated for {}", container.name),
                        },
                    )
                    .await;
                self.load().await;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
                self.listeners.notify();
            }
        }
    }

    /// Starts metrics polling for this container. No-op if already polling.
    pub fn start_polling(&mut self) {
        let source = AdaptorMetricsSource::new(
            Arc::clone(&self.adaptor),
            self.container_id,
            self.state.time_range,
        );
        self.poller.start(source);
    }

    /// Stops metrics polling.
    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    /// Whether the metrics poller is currently running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    /// Drains queued poll events into state; notifies listeners if any
    /// arrived. The view layer calls this from its own scheduling point.
    pub fn drain_poll_events(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.poll_rx.try_recv() {
            match event {
                PollEvent::Metrics(metrics) => {
                    self.state.latest_metrics = Some(metrics);
                    self.state.poll_error = None;
                }
                PollEvent::Failed(error) => {
                    debug!("metrics poller gave up: {}", error.message);
                    self.state.poll_error = Some(error);
                }
            }
            changed = true;
        }
        if changed {
            self.listeners.notify();
        }
    }

    /// Tears the page down: stops polling and drops queued events.
    pub fn dispose(&mut self) {
        self.stop_polling();
        while self.poll_rx.try_recv().is_ok() {}
    }
}
