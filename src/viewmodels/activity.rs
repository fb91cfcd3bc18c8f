//! Activity log page view model.
//!
//! Owns the pagination cursor and filter set, groups loaded entries by
//! calendar date for display, and derives summary statistics over the
//! currently loaded page.

use crate::adaptor::{ContainerAdaptor, ContainerGateway};
use crate::errors::UiError;
use crate::models::{ActivityFilter, ActivityLogEntry, ActorType, Page};
use crate::observer::{ListenerId, ListenerSet};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Observable state of the activity page.
#[derive(Debug)]
pub struct ActivityState {
    /// Currently loaded page of entries
    pub page: Page<ActivityLogEntry>,
    /// Active filter and cursor
    pub filter: ActivityFilter,
    /// Whether a load is in flight
    pub loading: bool,
    /// Last load failure
    pub error: Option<UiError>,
}

/// Summary statistics over the loaded entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    /// Total entries matching the filter (across all pages)
    pub total: u64,
    /// Loaded-entry count per action type
    pub by_action: BTreeMap<String, usize>,
    /// Loaded entries dated today
    pub today: usize,
    /// Loaded entries from the last 7 days, averaged per day
    pub week_daily_average: f64,
}

/// View model backing the activity log page.
pub struct ContainerActivityViewModel<G> {
    adaptor: Arc<ContainerAdaptor<G>>,
    container_id: i64,
    state: ActivityState,
    listeners: ListenerSet,
}

impl<G: ContainerGateway> ContainerActivityViewModel<G> {
    /// Creates a view model for one container's activity log.
    pub fn new(adaptor: Arc<ContainerAdaptor<G>>, container_id: i64) -> Self {
        let filter = ActivityFilter::default();
        Self {
            adaptor,
            container_id,
            state: ActivityState {
                page: Page::empty(filter.page_size),
                filter,
                loading: false,
                error: None,
            },
            listeners: ListenerSet::new(),
        }
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &ActivityState {
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

    /// Loads the page the cursor currently points at.
    pub async fn load(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.listeners.notify();

        match self
            .adaptor
            .activity(self.container_id, &self.state.filter)
            .await
        {
            Ok(page) => {
                self.state.page = page;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        self.state.loading = false;
        self.listeners.notify();
    }

    /// Loads a specific 1-based page number.
    pub async fn load_page(&mut self, page: u64) {
        self.state.filter.page = page.max(1);
        self.load().await;
    }

    /// Advances to the next page when one exists.
    pub async fn next_page(&mut self) {
        if self.state.page.has_more {
            let next = self.state.filter.page + 1;
            self.load_page(next).await;
        }
    }

    /// Goes back one page when not already on the first.
    pub async fn prev_page(&mut self) {
        if self.state.filter.page > 1 {
            let prev = self.state.filter.page - 1;
            self.load_page(prev).await;
        }
    }

    /// Applies a new filter set and resets the cursor to page 1.
    pub async fn apply_filter(&mut self, filter: ActivityFilter) {
        self.state.filter = ActivityFilter { page: 1, ..filter };
        self.load().await;
    }

    /// Restricts to one action type, keeping other filters.
    pub async fn filter_by_action(&mut self, action_type: Option<String>) {
        let filter = ActivityFilter {
            action_type,
            ..self.state.filter.clone()
        };
        self.apply_filter(filter).await;
    }

    /// Restricts to one actor type, keeping other filters.
    pub async fn filter_by_actor(&mut self, actor_type: Option<ActorType>) {
        let filter = ActivityFilter {
            actor_type,
            ..self.state.filter.clone()
        };
        self.apply_filter(filter).await;
    }

    /// Restricts to a date range, keeping other filters.
    pub async fn filter_by_date_range(
        &mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) {
        let filter = ActivityFilter {
            from,
            to,
            ..self.state.filter.clone()
        };
        self.apply_filter(filter).await;
    }

    /// Loaded entries grouped by calendar date, newest date first.
    ///
    /// Entries within a date keep their page order (the backend serves
    /// newest first).
    #[must_use]
    pub fn grouped_by_date(&self) -> Vec<(NaiveDate, Vec<&ActivityLogEntry>)> {
        let mut groups: BTreeMap<NaiveDate, Vec<&ActivityLogEntry>> = BTreeMap::new();
        for entry in &self.state.page.items {
            groups
                .entry(entry.timestamp.date_naive())
                .or_default()
                .push(entry);
        }
        groups.into_iter().rev().collect()
    }

    /// Summary statistics over the loaded page, relative to the current time.
    #[must_use]
    pub fn summary(&self) -> ActivitySummary {
        self.summary_at(Utc::now())
    }

    /// Summary statistics relative to an explicit `now` (used by tests).
    #[must_use]
    pub fn summary_at(&self, now: DateTime<Utc>) -> ActivitySummary {
        let today = now.date_naive();
        let week_ago = now - chrono::Duration::days(7);

        let mut by_action: BTreeMap<String, usize> = BTreeMap::new();
        let mut today_count = 0usize;
        let mut week_count = 0usize;
        for entry in &self.state.page.items {
            *by_action.entry(entry.action_type.clone()).or_default() += 1;
            if entry.timestamp.date_naive() == today {
                today_count += 1;
            }
            if entry.timestamp >= week_ago {
                week_count += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let week_daily_average = week_count as f64 / 7.0;

        ActivitySummary {
            total: self.state.page.total,
            by_action,
            today: today_count,
            week_daily_average,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    #![allow(clippy::cast_precision_loss)]
    use super::*;
    use crate::test_utils::{StubGateway, activity_base_time};
    use std::collections::HashSet;

    fn new_vm() -> ContainerActivityViewModel<StubGateway> {
        let adaptor = Arc::new(ContainerAdaptor::new(StubGateway::default()));
        ContainerActivityViewModel::new(adaptor, 1)
    }

    #[tokio::test]
    async fn test_load_populates_first_page() {
        let mut vm = new_vm();
        vm.load().await;

        let state = vm.state();
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(state.page.page, 1);
        assert!(!state.page.items.is_empty());
    }

    #[tokio::test]
    async fn test_second_page_has_disjoint_ids() {
        let mut vm = new_vm();
        vm.apply_filter(ActivityFilter {
            page_size: 5,
            ..ActivityFilter::default()
        })
        .await;
        let first_ids: HashSet<i64> = vm.state().page.items.iter().map(|e| e.id).collect();
        assert_eq!(first_ids.len(), 5);
        assert!(vm.state().page.has_more);

        vm.next_page().await;
        let second_ids: HashSet<i64> = vm.state().page.items.iter().map(|e| e.id).collect();

        assert_eq!(vm.state().filter.page, 2);
        assert!(first_ids.is_disjoint(&second_ids));
    }

    #[tokio::test]
    async fn test_prev_page_stops_at_first() {
        let mut vm = new_vm();
        vm.load().await;
        vm.prev_page().await;
        assert_eq!(vm.state().filter.page, 1);
    }

    #[tokio::test]
    async fn test_action_filter_resets_cursor_and_restricts() {
        let mut vm = new_vm();
        vm.load_page(2).await;
        vm.filter_by_action(Some("settings_changed".to_string()))
            .await;

        let state = vm.state();
        assert_eq!(state.filter.page, 1);
        assert!(
            state
                .page
                .items
                .iter()
                .all(|e| e.action_type == "settings_changed")
        );
    }

    #[tokio::test]
    async fn test_actor_filter_restricts() {
        let mut vm = new_vm();
        vm.filter_by_actor(Some(ActorType::System)).await;
        assert!(
            vm.state()
                .page
                .items
                .iter()
                .all(|e| e.actor_type == ActorType::System)
        );
    }

    #[tokio::test]
    async fn test_date_range_filter_restricts() {
        let mut vm = new_vm();
        let base = activity_base_time();
        vm.filter_by_date_range(Some(base - chrono::Duration::days(1)), Some(base))
            .await;
        assert!(
            vm.state()
                .page
                .items
                .iter()
                .all(|e| e.timestamp >= base - chrono::Duration::days(1) && e.timestamp < base)
        );
    }

    #[tokio::test]
    async fn test_grouping_by_calendar_date_newest_first() {
        let mut vm = new_vm();
        vm.load().await;

        let groups = vm.grouped_by_date();
        assert!(groups.len() > 1);
        for window in groups.windows(2) {
            assert!(window[0].0 > window[1].0);
        }
        let grouped_total: usize = groups.iter().map(|(_, entries)| entries.len()).sum();
        assert_eq!(grouped_total, vm.state().page.items.len());
    }

    #[tokio::test]
    async fn test_summary_counts_and_averages() {
        let mut vm = new_vm();
        vm.load().await;

        let now = activity_base_time();
        let summary = vm.summary_at(now);
        assert_eq!(summary.total, vm.state().page.total);
        let by_action_total: usize = summary.by_action.values().sum();
        assert_eq!(by_action_total, vm.state().page.items.len());
        // Entries are spaced twelve hours apart starting just before `now`,
        // so every loaded entry falls inside the last week.
        assert_eq!(
            summary.week_daily_average,
            vm.state().page.items.len() as f64 / 7.0
        );
    }

    #[tokio::test]
    async fn test_load_failure_classified_into_state() {
        let gateway = StubGateway::default();
        gateway.fail_next("get_activity_logs");
        let adaptor = Arc::new(ContainerAdaptor::new(gateway));
        let mut vm = ContainerActivityViewModel::new(adaptor, 1);

        vm.load().await;
        let error = vm.state().error.as_ref().unwrap();
        assert!(error.retryable);
    }
}
