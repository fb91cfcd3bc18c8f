//! Container header view model.
//!
//! Holds the identity/status strip shown at the top of every container page
//! and drives the two-step shutdown flow (request, then confirm).

use crate::adaptor::{ContainerAdaptor, ContainerGateway};
use crate::errors::UiError;
use crate::models::{ActorType, ContainerOverview, NewActivityEntry};
use crate::observer::{ListenerId, ListenerSet};
use std::sync::Arc;
use tracing::info;

/// Observable state of the header strip.
#[derive(Debug, Default)]
pub struct HeaderState {
    /// Loaded container overview
    pub overview: Option<ContainerOverview>,
    /// Whether the shutdown confirmation prompt is showing
    pub shutdown_pending: bool,
    /// Whether a shutdown request is in flight
    pub shutting_down: bool,
    /// Last failure
    pub error: Option<UiError>,
}

/// View model backing the container header.
pub struct ContainerHeaderViewModel<G> {
    adaptor: Arc<ContainerAdaptor<G>>,
    container_id: i64,
    state: HeaderState,
    listeners: ListenerSet,
}

impl<G: ContainerGateway> ContainerHeaderViewModel<G> {
    /// Creates a view model for one container's header.
    pub fn new(adaptor: Arc<ContainerAdaptor<G>>, container_id: i64) -> Self {
        Self {
            adaptor,
            container_id,
            state: HeaderState::default(),
            listeners: ListenerSet::new(),
        }
    }

    /// Current header state.
    #[must_use]
    pub const fn state(&self) -> &HeaderState {
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

    /// Loads (or refreshes) the overview shown in the header.
    pub async fn load(&mut self) {
        match self.adaptor.overview(self.container_id).await {
            Ok(overview) => {
                self.state.overview = Some(overview);
                self.state.error = None;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        self.listeners.notify();
    }

    /// Shows the shutdown confirmation prompt.
    pub fn request_shutdown(&mut self) {
        self.state.shutdown_pending = true;
        self.listeners.notify();
    }

    /// Dismisses the shutdown confirmation prompt.
    pub fn cancel_shutdown(&mut self) {
        self.state.shutdown_pending = false;
        self.listeners.notify();
    }

    /// Executes the confirmed shutdown and refreshes the header.
    ///
    /// No-op unless [`Self::request_shutdown`] was called first; the view
    /// cannot trigger a shutdown without the confirmation step.
    pub async fn confirm_shutdown(&mut self) {
        if !self.state.shutdown_pending {
            return;
        }
        self.state.shutdown_pending = false;
        self.state.shutting_down = true;
        self.state.error = None;
        self.listeners.notify();

        match self.adaptor.shutdown(self.container_id).await {
            Ok(container) => {
                info!(container_id = self.container_id, "container shut down");
                self.adaptor
                    .log_activity(
                        self.container_id,
                        &NewActivityEntry {
                            actor_type: ActorType::User,
                            actor_id: "console".to_string(),
                            action_type: "shutdown".to_string(),
                            description: format!("{} shut down", container.name),
                        },
                    )
                    .await;
                // Shutdown invalidated the cached overview; reload it.
                match self.adaptor.overview(self.container_id).await {
                    Ok(overview) => self.state.overview = Some(overview),
                    Err(e) => self.state.error = Some(UiError::classify(&e)),
                }
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        self.state.shutting_down = false;
        self.listeners.notify();
    }
}
