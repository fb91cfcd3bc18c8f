//! Settings page view model.
//!
//! Edit-mode toggling with a snapshot taken at edit start, shallow dirty
//! tracking against that snapshot, field-level validation, and the
//! save/cancel flow.

use crate::adaptor::{ContainerAdaptor, ContainerGateway};
use crate::errors::UiError;
use crate::models::{ActorType, ContainerSettings, Location, NewActivityEntry};
use crate::observer::{ListenerId, ListenerSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Purposes the backend accepts for a container.
pub const ALLOWED_PURPOSES: &[&str] = &["development", "education", "production", "research"];

/// Maximum length of the free-form notes field.
pub const MAX_NOTES_LEN: usize = 1000;

/// Validates a settings block field by field.
///
/// Returns a map from field name to the message shown next to that field;
/// empty means the block is valid.
#[must_use]
pub fn validate_settings(settings: &ContainerSettings) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if settings.tenant_id <= 0 {
        errors.insert("tenant_id".to_string(), "Invalid tenant ID".to_string());
    }
    if !ALLOWED_PURPOSES.contains(&settings.purpose.as_str()) {
        errors.insert(
            "purpose".to_string(),
            format!("Purpose must be one of: {}", ALLOWED_PURPOSES.join(", ")),
        );
    }
    if settings.notes.chars().count() > MAX_NOTES_LEN {
        errors.insert(
            "notes".to_string(),
            format!("Notes must be {MAX_NOTES_LEN} characters or fewer"),
        );
    }
    if settings.location.city.trim().is_empty() || settings.location.country.trim().is_empty() {
        errors.insert(
            "location".to_string(),
            "Location requires city and country".to_string(),
        );
    }

    errors
}

/// Observable state of the settings page.
#[derive(Debug)]
pub struct SettingsState {
    /// Settings as currently shown (and edited)
    pub settings: ContainerSettings,
    /// Copy taken when edit mode was entered; `None` outside edit mode
    pub snapshot: Option<ContainerSettings>,
    /// Whether edit mode is active
    pub editing: bool,
    /// Whether a save is in flight
    pub saving: bool,
    /// Field name to validation message for the current edit
    pub validation_errors: BTreeMap<String, String>,
    /// Last save/load failure
    pub error: Option<UiError>,
}

/// View model backing the settings page.
pub struct ContainerSettingsViewModel<G> {
    adaptor: Arc<ContainerAdaptor<G>>,
    container_id: i64,
    state: SettingsState,
    listeners: ListenerSet,
}

impl<G: ContainerGateway> ContainerSettingsViewModel<G> {
    /// Creates a view model seeded with the container's current settings.
    pub fn new(
        adaptor: Arc<ContainerAdaptor<G>>,
        container_id: i64,
        settings: ContainerSettings,
    ) -> Self {
        Self {
            adaptor,
            container_id,
            state: SettingsState {
                settings,
                snapshot: None,
                editing: false,
                saving: false,
                validation_errors: BTreeMap::new(),
                error: None,
            },
            listeners: ListenerSet::new(),
        }
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &SettingsState {
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

    /// Enters edit mode, snapshotting the current settings. No-op if editing.
    pub fn begin_edit(&mut self) {
        if self.state.editing {
            return;
        }
        self.state.snapshot = Some(self.state.settings.clone());
        self.state.editing = true;
        self.state.validation_errors.clear();
        self.state.error = None;
        self.listeners.notify();
    }

    /// Leaves edit mode, restoring the snapshot taken at edit start.
    pub fn cancel_edit(&mut self) {
        if !self.state.editing {
            return;
        }
        if let Some(snapshot) = self.state.snapshot.take() {
            self.state.settings = snapshot;
        }
        self.state.editing = false;
        self.state.validation_errors.clear();
        self.listeners.notify();
    }

    /// Whether the edited settings differ from the edit-start snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| *snapshot != self.state.settings)
    }

    /// Sets the tenant id field.
    pub fn set_tenant_id(&mut self, tenant_id: i64) {
        self.state.settings.tenant_id = tenant_id;
        self.listeners.notify();
    }

    /// Sets the purpose field.
    pub fn set_purpose(&mut self, purpose: impl Into<String>) {
        self.state.settings.purpose = purpose.into();
        self.listeners.notify();
    }

    /// Sets the notes field.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.state.settings.notes = notes.into();
        self.listeners.notify();
    }

    /// Sets the location fields.
    pub fn set_location(&mut self, location: Location) {
        self.state.settings.location = location;
        self.listeners.notify();
    }

    /// Sets the feature flags.
    pub fn set_flags(&mut self, shadow: bool, robotics_sim: bool, ecosystem: bool) {
        self.state.settings.has_shadow_service = shadow;
        self.state.settings.robotics_simulation_enabled = robotics_sim;
        self.state.settings.ecosystem_connected = ecosystem;
        self.listeners.notify();
    }

    /// Runs validation and stores the per-field messages.
    ///
    /// Returns whether the current settings are valid.
    pub fn validate(&mut self) -> bool {
        self.state.validation_errors = validate_settings(&self.state.settings);
        self.listeners.notify();
        self.state.validation_errors.is_empty()
    }

    /// Validates and saves the edited settings, then leaves edit mode.
    ///
    /// No-op outside edit mode. On validation failure nothing is sent and
    /// the per-field messages are stored. On save failure the classified
    /// error is stored and edit mode stays active so the user's input is not
    /// lost. A successful save logs a non-critical activity entry.
    pub async fn save(&mut self) {
        if !self.state.editing {
            return;
        }
        if !self.validate() {
            return;
        }
        self.state.saving = true;
        self.state.error = None;
        self.listeners.notify();

        let result = self
            .adaptor
            .update_settings(self.container_id, &self.state.settings)
            .await;
        match result {
            Ok(container) => {
                info!(container_id = self.container_id, "settings saved");
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
                self.state.settings = container.settings;
                self.state.snapshot = None;
                self.state.editing = false;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        self.state.saving = false;
        self.listeners.notify();
    }

    /// Reloads settings from the backend, discarding any edit in progress.
    pub async fn reload(&mut self) {
        match self.adaptor.overview(self.container_id).await {
            Ok(overview) => {
                self.state.settings = overview.settings;
                self.state.snapshot = None;
                self.state.editing = false;
                self.state.error = None;
            }
            Err(e) => {
                self.state.error = Some(UiError::classify(&e));
            }
        }
        self.listeners.notify();
    }
}
