//! Controller: runs backend requests and applies their outcomes to the state

use std::sync::Arc;

use crate::backend::AdminBackend;
use crate::host::HostContext;
use crate::notice::{Feed, Notice};
use crate::state::{ActionClaim, StateHandle};
use crate::view::{Tab, ViewState};
use crate::ModeratorError;

/// Orchestrates fetches and operator actions against the backend.
///
/// The state lock is never held across a backend call: an action claims its
/// record, releases the lock, awaits the backend, then locks again to apply
/// the outcome. The claim is released when the action returns or is dropped.
#[derive(Debug, Clone)]
pub struct Controller {
    backend: Arc<dyn AdminBackend>,
    host: HostContext,
    state: StateHandle,
}

impl Controller {
    pub fn new(backend: Arc<dyn AdminBackend>, host: HostContext, state: StateHandle) -> Self {
        Self {
            backend,
            host,
            state,
        }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub async fn view(&self) -> ViewState {
        let state = self.state.read().await;
        ViewState::derive(&self.host, &state)
    }

    fn ensure_can_fetch(&self) -> crate::Result<()> {
        if !self.host.embedded() {
            return Err(ModeratorError::NotEmbedded);
        }
        if !self.host.can_fetch() {
            return Err(ModeratorError::Validation(
                "No operator identity from the host".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch the app list and the stats concurrently
    pub async fn load(&self) {
        if !self.host.can_fetch() {
            tracing::debug!(
                "Not fetching: embedded={}, operator={:?}",
                self.host.embedded(),
                self.host.operator_id()
            );
            return;
        }

        let (apps, stats) = tokio::join!(self.fetch_apps(), self.fetch_stats());
        tracing::debug!(
            "Initial load finished: apps_ok={}, stats_ok={}",
            apps.is_ok(),
            stats.is_ok()
        );
    }

    /// Replace the local list; a failure becomes the full-screen error
    pub async fn fetch_apps(&self) -> crate::Result<()> {
        self.ensure_can_fetch()?;
        tracing::debug!("Fetching apps for operator {:?}", self.host.operator_id());

        let result = self.backend.list_apps().await;
        let mut state = self.state.write().await;
        match result {
            Ok(apps) => {
                tracing::debug!("Loaded {} apps", apps.len());
                state.replace_apps(apps);
                Ok(())
            }
            Err(e) => {
                let message = format!("Failed to load apps: {}", e);
                state.set_load_error(message.clone());
                state.push_notice(Notice::error(Feed::Apps, message));
                Err(e)
            }
        }
    }

    /// Replace the local stats; a failure leaves the previous stats in place
    pub async fn fetch_stats(&self) -> crate::Result<()> {
        self.ensure_can_fetch()?;
        tracing::debug!("Fetching stats for operator {:?}", self.host.operator_id());

        let issued_at = self.state.read().await.allow_list_revision();
        let result = self.backend.stats().await;
        let mut state = self.state.write().await;
        match result {
            Ok(stat) => {
                state.replace_stats(stat, issued_at);
                Ok(())
            }
            Err(e) => {
                state.push_notice(Notice::warning(
                    Feed::Stats,
                    format!("Failed to load stats: {}", e),
                ));
                Err(e)
            }
        }
    }

    /// Claim `key` for an action, recording a notice if it is already taken
    async fn claim(&self, key: &str, label: &str) -> crate::Result<ActionClaim> {
        let mut state = self.state.write().await;
        if let Some(claim) = state.begin_action(key) {
            return Ok(claim);
        }
        state.push_notice(Notice::warning(
            Feed::Action,
            format!("{} is already being processed", label),
        ));
        Err(ModeratorError::InFlight(key.to_string()))
    }

    async fn app_label(&self, app_id: &str) -> String {
        let state = self.state.read().await;
        match state.find_app(app_id) {
            Some(app) => format!("App '{}'", app.name),
            None => format!("App {}", app_id),
        }
    }

    async fn refuse(&self, message: &str) -> ModeratorError {
        let mut state = self.state.write().await;
        state.push_notice(Notice::warning(Feed::Validation, message));
        ModeratorError::Validation(message.to_string())
    }

    pub async fn approve(&self, app_id: &str) -> crate::Result<()> {
        self.ensure_can_fetch()?;
        let label = self.app_label(app_id).await;
        let _claim = self.claim(app_id, &label).await?;

        tracing::debug!("Approving app {}", app_id);
        let result = self.backend.approve(app_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if !state.mark_approved(app_id) {
                    tracing::debug!("Approved app {} is not in the local list", app_id);
                }
                state.push_notice(Notice::info(Feed::Action, format!("{} approved", label)));
                Ok(())
            }
            Err(e) => {
                state.push_notice(Notice::error(
                    Feed::Action,
                    format!("Failed to approve {}: {}", label, e),
                ));
                Err(e)
            }
        }
    }

    /// Reject with `reason`, sent as typed once it has any non-blank text
    pub async fn reject(&self, app_id: &str, reason: &str) -> crate::Result<()> {
        self.ensure_can_fetch()?;
        if reason.trim().is_empty() {
            return Err(self.refuse("Please provide a rejection reason").await);
        }
        let label = self.app_label(app_id).await;
        let _claim = self.claim(app_id, &label).await?;

        tracing::debug!("Rejecting app {}: {}", app_id, reason);
        let result = self.backend.reject(app_id, reason).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if !state.mark_rejected(app_id, reason) {
                    tracing::debug!("Rejected app {} is not in the local list", app_id);
                }
                if state.rejection_reason == reason {
                    state.rejection_reason.clear();
                }
                state.push_notice(Notice::info(Feed::Action, format!("{} rejected", label)));
                Ok(())
            }
            Err(e) => {
                state.push_notice(Notice::error(
                    Feed::Action,
                    format!("Failed to reject {}: {}", label, e),
                ));
                Err(e)
            }
        }
    }

    /// Add a developer to the allow-list; returns the server's list
    pub async fn add_developer(&self, developer_id: &str) -> crate::Result<Vec<String>> {
        self.ensure_can_fetch()?;
        let input = developer_id;
        let developer_id = developer_id.trim();
        if developer_id.is_empty() {
            return Err(self.refuse("Please provide a developer id").await);
        }
        let key = format!("developer:{}", developer_id);
        let label = format!("Developer {}", developer_id);
        let _claim = self.claim(&key, &label).await?;

        tracing::debug!("Adding developer {}", developer_id);
        let result = self.backend.add_developer(developer_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(ids) => {
                state.replace_allowed_developers(ids.clone());
                if state.new_developer_id == input {
                    state.new_developer_id.clear();
                }
                state.push_notice(Notice::info(Feed::Action, format!("{} added", label)));
                Ok(ids)
            }
            Err(e) => {
                state.push_notice(Notice::error(
                    Feed::Action,
                    format!("Failed to add {}: {}", label, e),
                ));
                Err(e)
            }
        }
    }

    /// Mirror the reason field so it survives a re-render
    pub async fn set_rejection_reason(&self, text: impl Into<String>) {
        self.state.write().await.rejection_reason = text.into();
    }

    /// Mirror the developer id field so it survives a re-render
    pub async fn set_new_developer_id(&self, text: impl Into<String>) {
        self.state.write().await.new_developer_id = text.into();
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.active_tab = tab;
    }
}
