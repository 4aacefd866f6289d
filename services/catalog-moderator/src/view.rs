//! View states derived from the host context and dashboard state

use serde::{Deserialize, Serialize};

use crate::host::HostContext;
use crate::model::{App, AppStatus, Stat};
use crate::notice::Notice;
use crate::state::DashboardState;

/// Tabs of the ready view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Pending,
    Approved,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Pending, Tab::Approved, Tab::Stats];

    /// Status listed by this tab, if it lists apps at all
    pub fn status(self) -> Option<AppStatus> {
        match self {
            Tab::Pending => Some(AppStatus::OnModeration),
            Tab::Approved => Some(AppStatus::Added),
            Tab::Stats => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Pending => "Pending review",
            Tab::Approved => "Approved",
            Tab::Stats => "Statistics",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Tab::Pending => "pending",
            Tab::Approved => "approved",
            Tab::Stats => "stats",
        }
    }
}

/// What the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    NotEmbedded,
    Loading,
    Error { message: String },
    Ready(ReadyView),
}

/// Contents of the tabbed view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyView {
    pub tab: Tab,
    /// Apps listed by the active tab; empty on the stats tab
    pub apps: Vec<App>,
    pub pending_count: usize,
    pub approved_count: usize,
    pub stats: Option<Stat>,
    /// Allow-list to show, available before stats arrive
    pub allowed_developer_ids: Vec<String>,
    pub rejection_reason: String,
    pub new_developer_id: String,
    /// Records with an outstanding action, sorted
    pub in_flight: Vec<String>,
    pub notices: Vec<Notice>,
}

impl ReadyView {
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.iter().any(|k| k == key)
    }
}

impl ViewState {
    /// Pick the view to render; the first matching rule wins
    pub fn derive(host: &HostContext, state: &DashboardState) -> Self {
        if !host.embedded() {
            return ViewState::NotEmbedded;
        }
        if let Some(message) = &state.load_error {
            return ViewState::Error {
                message: message.clone(),
            };
        }
        if host.can_fetch() && !state.apps_loaded {
            return ViewState::Loading;
        }

        let tab = state.active_tab;
        let apps = match tab.status() {
            Some(status) => state.apps_with_status(status).cloned().collect(),
            None => Vec::new(),
        };
        ViewState::Ready(ReadyView {
            tab,
            apps,
            pending_count: state.apps_with_status(AppStatus::OnModeration).count(),
            approved_count: state.apps_with_status(AppStatus::Added).count(),
            stats: state.stats.clone(),
            allowed_developer_ids: state.allowed_developer_ids().to_vec(),
            rejection_reason: state.rejection_reason.clone(),
            new_developer_id: state.new_developer_id.clone(),
            in_flight: state.in_flight().keys(),
            notices: state.unseen_notices(),
        })
    }
}
