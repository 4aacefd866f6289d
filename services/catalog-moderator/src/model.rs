//! Catalog records exchanged with the admin API

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Game,
    App,
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppKind::Game => write!(f, "game"),
            AppKind::App => write!(f, "app"),
        }
    }
}

/// Moderation lifecycle of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppStatus {
    OnModeration,
    Added,
    Rejected,
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppStatus::OnModeration => write!(f, "On moderation"),
            AppStatus::Added => write!(f, "Added"),
            AppStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A mini-application listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AppKind,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub category_game: Option<String>,
    #[serde(default)]
    pub category_apps: Option<String>,
    #[serde(default)]
    pub additional_categories: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub developer_id: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub age_rating: String,
    #[serde(default)]
    pub in_app_purchases: bool,
    #[serde(default, rename = "supportsTON")]
    pub supports_ton: bool,
    #[serde(default)]
    pub supports_telegram_stars: bool,
    #[serde(default)]
    pub contact_info: String,
    pub status: AppStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub start_promote_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_promote_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edit_count: u32,
    /// Category shown to the operator, resolved from `kind` on ingestion
    #[serde(skip_deserializing)]
    pub display_category: String,
}

impl App {
    /// Prepare a record received from the backend for local use.
    ///
    /// Resolves the display category and drops a rejection reason on any
    /// record that is not rejected.
    pub fn normalize(mut self) -> Self {
        self.display_category = match self.kind {
            AppKind::Game => self.category_game.clone(),
            AppKind::App => self.category_apps.clone(),
        }
        .unwrap_or_default();

        if self.status != AppStatus::Rejected && self.rejection_reason.is_some() {
            tracing::debug!(
                "Dropping rejection reason on app '{}' with status {:?}",
                self.id,
                self.status
            );
            self.rejection_reason = None;
        }
        self
    }

    pub fn approve(&mut self) {
        self.status = AppStatus::Added;
        self.rejection_reason = None;
    }

    pub fn reject(&mut self, reason: impl Into<String>) {
        self.status = AppStatus::Rejected;
        self.rejection_reason = Some(reason.into());
    }
}

/// Aggregate catalog counters and the developer allow-list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(default)]
    pub total_apps: u64,
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default)]
    pub total_stars: u64,
    #[serde(default)]
    pub total_complaints: u64,
    #[serde(default)]
    pub allowed_developer_ids: Vec<String>,
}

/// Body of POST /api/admin/add-developer on success
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeveloperResponse {
    #[serde(default)]
    pub message: String,
    pub allowed_developer_ids: Vec<String>,
}

/// Error body the backend attaches to non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
