//! In-memory copies of the catalog owned by the dashboard

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::RwLock;

use crate::model::{App, AppStatus, Stat};
use crate::notice::{Feed, Notice, NoticePolicy};
use crate::view::Tab;

/// Keys of records with an outstanding mutating action
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `key`, or `None` if it is already claimed.
    ///
    /// The key is released when the returned claim is dropped, including when
    /// the action owning it is cancelled mid-request.
    pub fn claim(&self, key: &str) -> Option<ActionClaim> {
        if !self.lock().insert(key.to_string()) {
            return None;
        }
        Some(ActionClaim {
            registry: self.clone(),
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Claimed keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().iter().cloned().collect();
        keys.sort();
        keys
    }
}

/// Exclusive hold on one in-flight key
#[derive(Debug)]
pub struct ActionClaim {
    registry: InFlight,
    key: String,
}

impl Drop for ActionClaim {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}

/// Everything the dashboard keeps between requests
#[derive(Debug)]
pub struct DashboardState {
    pub apps: Vec<App>,
    /// Set after the first successful list fetch
    pub apps_loaded: bool,
    pub stats: Option<Stat>,
    /// Allow-list returned by the server before any stats were loaded
    pending_allow_list: Option<Vec<String>>,
    /// Bumped on every adopted add-developer response
    allow_list_revision: u64,
    pub load_error: Option<String>,
    pub active_tab: Tab,
    pub rejection_reason: String,
    pub new_developer_id: String,
    in_flight: InFlight,
    pub notices: VecDeque<Notice>,
    pub notice_max_size: usize,
    pub policy: NoticePolicy,
}

impl DashboardState {
    pub fn new(notice_max_size: usize, policy: NoticePolicy) -> Self {
        Self {
            apps: Vec::new(),
            apps_loaded: false,
            stats: None,
            pending_allow_list: None,
            allow_list_revision: 0,
            load_error: None,
            active_tab: Tab::default(),
            rejection_reason: String::new(),
            new_developer_id: String::new(),
            in_flight: InFlight::default(),
            notices: VecDeque::with_capacity(notice_max_size),
            notice_max_size,
            policy,
        }
    }

    /// Replace the local list with a fresh backend copy and clear any load error
    pub fn replace_apps(&mut self, apps: Vec<App>) {
        self.apps = apps.into_iter().map(App::normalize).collect();
        self.apps_loaded = true;
        self.load_error = None;
        for notice in self.notices.iter_mut().filter(|n| n.feed == Feed::Apps) {
            notice.seen = true;
        }
    }

    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    /// Revision to capture before issuing a stats request
    pub fn allow_list_revision(&self) -> u64 {
        self.allow_list_revision
    }

    /// Store stats fetched by a request issued at revision `issued_at`.
    ///
    /// The fetched allow-list wins unless an add-developer response was
    /// adopted after the request went out, in which case the local list is
    /// newer and is kept.
    pub fn replace_stats(&mut self, mut stat: Stat, issued_at: u64) {
        let pending = self.pending_allow_list.take();
        if self.allow_list_revision > issued_at {
            let local = pending.or_else(|| {
                self.stats
                    .as_ref()
                    .map(|s| s.allowed_developer_ids.clone())
            });
            if let Some(ids) = local {
                stat.allowed_developer_ids = ids;
            }
        }
        self.stats = Some(stat);
    }

    /// Adopt the server's allow-list as-is
    pub fn replace_allowed_developers(&mut self, ids: Vec<String>) {
        self.allow_list_revision += 1;
        match self.stats.as_mut() {
            Some(stat) => stat.allowed_developer_ids = ids,
            None => self.pending_allow_list = Some(ids),
        }
    }

    /// Current allow-list, whether or not stats have loaded
    pub fn allowed_developer_ids(&self) -> &[String] {
        match (&self.stats, &self.pending_allow_list) {
            (Some(stat), _) => &stat.allowed_developer_ids,
            (None, Some(ids)) => ids,
            (None, None) => &[],
        }
    }

    pub fn find_app(&self, app_id: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.id == app_id)
    }

    /// Mark an app as added locally, returning false if it is not in the list
    pub fn mark_approved(&mut self, app_id: &str) -> bool {
        match self.apps.iter_mut().find(|a| a.id == app_id) {
            Some(app) => {
                app.approve();
                true
            }
            None => false,
        }
    }

    /// Mark an app as rejected locally, returning false if it is not in the list
    pub fn mark_rejected(&mut self, app_id: &str, reason: &str) -> bool {
        match self.apps.iter_mut().find(|a| a.id == app_id) {
            Some(app) => {
                app.reject(reason);
                true
            }
            None => false,
        }
    }

    pub fn apps_with_status(&self, status: AppStatus) -> impl Iterator<Item = &App> {
        self.apps.iter().filter(move |a| a.status == status)
    }

    /// Claim a record for a mutating action; `None` if one is already outstanding
    pub fn begin_action(&self, key: &str) -> Option<ActionClaim> {
        self.in_flight.claim(key)
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Log a notice and keep it in the bounded history
    pub fn push_notice(&mut self, notice: Notice) {
        notice.log();
        if self.notice_max_size == 0 {
            return;
        }
        if self.notices.len() >= self.notice_max_size {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// Visible notices the operator has not been shown yet, oldest first
    pub fn unseen_notices(&self) -> Vec<Notice> {
        self.notices
            .iter()
            .filter(|n| !n.seen && self.policy.is_visible(n))
            .cloned()
            .collect()
    }

    pub fn mark_notices_seen(&mut self) {
        for notice in self.notices.iter_mut() {
            notice.seen = true;
        }
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle(notice_max_size: usize, policy: NoticePolicy) -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new(notice_max_size, policy)))
}
