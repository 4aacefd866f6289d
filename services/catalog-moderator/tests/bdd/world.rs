//! BDD test world for the catalog moderator

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;

use catalog_moderator::backend::AdminBackend;
use catalog_moderator::host::HostContext;
use catalog_moderator::model::{App, Stat};
use catalog_moderator::notice::NoticePolicy;
use catalog_moderator::state::{new_state_handle, ActionClaim};
use catalog_moderator::{Controller, ModeratorError};

/// In-memory stand-in for the admin API that records every request
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub apps: Mutex<Vec<App>>,
    pub stats: Mutex<Option<Stat>>,
    pub list_failure: Mutex<Option<(u16, String, String)>>,
    pub action_failure: Mutex<Option<String>>,
    pub allow_list: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn action_result(&self) -> catalog_moderator::Result<()> {
        match self.action_failure.lock().unwrap().clone() {
            Some(error) => Err(ModeratorError::Api {
                status: 500,
                status_text: "Internal Server Error".to_string(),
                error: Some(error),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminBackend for FakeBackend {
    async fn list_apps(&self) -> catalog_moderator::Result<Vec<App>> {
        self.record("list_apps".to_string());
        if let Some((status, status_text, error)) = self.list_failure.lock().unwrap().clone() {
            return Err(ModeratorError::Api {
                status,
                status_text,
                error: Some(error),
            });
        }
        Ok(self.apps.lock().unwrap().clone())
    }

    async fn stats(&self) -> catalog_moderator::Result<Stat> {
        self.record("stats".to_string());
        match self.stats.lock().unwrap().clone() {
            Some(mut stat) => {
                stat.allowed_developer_ids = self.allow_list.lock().unwrap().clone();
                Ok(stat)
            }
            None => Err(ModeratorError::Api {
                status: 403,
                status_text: "Forbidden".to_string(),
                error: Some("forbidden".to_string()),
            }),
        }
    }

    async fn approve(&self, app_id: &str) -> catalog_moderator::Result<()> {
        self.record(format!("approve {}", app_id));
        self.action_result()
    }

    async fn reject(&self, app_id: &str, reason: &str) -> catalog_moderator::Result<()> {
        self.record(format!("reject {} {}", app_id, reason));
        self.action_result()
    }

    async fn add_developer(&self, developer_id: &str) -> catalog_moderator::Result<Vec<String>> {
        self.record(format!("add_developer {}", developer_id));
        self.action_result()?;
        let mut allow_list = self.allow_list.lock().unwrap();
        if !allow_list.iter().any(|id| id == developer_id) {
            allow_list.push(developer_id.to_string());
        }
        Ok(allow_list.clone())
    }
}

#[derive(Debug, Default, World)]
pub struct ModeratorWorld {
    pub backend: Arc<FakeBackend>,
    pub host: Option<HostContext>,
    pub controller: Option<Controller>,
    pub last_result: Option<catalog_moderator::Result<()>>,
    /// Local app list right after the initial load
    pub loaded_apps: Vec<App>,
    /// Claims standing in for actions still awaiting the backend
    pub held_claims: Vec<ActionClaim>,
}

impl ModeratorWorld {
    /// The controller, built on first use from the configured backend and host
    pub fn controller(&mut self) -> Controller {
        if self.controller.is_none() {
            let host = self.host.clone().expect("host context not set");
            let state = new_state_handle(10, NoticePolicy::default());
            self.controller = Some(Controller::new(self.backend.clone(), host, state));
        }
        self.controller.clone().expect("controller just built")
    }
}
