//! Admin API client for the catalog backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::host::HostContext;
use crate::io::{HttpClient, HttpResponse};
use crate::model::{AddDeveloperResponse, ApiErrorBody, App, Stat};

/// Operations the dashboard needs from the catalog backend
#[async_trait]
pub trait AdminBackend: Send + Sync + std::fmt::Debug {
    /// Fetch every app known to the catalog
    async fn list_apps(&self) -> crate::Result<Vec<App>>;

    /// Fetch aggregate catalog counters and the developer allow-list
    async fn stats(&self) -> crate::Result<Stat>;

    /// Mark an app as added to the catalog
    async fn approve(&self, app_id: &str) -> crate::Result<()>;

    /// Reject an app with a reason shown to its developer
    async fn reject(&self, app_id: &str, reason: &str) -> crate::Result<()>;

    /// Allow a developer to publish; returns the server's allow-list
    async fn add_developer(&self, developer_id: &str) -> crate::Result<Vec<String>>;
}

/// HTTP client for the `/api/admin` endpoints
pub struct BackendClient {
    base_url: String,
    operator_id: Option<String>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("operator_id", &self.operator_id)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, host: &HostContext, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created BackendClient for {}", base_url);

        Self {
            base_url,
            operator_id: host.operator_id().map(str::to_string),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        match &self.operator_id {
            Some(id) => format!(
                "{}/api/admin/{}?userId={}",
                self.base_url,
                path,
                urlencoding::encode(id)
            ),
            None => format!("{}/api/admin/{}", self.base_url, path),
        }
    }

    fn app_url(&self, app_id: &str, action: &str) -> String {
        self.url(&format!("apps/{}/{}", urlencoding::encode(app_id), action))
    }
}

/// Turn a non-2xx response into an API error carrying the server's text
fn check_status(response: &HttpResponse) -> crate::Result<()> {
    if response.is_success() {
        return Ok(());
    }

    let error = serde_json::from_str::<ApiErrorBody>(&response.body)
        .map(|body| body.error)
        .unwrap_or_else(|e| {
            tracing::debug!("Error body is not JSON: {}", e);
            None
        });

    Err(crate::ModeratorError::Api {
        status: response.status,
        status_text: response.status_text.clone(),
        error,
    })
}

fn parse<T: DeserializeOwned>(response: &HttpResponse) -> crate::Result<T> {
    check_status(response)?;
    Ok(serde_json::from_str(&response.body)?)
}

#[async_trait]
impl AdminBackend for BackendClient {
    async fn list_apps(&self) -> crate::Result<Vec<App>> {
        let response = self.http.get(&self.url("apps")).await?;
        let apps: Vec<App> = parse(&response)?;
        tracing::debug!("Backend returned {} apps", apps.len());
        Ok(apps)
    }

    async fn stats(&self) -> crate::Result<Stat> {
        let response = self.http.get(&self.url("stats")).await?;
        parse(&response)
    }

    async fn approve(&self, app_id: &str) -> crate::Result<()> {
        let response = self
            .http
            .patch_json(&self.app_url(app_id, "approve"), "")
            .await?;
        check_status(&response)
    }

    async fn reject(&self, app_id: &str, reason: &str) -> crate::Result<()> {
        let body = serde_json::json!({ "rejectionReason": reason }).to_string();
        let response = self
            .http
            .patch_json(&self.app_url(app_id, "reject"), &body)
            .await?;
        check_status(&response)
    }

    async fn add_developer(&self, developer_id: &str) -> crate::Result<Vec<String>> {
        let body = serde_json::json!({ "developerId": developer_id }).to_string();
        let response = self
            .http
            .post_json(&self.url("add-developer"), &body)
            .await?;
        let parsed: AddDeveloperResponse = parse(&response)?;
        tracing::debug!("Backend: {}", parsed.message);
        Ok(parsed.allowed_developer_ids)
    }
}
