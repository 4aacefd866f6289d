//! Web dashboard served to the host webview, plus a JSON view snapshot

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::controller::Controller;
use crate::model::{App, AppKind, AppStatus, Stat};
use crate::notice::{Notice, Severity};
use crate::view::{ReadyView, Tab, ViewState};

/// Build the dashboard axum router
pub fn build_router(controller: Controller) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/tab", post(tab_handler))
        .route("/apps/{id}/approve", post(approve_handler))
        .route("/apps/{id}/reject", post(reject_handler))
        .route("/developers", post(add_developer_handler))
        .route("/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .with_state(controller)
}

#[derive(Debug, Deserialize)]
struct TabForm {
    tab: Tab,
}

#[derive(Debug, Deserialize)]
struct RejectForm {
    #[serde(default)]
    rejection_reason: String,
}

#[derive(Debug, Deserialize)]
struct DeveloperForm {
    #[serde(default)]
    developer_id: String,
}

async fn index_handler(State(controller): State<Controller>) -> Response {
    let view = {
        let mut state = controller.state().write().await;
        let view = ViewState::derive(controller.host(), &state);
        state.mark_notices_seen();
        view
    };
    match render_page(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render dashboard: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render dashboard").into_response()
        }
    }
}

async fn view_handler(State(controller): State<Controller>) -> impl IntoResponse {
    Json(controller.view().await)
}

async fn tab_handler(
    State(controller): State<Controller>,
    Form(form): Form<TabForm>,
) -> impl IntoResponse {
    controller.select_tab(form.tab).await;
    Redirect::to("/")
}

async fn approve_handler(
    State(controller): State<Controller>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = controller.approve(&id).await {
        tracing::debug!("Approve {} not applied: {}", id, e);
    }
    Redirect::to("/")
}

async fn reject_handler(
    State(controller): State<Controller>,
    Path(id): Path<String>,
    Form(form): Form<RejectForm>,
) -> impl IntoResponse {
    controller.set_rejection_reason(form.rejection_reason.clone()).await;
    if let Err(e) = controller.reject(&id, &form.rejection_reason).await {
        tracing::debug!("Reject {} not applied: {}", id, e);
    }
    Redirect::to("/")
}

async fn add_developer_handler(
    State(controller): State<Controller>,
    Form(form): Form<DeveloperForm>,
) -> impl IntoResponse {
    controller.set_new_developer_id(form.developer_id.clone()).await;
    if let Err(e) = controller.add_developer(&form.developer_id).await {
        tracing::debug!("Add developer not applied: {}", e);
    }
    Redirect::to("/")
}

async fn refresh_handler(State(controller): State<Controller>) -> impl IntoResponse {
    controller.load().await;
    Redirect::to("/")
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

#[derive(Template)]
#[template(path = "message.html")]
struct MessagePage<'a> {
    is_error: bool,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "ready.html")]
struct ReadyPage<'a> {
    notices: Vec<NoticeItem<'a>>,
    tabs: Vec<TabItem>,
    title: &'static str,
    is_stats: bool,
    cards: Vec<CardItem<'a>>,
    empty_text: &'static str,
    rejection_reason: &'a str,
    stats: Option<&'a Stat>,
    developers: &'a [String],
    new_developer_id: &'a str,
}

struct NoticeItem<'a> {
    severity: Severity,
    color: &'static str,
    background: &'static str,
    message: &'a str,
}

struct TabItem {
    slug: &'static str,
    label: String,
    current: bool,
}

struct CardItem<'a> {
    path: String,
    name: &'a str,
    kind: AppKind,
    status: AppStatus,
    category: &'a str,
    developer: &'a str,
    description: &'a str,
    pending: bool,
    in_flight: bool,
    promotion_label: &'static str,
    promotion: String,
    edits: u32,
}

/// Render a full HTML page for a view state
pub fn render_page(view: &ViewState) -> crate::Result<String> {
    let html = match view {
        ViewState::NotEmbedded => MessagePage {
            is_error: true,
            message: "This dashboard must be opened from the chat host.",
        }
        .render()?,
        ViewState::Error { message } => MessagePage {
            is_error: true,
            message: message.as_str(),
        }
        .render()?,
        ViewState::Loading => MessagePage {
            is_error: false,
            message: "Loading apps...",
        }
        .render()?,
        ViewState::Ready(ready) => ready_page(ready).render()?,
    };
    Ok(html)
}

fn ready_page(ready: &ReadyView) -> ReadyPage<'_> {
    let notices = ready.notices.iter().map(notice_item).collect();
    let tabs = Tab::ALL
        .iter()
        .map(|&tab| TabItem {
            slug: tab.slug(),
            label: match tab {
                Tab::Pending => format!("{} ({})", tab.title(), ready.pending_count),
                Tab::Approved => format!("{} ({})", tab.title(), ready.approved_count),
                Tab::Stats => tab.title().to_string(),
            },
            current: tab == ready.tab,
        })
        .collect();
    let empty_text = match ready.tab {
        Tab::Approved => "No approved apps yet.",
        _ => "No apps are waiting for review.",
    };

    ReadyPage {
        notices,
        tabs,
        title: ready.tab.title(),
        is_stats: ready.tab == Tab::Stats,
        cards: ready.apps.iter().map(|app| card_item(app, ready)).collect(),
        empty_text,
        rejection_reason: &ready.rejection_reason,
        stats: ready.stats.as_ref(),
        developers: &ready.allowed_developer_ids,
        new_developer_id: &ready.new_developer_id,
    }
}

fn notice_item(notice: &Notice) -> NoticeItem<'_> {
    let (color, background) = match notice.severity {
        Severity::Info => ("#155724", "#d4edda"),
        Severity::Warning => ("#856404", "#fff3cd"),
        Severity::Error => ("#721c24", "#f8d7da"),
    };
    NoticeItem {
        severity: notice.severity,
        color,
        background,
        message: &notice.message,
    }
}

fn card_item<'a>(app: &'a App, ready: &ReadyView) -> CardItem<'a> {
    const FORMAT: &str = "%Y-%m-%d %H:%M";
    let (promotion_label, promotion) = match (&app.start_promote_date, &app.end_promote_date) {
        (Some(start), Some(end)) => (
            "Promoted:",
            format!("{} to {}", start.format(FORMAT), end.format(FORMAT)),
        ),
        (Some(start), None) => ("Promoted from:", start.format(FORMAT).to_string()),
        (None, Some(end)) => ("Promoted until:", end.format(FORMAT).to_string()),
        (None, None) => ("", String::new()),
    };
    CardItem {
        path: urlencoding::encode(&app.id).into_owned(),
        name: &app.name,
        kind: app.kind,
        status: app.status,
        category: &app.display_category,
        developer: &app.developer_id,
        description: &app.short_description,
        pending: app.status == AppStatus::OnModeration,
        in_flight: ready.is_in_flight(&app.id),
        promotion_label,
        promotion,
        edits: app.edit_count,
    }
}
