//! BDD step definitions for the initial load feature

use cucumber::{given, then, when};
use serde_json::json;

use catalog_moderator::host::HostContext;
use catalog_moderator::model::{App, Stat};
use catalog_moderator::view::ViewState;

use crate::world::ModeratorWorld;

pub fn pending_app(id: &str, kind: &str, category_game: &str, category_apps: &str) -> App {
    let app: App = serde_json::from_value(json!({
        "id": id,
        "type": kind,
        "name": format!("App {}", id),
        "shortDescription": "A mini app",
        "categoryGame": category_game,
        "categoryApps": category_apps,
        "developerId": "dev-1",
        "status": "onModeration"
    }))
    .expect("valid app json");
    app.normalize()
}

#[given(
    expr = "the backend lists a pending {word} {string} with game category {string} and apps category {string}"
)]
fn backend_lists_categorized(
    world: &mut ModeratorWorld,
    kind: String,
    id: String,
    category_game: String,
    category_apps: String,
) {
    let app = pending_app(&id, &kind, &category_game, &category_apps);
    world.backend.apps.lock().unwrap().push(app);
}

#[given(expr = "the backend lists a pending app {string}")]
fn backend_lists_pending(world: &mut ModeratorWorld, id: String) {
    let app = pending_app(&id, "app", "arcade", "tools");
    world.backend.apps.lock().unwrap().push(app);
}

#[given(expr = "the backend reports {int} total apps")]
fn backend_reports_total(world: &mut ModeratorWorld, total: u64) {
    *world.backend.stats.lock().unwrap() = Some(Stat {
        total_apps: total,
        ..Stat::default()
    });
}

#[given(expr = "the backend list fails with status {int} {string} and error {string}")]
fn backend_list_fails(world: &mut ModeratorWorld, status: u16, status_text: String, error: String) {
    *world.backend.list_failure.lock().unwrap() = Some((status, status_text, error));
}

#[given(expr = "the host reports operator {string} embedded")]
fn host_embedded(world: &mut ModeratorWorld, operator_id: String) {
    world.host = Some(HostContext::new(Some(operator_id), true));
}

#[given(expr = "the host reports operator {string} not embedded")]
fn host_not_embedded(world: &mut ModeratorWorld, operator_id: String) {
    world.host = Some(HostContext::new(Some(operator_id), false));
}

async fn load_dashboard(world: &mut ModeratorWorld) {
    let controller = world.controller();
    controller.load().await;
    world.loaded_apps = controller.state().read().await.apps.clone();
}

#[given("the dashboard has loaded")]
async fn dashboard_has_loaded(world: &mut ModeratorWorld) {
    load_dashboard(world).await;
}

#[when("the dashboard loads")]
async fn dashboard_loads(world: &mut ModeratorWorld) {
    load_dashboard(world).await;
}

#[then(expr = "the backend received {string}")]
fn backend_received(world: &mut ModeratorWorld, call: String) {
    let calls = world.backend.calls();
    assert!(calls.contains(&call), "expected {:?} in {:?}", call, calls);
}

#[then("no backend request was made")]
fn no_backend_request(world: &mut ModeratorWorld) {
    assert!(world.backend.calls().is_empty());
}

#[then("the view is ready")]
async fn view_is_ready(world: &mut ModeratorWorld) {
    let view = world.controller().view().await;
    assert!(matches!(view, ViewState::Ready(_)), "unexpected view {:?}", view);
}

#[then("the view is not embedded")]
async fn view_not_embedded(world: &mut ModeratorWorld) {
    let view = world.controller().view().await;
    assert_eq!(view, ViewState::NotEmbedded);
}

#[then(expr = "the view shows an error containing {string}")]
async fn view_shows_error(world: &mut ModeratorWorld, fragment: String) {
    match world.controller().view().await {
        ViewState::Error { message } => {
            assert!(message.contains(&fragment), "{:?} not in {:?}", fragment, message)
        }
        other => panic!("expected error view, got {:?}", other),
    }
}

#[then("no stats are loaded")]
async fn no_stats_loaded(world: &mut ModeratorWorld) {
    let controller = world.controller();
    assert!(controller.state().read().await.stats.is_none());
}

#[then(expr = "app {string} displays category {string}")]
async fn app_displays_category(world: &mut ModeratorWorld, id: String, category: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let app = state.find_app(&id).expect("app not loaded");
    assert_eq!(app.display_category, category);
}
