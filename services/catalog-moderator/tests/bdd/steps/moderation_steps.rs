//! BDD step definitions for the moderation feature

use cucumber::{given, then, when};

use catalog_moderator::model::AppStatus;
use catalog_moderator::notice::Severity;

use crate::world::ModeratorWorld;

fn parse_status(s: &str) -> AppStatus {
    match s {
        "onModeration" => AppStatus::OnModeration,
        "added" => AppStatus::Added,
        "rejected" => AppStatus::Rejected,
        other => panic!("Unknown status: {}", other),
    }
}

fn parse_severity(s: &str) -> Severity {
    match s {
        "info" => Severity::Info,
        "warning" => Severity::Warning,
        "error" => Severity::Error,
        other => panic!("Unknown severity: {}", other),
    }
}

#[given(expr = "the backend fails actions with {string}")]
fn backend_fails_actions(world: &mut ModeratorWorld, error: String) {
    *world.backend.action_failure.lock().unwrap() = Some(error);
}

#[given(expr = "app {string} has an action in flight")]
async fn app_in_flight(world: &mut ModeratorWorld, id: String) {
    let controller = world.controller();
    let claim = controller.state().read().await.begin_action(&id);
    world.held_claims.push(claim.expect("record already claimed"));
}

#[when(expr = "the operator approves {string}")]
async fn operator_approves(world: &mut ModeratorWorld, id: String) {
    let result = world.controller().approve(&id).await;
    world.last_result = Some(result);
}

#[when(expr = "the operator rejects {string} with reason {string}")]
async fn operator_rejects(world: &mut ModeratorWorld, id: String, reason: String) {
    let controller = world.controller();
    controller.set_rejection_reason(reason.clone()).await;
    world.last_result = Some(controller.reject(&id, &reason).await);
}

#[then("the action failed")]
fn action_failed(world: &mut ModeratorWorld) {
    let result = world.last_result.as_ref().expect("no action was taken");
    assert!(result.is_err());
}

#[then(expr = "app {string} has status {string}")]
async fn app_has_status(world: &mut ModeratorWorld, id: String, status: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let app = state.find_app(&id).expect("app not loaded");
    assert_eq!(app.status, parse_status(&status));
}

#[then(expr = "app {string} has no rejection reason")]
async fn app_has_no_reason(world: &mut ModeratorWorld, id: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let app = state.find_app(&id).expect("app not loaded");
    assert_eq!(app.rejection_reason, None);
}

#[then(expr = "app {string} has rejection reason {string}")]
async fn app_has_reason(world: &mut ModeratorWorld, id: String, reason: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let app = state.find_app(&id).expect("app not loaded");
    assert_eq!(app.rejection_reason.as_deref(), Some(reason.as_str()));
}

#[then(expr = "app {string} is unchanged")]
async fn app_unchanged(world: &mut ModeratorWorld, id: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let before = world.loaded_apps.iter().find(|app| app.id == id);
    assert_eq!(state.find_app(&id), before);
}

#[then("the app list is unchanged")]
async fn app_list_unchanged(world: &mut ModeratorWorld) {
    let controller = world.controller();
    let state = controller.state().read().await;
    assert_eq!(state.apps, world.loaded_apps);
}

#[then(expr = "no {string} request was made")]
fn no_request_of_kind(world: &mut ModeratorWorld, kind: String) {
    let calls = world.backend.calls();
    assert!(
        !calls.iter().any(|call| call.split(' ').next() == Some(kind.as_str())),
        "unexpected {:?} in {:?}",
        kind,
        calls
    );
}

#[then(expr = "the last notice is a(n) {word} containing {string}")]
async fn last_notice(world: &mut ModeratorWorld, severity: String, fragment: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    let notice = state.notices.back().expect("no notice recorded");
    assert_eq!(notice.severity, parse_severity(&severity));
    assert!(
        notice.message.contains(&fragment),
        "{:?} not in {:?}",
        fragment,
        notice.message
    );
}

#[then("the pending rejection reason is empty")]
async fn rejection_reason_empty(world: &mut ModeratorWorld) {
    let controller = world.controller();
    assert!(controller.state().read().await.rejection_reason.is_empty());
}
