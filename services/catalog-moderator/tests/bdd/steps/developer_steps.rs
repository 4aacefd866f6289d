//! BDD step definitions for the developer allow-list feature

use cucumber::{given, then, when};

use catalog_moderator::model::Stat;

use crate::world::ModeratorWorld;

#[given(expr = "the backend allows developers {string}")]
fn backend_allows(world: &mut ModeratorWorld, ids: String) {
    let ids: Vec<String> = ids
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    *world.backend.allow_list.lock().unwrap() = ids;
    *world.backend.stats.lock().unwrap() = Some(Stat::default());
}

#[when(expr = "the operator adds developer {string}")]
async fn operator_adds_developer(world: &mut ModeratorWorld, id: String) {
    let controller = world.controller();
    controller.set_new_developer_id(id.clone()).await;
    world.last_result = Some(controller.add_developer(&id).await.map(|_| ()));
}

#[given(expr = "developer {string} has an addition in flight")]
async fn developer_in_flight(world: &mut ModeratorWorld, id: String) {
    let controller = world.controller();
    let claim = controller
        .state()
        .read()
        .await
        .begin_action(&format!("developer:{}", id));
    world.held_claims.push(claim.expect("developer already claimed"));
}

#[then(expr = "the allow-list is {string}")]
async fn allow_list_is(world: &mut ModeratorWorld, expected: String) {
    let controller = world.controller();
    let state = controller.state().read().await;
    assert_eq!(state.allowed_developer_ids().join(","), expected);
}

#[then("the pending developer id is empty")]
async fn developer_id_empty(world: &mut ModeratorWorld) {
    let controller = world.controller();
    assert!(controller.state().read().await.new_developer_id.is_empty());
}
