//! Membership gates, password helpers and the proposal lifecycle around
//! them, including the cascade from proposal deletion to published links.

mod common;

use serde_json::json;

use common::{OWNER_EMAIL, add_proposal, setup_workspace};
use propdeck::auth::password;
use propdeck::errors::AppError;
use propdeck::models::block::BlockType;
use propdeck::models::proposal::ProposalStatus;
use propdeck::models::{block, proposal, publish, user, workspace};

#[tokio::test]
async fn members_pass_the_gate_and_strangers_do_not() {
    let ctx = setup_workspace().await;

    workspace::require_member(&ctx.pool, ctx.user_id, ctx.workspace_id)
        .await
        .unwrap();

    let stranger = user::create(&ctx.pool, "stranger@example.com", "h", "Stranger")
        .await
        .unwrap();
    let err = workspace::require_member(&ctx.pool, stranger, ctx.workspace_id).await;
    assert!(matches!(err, Err(AppError::Authorization(_))));
}

#[tokio::test]
async fn plain_members_are_not_owners() {
    let ctx = setup_workspace().await;

    let member = user::create(&ctx.pool, "member@example.com", "h", "Member")
        .await
        .unwrap();
    workspace::add_member(&ctx.pool, ctx.workspace_id, member, "member")
        .await
        .unwrap();

    workspace::require_member(&ctx.pool, member, ctx.workspace_id)
        .await
        .unwrap();
    let err = workspace::require_owner(&ctx.pool, member, ctx.workspace_id).await;
    assert!(matches!(err, Err(AppError::Authorization(_))));

    workspace::require_owner(&ctx.pool, ctx.user_id, ctx.workspace_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn find_by_email_returns_seeded_owner() {
    let ctx = setup_workspace().await;

    let found = user::find_by_email(&ctx.pool, OWNER_EMAIL).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(ctx.user_id));
    assert!(
        user::find_by_email(&ctx.pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[test]
fn password_hash_round_trips() {
    let hash = password::hash_password("correct horse battery").unwrap();
    assert!(password::verify_password("correct horse battery", &hash));
    assert!(!password::verify_password("wrong password", &hash));
}

#[test]
fn malformed_stored_hash_never_verifies() {
    assert!(!password::verify_password("anything", "not-a-phc-string"));
}

#[tokio::test]
async fn proposal_rename_and_status_updates() {
    let ctx = setup_workspace().await;

    proposal::rename(&ctx.pool, ctx.proposal_id, "Acme Relaunch", "Acme GmbH")
        .await
        .unwrap();
    proposal::update_status(&ctx.pool, ctx.proposal_id, ProposalStatus::Sent)
        .await
        .unwrap();

    let prop = proposal::get(&ctx.pool, ctx.proposal_id).await.unwrap();
    assert_eq!(prop.title, "Acme Relaunch");
    assert_eq!(prop.client_name, "Acme GmbH");
    assert_eq!(prop.status, ProposalStatus::Sent);
}

#[tokio::test]
async fn list_for_workspace_sees_every_proposal() {
    let ctx = setup_workspace().await;
    let second = add_proposal(&ctx, "Second pitch").await;

    let listed = proposal::list_for_workspace(&ctx.pool, ctx.workspace_id)
        .await
        .unwrap();
    let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&ctx.proposal_id));
    assert!(ids.contains(&second));
}

#[tokio::test]
async fn deleting_a_proposal_takes_its_published_link_down() {
    let ctx = setup_workspace().await;

    block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Text,
        json!({"heading": null, "body": "hi"}),
        None,
    )
    .await
    .unwrap();
    let outcome = publish::publish(&ctx.pool, ctx.proposal_id, ctx.user_id)
        .await
        .unwrap();
    assert!(
        publish::latest_snapshot_by_slug(&ctx.pool, &outcome.slug)
            .await
            .unwrap()
            .is_some()
    );

    proposal::delete(&ctx.pool, ctx.proposal_id).await.unwrap();

    // Link and snapshots cascade with the proposal.
    assert!(
        publish::latest_snapshot_by_slug(&ctx.pool, &outcome.slug)
            .await
            .unwrap()
            .is_none()
    );
    let err = proposal::get(&ctx.pool, ctx.proposal_id).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}
