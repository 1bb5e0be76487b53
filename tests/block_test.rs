//! Integration tests for the block store: create/update/delete/get/list,
//! schema validation and the dense-order guarantee around single-block
//! operations.

mod common;

use serde_json::json;

use common::setup_workspace;
use propdeck::errors::AppError;
use propdeck::models::block::{self, BlockType};

#[tokio::test]
async fn create_appends_with_dense_indexes() {
    let ctx = setup_workspace().await;

    let a = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Hero,
        BlockType::Hero.default_props(),
        None,
    )
    .await
    .unwrap();
    let b = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Text,
        json!({"heading": null, "body": "Scope of work"}),
        None,
    )
    .await
    .unwrap();

    assert_eq!(a.order_index, 0);
    assert_eq!(b.order_index, 1);

    let listed = block::list(&ctx.pool, ctx.proposal_id).await.unwrap();
    let indexes: Vec<i64> = listed.iter().map(|b| b.order_index).collect();
    assert_eq!(indexes, vec![0, 1]);
}

#[tokio::test]
async fn create_at_explicit_index_inserts_and_renumbers() {
    let ctx = setup_workspace().await;

    let first = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Hero,
        BlockType::Hero.default_props(),
        None,
    )
    .await
    .unwrap();
    let second = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Cta,
        BlockType::Cta.default_props(),
        None,
    )
    .await
    .unwrap();

    // Insert between the two existing blocks.
    let middle = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Quote,
        json!({"text": "Great team", "attribution": "CEO"}),
        Some(1),
    )
    .await
    .unwrap();
    assert_eq!(middle.order_index, 1);

    let listed = block::list(&ctx.pool, ctx.proposal_id).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![first.id, middle.id, second.id]);
    let indexes: Vec<i64> = listed.iter().map(|b| b.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

#[tokio::test]
async fn create_clamps_out_of_range_index() {
    let ctx = setup_workspace().await;

    let far = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Hero,
        BlockType::Hero.default_props(),
        Some(99),
    )
    .await
    .unwrap();
    assert_eq!(far.order_index, 0);
}

#[tokio::test]
async fn invalid_props_are_rejected_with_no_write() {
    let ctx = setup_workspace().await;

    // Missing required `title`.
    let err = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Hero,
        json!({"subtitle": "no title here"}),
        None,
    )
    .await;
    assert!(matches!(err, Err(AppError::Validation { .. })));

    let listed = block::list(&ctx.pool, ctx.proposal_id).await.unwrap();
    assert!(listed.is_empty(), "rejected create must not store anything");
}

#[tokio::test]
async fn create_for_missing_proposal_is_not_found() {
    let ctx = setup_workspace().await;

    let err = block::create(
        &ctx.pool,
        9999,
        BlockType::Hero,
        BlockType::Hero.default_props(),
        None,
    )
    .await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_props_leaves_style_overrides_untouched() {
    let ctx = setup_workspace().await;

    let b = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Text,
        json!({"heading": "Intro", "body": "hello"}),
        None,
    )
    .await
    .unwrap();

    let styled = block::update(&ctx.pool, b.id, None, Some(json!({"background": "#fff"})))
        .await
        .unwrap();
    assert_eq!(styled.style_overrides, Some(json!({"background": "#fff"})));
    assert_eq!(styled.props["body"], "hello");

    let reworded = block::update(
        &ctx.pool,
        b.id,
        Some(json!({"heading": "Intro", "body": "updated"})),
        None,
    )
    .await
    .unwrap();
    assert_eq!(reworded.props["body"], "updated");
    assert_eq!(
        reworded.style_overrides,
        Some(json!({"background": "#fff"})),
        "partial update must not clear style overrides"
    );
}

#[tokio::test]
async fn update_with_invalid_props_changes_nothing() {
    let ctx = setup_workspace().await;

    let b = block::create(
        &ctx.pool,
        ctx.proposal_id,
        BlockType::Quote,
        json!({"text": "original", "attribution": null}),
        None,
    )
    .await
    .unwrap();

    let err = block::update(&ctx.pool, b.id, Some(json!({"attribution": "no text"})), None).await;
    assert!(matches!(err, Err(AppError::Validation { .. })));

    let unchanged = block::get(&ctx.pool, b.id).await.unwrap();
    assert_eq!(unchanged.props["text"], "original");
}

#[tokio::test]
async fn update_unknown_block_is_not_found() {
    let ctx = setup_workspace().await;
    let err = block::update(&ctx.pool, 4242, Some(json!({"text": "x"})), None).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_compacts_remaining_order() {
    let ctx = setup_workspace().await;

    let mut ids = vec![];
    for _ in 0..4 {
        let b = block::create(
            &ctx.pool,
            ctx.proposal_id,
            BlockType::Text,
            json!({"heading": null, "body": "x"}),
            None,
        )
        .await
        .unwrap();
        ids.push(b.id);
    }

    // Remove from the middle; the gap must close immediately.
    block::delete(&ctx.pool, ids[1]).await.unwrap();

    let listed = block::list(&ctx.pool, ctx.proposal_id).await.unwrap();
    let indexes: Vec<i64> = listed.iter().map(|b| b.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    let remaining: Vec<i64> = listed.iter().map(|b| b.id).collect();
    assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
}

#[tokio::test]
async fn delete_unknown_block_is_not_found() {
    let ctx = setup_workspace().await;
    let err = block::delete(&ctx.pool, 777).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}
