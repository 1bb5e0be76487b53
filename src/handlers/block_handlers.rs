//! Block API: the five store operations plus reorder, duplicate and the
//! picker metadata. Every mutating handler follows the same shape as the
//! rest of the app: identity, membership gate, operation, audit trail,
//! revalidation signal, JSON envelope.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api;
use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::block::{self, BlockType};
use crate::models::{proposal, workspace};
use crate::revalidate::{Revalidator, builder_path};
use crate::{audit, models::block::types::Block};

#[derive(Deserialize)]
pub struct CreateBlockRequest {
    pub block_type: String,
    #[serde(default)]
    pub props: Option<Value>,
    #[serde(default)]
    pub order_index: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateBlockRequest {
    #[serde(default)]
    pub props: Option<Value>,
    #[serde(default)]
    pub style_overrides: Option<Value>,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<i64>,
}

/// GET /api/v1/block-types — registry entries for the "add block" picker.
pub async fn list_block_types(session: Session) -> Result<HttpResponse, AppError> {
    require_user(&session)?;
    Ok(api::ok(block::picker_entries()))
}

/// GET /api/v1/proposals/{proposal_id}/blocks
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let proposal_id = path.into_inner();
    let prop = proposal::get(&pool, proposal_id).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let blocks = block::list(&pool, proposal_id).await?;
    Ok(api::ok(blocks))
}

/// GET /api/v1/blocks/{id}
pub async fn get(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let (_, b) = authorized_block(&pool, &session, path.into_inner()).await?;
    Ok(api::ok(b))
}

/// POST /api/v1/proposals/{proposal_id}/blocks
///
/// Omitted props fall back to the registry defaults for the type, which is
/// exactly what the "add via picker" flow sends. An unregistered type tag
/// is rejected, never stored.
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
    body: web::Json<CreateBlockRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let proposal_id = path.into_inner();
    let prop = proposal::get(&pool, proposal_id).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let block_type = BlockType::parse(&body.block_type).ok_or_else(|| {
        AppError::invalid_field(
            "block_type",
            format!("Unknown block type '{}'", body.block_type),
        )
    })?;
    let props = body
        .props
        .clone()
        .unwrap_or_else(|| block_type.default_props());

    let created = block::create(&pool, proposal_id, block_type, props, body.order_index).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "block.created",
        "block",
        created.id,
        json!({ "proposal_id": proposal_id, "block_type": block_type.as_str() }),
    )
    .await;
    reval.notify([builder_path(proposal_id)]);

    Ok(api::ok(created))
}

/// PATCH /api/v1/blocks/{id} — partial update; whichever of props /
/// style_overrides is missing stays untouched.
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
    body: web::Json<UpdateBlockRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, existing) = authorized_block(&pool, &session, path.into_inner()).await?;

    let updated = block::update(
        &pool,
        existing.id,
        body.props.clone(),
        body.style_overrides.clone(),
    )
    .await?;

    let _ = audit::log(
        &pool,
        user_id,
        "block.updated",
        "block",
        existing.id,
        json!({ "proposal_id": existing.proposal_id }),
    )
    .await;
    reval.notify([builder_path(existing.proposal_id)]);

    Ok(api::ok(updated))
}

/// DELETE /api/v1/blocks/{id} — removes the block and compacts the order.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let (user_id, existing) = authorized_block(&pool, &session, path.into_inner()).await?;

    block::delete(&pool, existing.id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "block.deleted",
        "block",
        existing.id,
        json!({ "proposal_id": existing.proposal_id }),
    )
    .await;
    reval.notify([builder_path(existing.proposal_id)]);

    Ok(api::ok(json!({ "deleted": existing.id })))
}

/// POST /api/v1/blocks/{id}/duplicate
pub async fn duplicate(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let (user_id, source) = authorized_block(&pool, &session, path.into_inner()).await?;

    let copy = block::duplicate(&pool, source.id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "block.duplicated",
        "block",
        copy.id,
        json!({ "proposal_id": source.proposal_id, "source_id": source.id }),
    )
    .await;
    reval.notify([builder_path(source.proposal_id)]);

    Ok(api::ok(copy))
}

/// POST /api/v1/proposals/{proposal_id}/blocks/reorder
pub async fn reorder(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
    body: web::Json<ReorderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let proposal_id = path.into_inner();
    let prop = proposal::get(&pool, proposal_id).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    block::reorder(&pool, proposal_id, &body.ordered_ids).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "block.reordered",
        "proposal",
        proposal_id,
        json!({ "count": body.ordered_ids.len() }),
    )
    .await;
    reval.notify([builder_path(proposal_id)]);

    Ok(api::ok(block::list(&pool, proposal_id).await?))
}

/// Load a block and gate on membership of the owning proposal's workspace.
/// Returns the acting user alongside so callers check the session once.
async fn authorized_block(
    pool: &DbPool,
    session: &Session,
    block_id: i64,
) -> Result<(i64, Block), AppError> {
    let user_id = require_user(session)?;
    let b = block::get(pool, block_id).await?;
    let prop = proposal::get(pool, b.proposal_id).await?;
    workspace::require_member(pool, user_id, prop.workspace_id).await?;
    Ok((user_id, b))
}
