use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api;
use crate::audit;
use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::proposal::ProposalStatus;
use crate::models::{block, proposal, workspace};

#[derive(Deserialize)]
pub struct CreateProposalRequest {
    pub title: String,
    #[serde(default)]
    pub client_name: String,
}

#[derive(Deserialize)]
pub struct RenameProposalRequest {
    pub title: String,
    #[serde(default)]
    pub client_name: String,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// POST /api/v1/workspaces/{workspace_id}/proposals
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<CreateProposalRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    let id = proposal::create(&pool, workspace_id, title, body.client_name.trim(), user_id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "proposal.created",
        "proposal",
        id,
        json!({ "workspace_id": workspace_id, "title": title }),
    )
    .await;

    Ok(api::ok(proposal::get(&pool, id).await?))
}

/// GET /api/v1/workspaces/{workspace_id}/proposals
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    Ok(api::ok(proposal::list_for_workspace(&pool, workspace_id).await?))
}

/// GET /api/v1/proposals/{id} — proposal plus its ordered blocks.
pub async fn detail(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let prop = proposal::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let blocks = block::list(&pool, prop.id).await?;
    Ok(api::ok(json!({ "proposal": prop, "blocks": blocks })))
}

/// PATCH /api/v1/proposals/{id}
pub async fn rename(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<RenameProposalRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let prop = proposal::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    proposal::rename(&pool, prop.id, title, body.client_name.trim()).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "proposal.renamed",
        "proposal",
        prop.id,
        json!({ "title": title }),
    )
    .await;

    Ok(api::ok(proposal::get(&pool, prop.id).await?))
}

/// POST /api/v1/proposals/{id}/status
pub async fn update_status(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let prop = proposal::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let status = ProposalStatus::parse(&body.status).ok_or_else(|| {
        AppError::invalid_field("status", format!("Unknown status '{}'", body.status))
    })?;

    proposal::update_status(&pool, prop.id, status).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "proposal.status_changed",
        "proposal",
        prop.id,
        json!({ "status": status.as_str() }),
    )
    .await;

    Ok(api::ok(proposal::get(&pool, prop.id).await?))
}

/// DELETE /api/v1/proposals/{id} — owner only; cascades to blocks, link
/// and snapshots.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let prop = proposal::get(&pool, path.into_inner()).await?;
    workspace::require_owner(&pool, user_id, prop.workspace_id).await?;

    proposal::delete(&pool, prop.id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "proposal.deleted",
        "proposal",
        prop.id,
        json!({ "title": prop.title }),
    )
    .await;

    Ok(api::ok(json!({ "deleted": prop.id })))
}
