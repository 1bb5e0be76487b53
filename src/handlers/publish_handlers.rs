use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::api;
use crate::audit;
use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{proposal, publish, workspace};
use crate::revalidate::{Revalidator, builder_path, public_path};

/// POST /api/v1/proposals/{id}/publish
///
/// Idempotent with respect to the link (the slug is stable across
/// republishes) but always appends a fresh snapshot. Returns
/// `{slug, snapshot_id}`.
pub async fn publish(
    pool: web::Data<DbPool>,
    session: Session,
    reval: web::Data<Revalidator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let prop = proposal::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, prop.workspace_id).await?;

    let outcome = publish::publish(&pool, prop.id, user_id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "proposal.published",
        "proposal",
        prop.id,
        json!({ "slug": outcome.slug, "snapshot_id": outcome.snapshot_id }),
    )
    .await;
    reval.notify([builder_path(prop.id), public_path(&outcome.slug)]);

    Ok(api::ok(outcome))
}
