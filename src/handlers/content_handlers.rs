//! Workspace content library: case studies, FAQ items and brand settings.
//! Blocks reference cases and FAQ items by id; the publish pipeline inlines
//! them into snapshots.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api;
use crate::audit;
use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::brand::BrandSettings;
use crate::models::{brand, case, faq, workspace};

#[derive(Deserialize)]
pub struct CaseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
}

#[derive(Deserialize)]
pub struct FaqRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Deserialize)]
pub struct BrandRequest {
    #[serde(default)]
    pub colors: Value,
    #[serde(default)]
    pub typography: Value,
    #[serde(default)]
    pub components: Value,
    #[serde(default)]
    pub seo: Value,
    pub logo_url: Option<String>,
}

/// GET /api/v1/workspaces/{workspace_id}/cases
pub async fn list_cases(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    Ok(api::ok(case::list_for_workspace(&pool, workspace_id).await?))
}

/// POST /api/v1/workspaces/{workspace_id}/cases
pub async fn create_case(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<CaseRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    let id = case::create(
        &pool,
        workspace_id,
        title,
        body.description.trim(),
        body.image_url.as_deref(),
        body.link_url.as_deref(),
    )
    .await?;

    let _ = audit::log(
        &pool,
        user_id,
        "case.created",
        "case",
        id,
        json!({ "workspace_id": workspace_id, "title": title }),
    )
    .await;

    Ok(api::ok(case::get(&pool, id).await?))
}

/// PATCH /api/v1/cases/{id}
pub async fn update_case(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<CaseRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let existing = case::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, existing.workspace_id).await?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    case::update(
        &pool,
        existing.id,
        title,
        body.description.trim(),
        body.image_url.as_deref(),
        body.link_url.as_deref(),
    )
    .await?;

    Ok(api::ok(case::get(&pool, existing.id).await?))
}

/// DELETE /api/v1/cases/{id} — blocks referencing this case keep the stale
/// id; the resolver drops it at the next publish.
pub async fn delete_case(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let existing = case::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, existing.workspace_id).await?;

    case::delete(&pool, existing.id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "case.deleted",
        "case",
        existing.id,
        json!({ "title": existing.title }),
    )
    .await;

    Ok(api::ok(json!({ "deleted": existing.id })))
}

/// GET /api/v1/workspaces/{workspace_id}/faq-items
pub async fn list_faq_items(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    Ok(api::ok(faq::list_for_workspace(&pool, workspace_id).await?))
}

/// POST /api/v1/workspaces/{workspace_id}/faq-items
pub async fn create_faq_item(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<FaqRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::invalid_field("question", "Question is required"));
    }

    let id = faq::create(&pool, workspace_id, question, body.answer.trim()).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "faq.created",
        "faq_item",
        id,
        json!({ "workspace_id": workspace_id }),
    )
    .await;

    Ok(api::ok(faq::get(&pool, id).await?))
}

/// PATCH /api/v1/faq-items/{id}
pub async fn update_faq_item(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<FaqRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let existing = faq::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, existing.workspace_id).await?;

    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::invalid_field("question", "Question is required"));
    }

    faq::update(&pool, existing.id, question, body.answer.trim()).await?;

    Ok(api::ok(faq::get(&pool, existing.id).await?))
}

/// DELETE /api/v1/faq-items/{id}
pub async fn delete_faq_item(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let existing = faq::get(&pool, path.into_inner()).await?;
    workspace::require_member(&pool, user_id, existing.workspace_id).await?;

    faq::delete(&pool, existing.id).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "faq.deleted",
        "faq_item",
        existing.id,
        json!({}),
    )
    .await;

    Ok(api::ok(json!({ "deleted": existing.id })))
}

/// GET /api/v1/workspaces/{workspace_id}/brand — null until first saved.
pub async fn get_brand(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    Ok(api::ok(brand::find_by_workspace(&pool, workspace_id).await?))
}

/// PUT /api/v1/workspaces/{workspace_id}/brand — full replacement. Only
/// affects future snapshots; already-published ones keep their brand copy.
pub async fn put_brand(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<BrandRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let workspace_id = path.into_inner();
    workspace::require_member(&pool, user_id, workspace_id).await?;

    let body = body.into_inner();
    let settings = BrandSettings {
        colors: defaulted(body.colors),
        typography: defaulted(body.typography),
        components: defaulted(body.components),
        seo: defaulted(body.seo),
        logo_url: body.logo_url,
    };
    brand::upsert(&pool, workspace_id, &settings).await?;

    let _ = audit::log(
        &pool,
        user_id,
        "brand.updated",
        "workspace",
        workspace_id,
        json!({}),
    )
    .await;

    Ok(api::ok(brand::find_by_workspace(&pool, workspace_id).await?))
}

// Omitted sections are stored as `{}` so readers never see JSON null.
fn defaulted(v: Value) -> Value {
    if v.is_null() { json!({}) } else { v }
}
