use actix_web::{HttpResponse, web};

use crate::api;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::publish;

/// GET /p/{slug} — the public viewer. No session required; serves the
/// newest snapshot for the slug and never reads live blocks.
pub async fn view(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    match publish::latest_snapshot_by_slug(&pool, &slug).await? {
        Some(doc) => Ok(api::ok(doc)),
        None => Err(AppError::not_found("Published document")),
    }
}
