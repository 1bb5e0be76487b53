//! Case studies: one of the two collections block props can reference by
//! id. The resolver inlines them at publish time via `find_by_ids`.

use serde::Serialize;
use sqlx::QueryBuilder;

use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CaseStudy {
    pub id: i64,
    pub workspace_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "id, workspace_id, title, description, image_url, link_url, \
                       created_at, updated_at";

pub async fn create(
    pool: &DbPool,
    workspace_id: i64,
    title: &str,
    description: &str,
    image_url: Option<&str>,
    link_url: Option<&str>,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO cases (workspace_id, title, description, image_url, link_url) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(workspace_id)
    .bind(title)
    .bind(description)
    .bind(image_url)
    .bind(link_url)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn get(pool: &DbPool, id: i64) -> Result<CaseStudy, AppError> {
    sqlx::query_as::<_, CaseStudy>(&format!("SELECT {COLUMNS} FROM cases WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Case study"))
}

pub async fn update(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: &str,
    image_url: Option<&str>,
    link_url: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE cases SET title = $1, description = $2, image_url = $3, link_url = $4, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now') WHERE id = $5",
    )
    .bind(title)
    .bind(description)
    .bind(image_url)
    .bind(link_url)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM cases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_for_workspace(
    pool: &DbPool,
    workspace_id: i64,
) -> Result<Vec<CaseStudy>, AppError> {
    let rows = sqlx::query_as::<_, CaseStudy>(&format!(
        "SELECT {COLUMNS} FROM cases WHERE workspace_id = $1 ORDER BY id"
    ))
    .bind(workspace_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Batch lookup for the resolver: one query per publish, not one per block.
/// Ids that no longer exist (or belong to another workspace) are simply
/// absent from the result.
pub async fn find_by_ids(
    pool: &DbPool,
    workspace_id: i64,
    ids: &[i64],
) -> Result<Vec<CaseStudy>, AppError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM cases WHERE workspace_id = "
    ));
    builder.push_bind(workspace_id);
    builder.push(" AND id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    builder.push(")");

    let rows = builder.build_query_as::<CaseStudy>().fetch_all(pool).await?;
    Ok(rows)
}
