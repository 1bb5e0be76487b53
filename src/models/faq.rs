//! FAQ items, the second resolver-backed collection.

use serde::Serialize;
use sqlx::QueryBuilder;

use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FaqItem {
    pub id: i64,
    pub workspace_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "id, workspace_id, question, answer, created_at, updated_at";

pub async fn create(
    pool: &DbPool,
    workspace_id: i64,
    question: &str,
    answer: &str,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO faq_items (workspace_id, question, answer) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(workspace_id)
    .bind(question)
    .bind(answer)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn get(pool: &DbPool, id: i64) -> Result<FaqItem, AppError> {
    sqlx::query_as::<_, FaqItem>(&format!("SELECT {COLUMNS} FROM faq_items WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("FAQ item"))
}

pub async fn update(pool: &DbPool, id: i64, question: &str, answer: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE faq_items SET question = $1, answer = $2, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now') WHERE id = $3",
    )
    .bind(question)
    .bind(answer)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM faq_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_for_workspace(pool: &DbPool, workspace_id: i64) -> Result<Vec<FaqItem>, AppError> {
    let rows = sqlx::query_as::<_, FaqItem>(&format!(
        "SELECT {COLUMNS} FROM faq_items WHERE workspace_id = $1 ORDER BY id"
    ))
    .bind(workspace_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_ids(
    pool: &DbPool,
    workspace_id: i64,
    ids: &[i64],
) -> Result<Vec<FaqItem>, AppError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM faq_items WHERE workspace_id = "
    ));
    builder.push_bind(workspace_id);
    builder.push(" AND id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    builder.push(")");

    let rows = builder.build_query_as::<FaqItem>().fetch_all(pool).await?;
    Ok(rows)
}
