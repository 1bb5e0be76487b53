use super::types::{Proposal, ProposalStatus};
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(sqlx::FromRow)]
struct ProposalRow {
    id: i64,
    workspace_id: i64,
    title: String,
    client_name: String,
    status: String,
    created_by: i64,
    created_at: String,
    updated_at: String,
}

impl ProposalRow {
    fn into_proposal(self) -> Result<Proposal, AppError> {
        let status = ProposalStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!(
                "Stored proposal {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Proposal {
            id: self.id,
            workspace_id: self.workspace_id,
            title: self.title,
            client_name: self.client_name,
            status,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const COLUMNS: &str =
    "id, workspace_id, title, client_name, status, created_by, created_at, updated_at";

pub async fn create(
    pool: &DbPool,
    workspace_id: i64,
    title: &str,
    client_name: &str,
    created_by: i64,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO proposals (workspace_id, title, client_name, created_by) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(workspace_id)
    .bind(title)
    .bind(client_name)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Proposal>, AppError> {
    let row = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(ProposalRow::into_proposal).transpose()
}

/// Like `find_by_id` but a missing row is an error, for call sites that
/// already hold an id.
pub async fn get(pool: &DbPool, id: i64) -> Result<Proposal, AppError> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Proposal"))
}

pub async fn list_for_workspace(
    pool: &DbPool,
    workspace_id: i64,
) -> Result<Vec<Proposal>, AppError> {
    let rows = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE workspace_id = $1 ORDER BY updated_at DESC, id DESC"
    ))
    .bind(workspace_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ProposalRow::into_proposal).collect()
}

pub async fn rename(
    pool: &DbPool,
    id: i64,
    title: &str,
    client_name: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals SET title = $1, client_name = $2, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now') WHERE id = $3",
    )
    .bind(title)
    .bind(client_name)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_status(
    pool: &DbPool,
    id: i64,
    status: ProposalStatus,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals SET status = $1, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now') WHERE id = $2",
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a proposal; blocks, link and snapshots go with it via cascade.
pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM proposals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
