use crate::db::DbPool;
use crate::errors::AppError;

pub async fn create(pool: &DbPool, name: &str) -> Result<i64, AppError> {
    let id = sqlx::query_scalar("INSERT INTO workspaces (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub async fn add_member(
    pool: &DbPool,
    workspace_id: i64,
    user_id: i64,
    role: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO workspace_members (workspace_id, user_id, role) VALUES ($1, $2, $3) \
         ON CONFLICT(workspace_id, user_id) DO UPDATE SET role = excluded.role",
    )
    .bind(workspace_id)
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}

/// Membership role of a user in a workspace, if any.
pub async fn membership_role(
    pool: &DbPool,
    user_id: i64,
    workspace_id: i64,
) -> Result<Option<String>, AppError> {
    let role: Option<(String,)> = sqlx::query_as(
        "SELECT role FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
    )
    .bind(workspace_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(role.map(|r| r.0))
}

/// Authorization gate: any membership suffices. Fail-closed, a missing row
/// means no access.
pub async fn require_member(
    pool: &DbPool,
    user_id: i64,
    workspace_id: i64,
) -> Result<(), AppError> {
    match membership_role(pool, user_id, workspace_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Authorization(
            "Not a member of this workspace".to_string(),
        )),
    }
}

/// Owner-only gate for destructive workspace-level operations.
pub async fn require_owner(
    pool: &DbPool,
    user_id: i64,
    workspace_id: i64,
) -> Result<(), AppError> {
    match membership_role(pool, user_id, workspace_id).await?.as_deref() {
        Some("owner") => Ok(()),
        Some(_) => Err(AppError::Authorization(
            "Workspace owner role required".to_string(),
        )),
        None => Err(AppError::Authorization(
            "Not a member of this workspace".to_string(),
        )),
    }
}
