//! Append-only audit trail for mutating operations. Call sites treat this
//! as fire-and-forget (`let _ = audit::log(...)`): a failed audit write is
//! logged but never fails the operation it describes.

use serde_json::Value;

use crate::db::DbPool;
use crate::errors::AppError;

pub async fn log(
    pool: &DbPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await;

    if let Err(e) = &result {
        log::warn!("Audit write failed for {action} on {target_type}/{target_id}: {e}");
    }
    result.map(drop).map_err(Into::into)
}
