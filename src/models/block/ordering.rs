//! Ordering engine: keeps each proposal's `order_index` sequence dense,
//! zero-based and duplicate-free under reorder, duplicate, insert and
//! delete. Every position-affecting write runs inside a single transaction
//! so a failure can never leave a partially renumbered proposal behind.

use std::collections::HashSet;

use sqlx::SqliteConnection;

use super::queries::{self, now_rfc3339};
use super::types::Block;
use crate::db::DbPool;
use crate::errors::AppError;

/// Block ids of a proposal in display order.
pub(crate) async fn sibling_ids(
    conn: &mut SqliteConnection,
    proposal_id: i64,
) -> Result<Vec<i64>, AppError> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT id FROM blocks WHERE proposal_id = $1 ORDER BY order_index, id")
            .bind(proposal_id)
            .fetch_all(conn)
            .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Assign `order_index = position` for every id in `ordered_ids`.
pub(crate) async fn renumber(
    conn: &mut SqliteConnection,
    proposal_id: i64,
    ordered_ids: &[i64],
) -> Result<(), AppError> {
    for (position, id) in ordered_ids.iter().enumerate() {
        sqlx::query("UPDATE blocks SET order_index = $1 WHERE id = $2 AND proposal_id = $3")
            .bind(position as i64)
            .bind(id)
            .bind(proposal_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Close any gaps, preserving relative order.
pub(crate) async fn compact_order(
    conn: &mut SqliteConnection,
    proposal_id: i64,
) -> Result<(), AppError> {
    let ids = sibling_ids(&mut *conn, proposal_id).await?;
    renumber(conn, proposal_id, &ids).await
}

/// Reorder a proposal's blocks to match `ordered_ids`.
///
/// `ordered_ids` must be an exact permutation of the current block-id set;
/// a wrong length, a foreign or missing id, or a duplicate is rejected as a
/// validation error with nothing written.
pub async fn reorder(pool: &DbPool, proposal_id: i64, ordered_ids: &[i64]) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let current = sibling_ids(&mut tx, proposal_id).await?;

    if ordered_ids.len() != current.len() {
        return Err(AppError::validation(format!(
            "Expected {} block ids, got {}",
            current.len(),
            ordered_ids.len()
        )));
    }
    let supplied: HashSet<i64> = ordered_ids.iter().copied().collect();
    if supplied.len() != ordered_ids.len() {
        return Err(AppError::validation("Duplicate block id in ordering"));
    }
    let existing: HashSet<i64> = current.iter().copied().collect();
    if supplied != existing {
        return Err(AppError::validation(
            "Ordering must contain exactly the proposal's block ids",
        ));
    }

    renumber(&mut tx, proposal_id, ordered_ids).await?;
    tx.commit().await?;
    Ok(())
}

/// Duplicate a block. The copy gets a fresh id, carries the source's type,
/// props and style overrides as of now, and lands immediately after the
/// source; the whole sibling set is then renumbered densely.
pub async fn duplicate(pool: &DbPool, block_id: i64) -> Result<Block, AppError> {
    let mut tx = pool.begin().await?;

    let source = queries::get_in_tx(&mut tx, block_id)
        .await?
        .ok_or_else(|| AppError::not_found("Block"))?;

    let siblings = sibling_ids(&mut tx, source.proposal_id).await?;
    let source_pos = siblings
        .iter()
        .position(|&id| id == block_id)
        .ok_or_else(|| AppError::Internal("Source block missing from its own proposal".into()))?;

    let now = now_rfc3339();
    let new_id: i64 = sqlx::query_scalar(
        "INSERT INTO blocks (proposal_id, block_type, order_index, props, style_overrides, \
                             created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING id",
    )
    .bind(source.proposal_id)
    .bind(&source.block_type)
    .bind(siblings.len() as i64)
    .bind(&source.props)
    .bind(&source.style_overrides)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    let mut ids = siblings;
    ids.insert(source_pos + 1, new_id);
    renumber(&mut tx, source.proposal_id, &ids).await?;

    tx.commit().await?;
    queries::get(pool, new_id).await
}
