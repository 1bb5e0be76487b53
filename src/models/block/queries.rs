use serde_json::Value;
use sqlx::SqliteConnection;

use super::ordering;
use super::types::{Block, BlockType, validate_props};
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(sqlx::FromRow)]
pub(crate) struct BlockRow {
    pub id: i64,
    pub proposal_id: i64,
    pub block_type: String,
    pub order_index: i64,
    pub props: String,
    pub style_overrides: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BlockRow {
    pub(crate) fn into_block(self) -> Result<Block, AppError> {
        // A tag we no longer recognize means a corrupt store, not bad input.
        let block_type = BlockType::parse(&self.block_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Stored block {} has unregistered type '{}'",
                self.id, self.block_type
            ))
        })?;
        let props: Value = serde_json::from_str(&self.props)?;
        let style_overrides = match self.style_overrides {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };
        Ok(Block {
            id: self.id,
            proposal_id: self.proposal_id,
            block_type,
            order_index: self.order_index,
            props,
            style_overrides,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const BLOCK_COLUMNS: &str = "id, proposal_id, block_type, order_index, props, \
                             style_overrides, created_at, updated_at";

pub async fn get(pool: &DbPool, block_id: i64) -> Result<Block, AppError> {
    let row = sqlx::query_as::<_, BlockRow>(&format!(
        "SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = $1"
    ))
    .bind(block_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Block"))?;
    row.into_block()
}

/// All blocks of a proposal in display order.
pub async fn list(pool: &DbPool, proposal_id: i64) -> Result<Vec<Block>, AppError> {
    let rows = sqlx::query_as::<_, BlockRow>(&format!(
        "SELECT {BLOCK_COLUMNS} FROM blocks WHERE proposal_id = $1 ORDER BY order_index"
    ))
    .bind(proposal_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(BlockRow::into_block).collect()
}

/// Create a block. With `order_index = None` the block is appended; with an
/// explicit index it is inserted at that position (clamped to the current
/// range) and the siblings are renumbered densely, all in one transaction.
pub async fn create(
    pool: &DbPool,
    proposal_id: i64,
    block_type: BlockType,
    props: Value,
    order_index: Option<i64>,
) -> Result<Block, AppError> {
    validate_props(block_type, &props)?;
    let props_raw = serde_json::to_string(&props)?;
    let now = now_rfc3339();

    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM proposals WHERE id = $1")
        .bind(proposal_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Proposal"));
    }

    let siblings = ordering::sibling_ids(&mut tx, proposal_id).await?;

    // Append first with a tail index; an explicit position is then applied
    // as a dense renumber over the full sibling set.
    let new_id: i64 = sqlx::query_scalar(
        "INSERT INTO blocks (proposal_id, block_type, order_index, props, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) RETURNING id",
    )
    .bind(proposal_id)
    .bind(block_type.as_str())
    .bind(siblings.len() as i64)
    .bind(&props_raw)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(idx) = order_index {
        let pos = idx.clamp(0, siblings.len() as i64) as usize;
        let mut ids = siblings;
        ids.insert(pos, new_id);
        ordering::renumber(&mut tx, proposal_id, &ids).await?;
    }

    tx.commit().await?;
    get(pool, new_id).await
}

/// Partial update: whichever of `props` / `style_overrides` is `None` stays
/// untouched. `props` must validate against the stored block's type before
/// anything is written.
pub async fn update(
    pool: &DbPool,
    block_id: i64,
    props: Option<Value>,
    style_overrides: Option<Value>,
) -> Result<Block, AppError> {
    let current = get(pool, block_id).await?;

    if let Some(ref p) = props {
        validate_props(current.block_type, p)?;
    }

    let now = now_rfc3339();
    match (&props, &style_overrides) {
        (Some(p), Some(s)) => {
            sqlx::query(
                "UPDATE blocks SET props = $1, style_overrides = $2, updated_at = $3 WHERE id = $4",
            )
            .bind(serde_json::to_string(p)?)
            .bind(serde_json::to_string(s)?)
            .bind(&now)
            .bind(block_id)
            .execute(pool)
            .await?;
        }
        (Some(p), None) => {
            sqlx::query("UPDATE blocks SET props = $1, updated_at = $2 WHERE id = $3")
                .bind(serde_json::to_string(p)?)
                .bind(&now)
                .bind(block_id)
                .execute(pool)
                .await?;
        }
        (None, Some(s)) => {
            sqlx::query("UPDATE blocks SET style_overrides = $1, updated_at = $2 WHERE id = $3")
                .bind(serde_json::to_string(s)?)
                .bind(&now)
                .bind(block_id)
                .execute(pool)
                .await?;
        }
        (None, None) => return Ok(current),
    }

    get(pool, block_id).await
}

/// Delete a block and compact the sibling order in the same transaction,
/// so the dense 0..N-1 invariant holds immediately after every delete.
pub async fn delete(pool: &DbPool, block_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let proposal_id: Option<(i64,)> =
        sqlx::query_as("SELECT proposal_id FROM blocks WHERE id = $1")
            .bind(block_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (proposal_id,) = proposal_id.ok_or_else(|| AppError::not_found("Block"))?;

    sqlx::query("DELETE FROM blocks WHERE id = $1")
        .bind(block_id)
        .execute(&mut *tx)
        .await?;

    ordering::compact_order(&mut tx, proposal_id).await?;
    tx.commit().await?;
    Ok(())
}

pub(crate) async fn get_in_tx(
    conn: &mut SqliteConnection,
    block_id: i64,
) -> Result<Option<BlockRow>, AppError> {
    let row = sqlx::query_as::<_, BlockRow>(&format!(
        "SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = $1"
    ))
    .bind(block_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
