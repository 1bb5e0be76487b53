//! Publishing pipeline: freeze the live proposal into an immutable,
//! version-pinned snapshot behind a stable public slug.
//!
//! The link and the snapshot are written in one transaction, so a failed
//! first publish can never leave a "published" link with zero snapshots.
//! Republishing reuses the link (same slug) and appends a fresh snapshot.

use serde::Serialize;
use serde_json::Value;
use sqlx::SqliteConnection;

use super::resolver;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{block, brand, proposal};

/// What `publish` hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub slug: String,
    pub snapshot_id: i64,
}

/// The public viewer's read model: the newest snapshot for a slug, fully
/// self-contained.
#[derive(Debug, Clone, Serialize)]
pub struct PublicDocument {
    pub slug: String,
    pub brand: Option<Value>,
    pub blocks: Value,
    pub meta: SnapshotMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMeta {
    pub version: i64,
    pub published_at: String,
    pub published_by: i64,
}

/// Normalize a proposal title into a URL-safe base slug: lowercase, every
/// run of non-alphanumeric characters collapsed to a single hyphen, no
/// leading or trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "proposal".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Probe `base`, `base-1`, `base-2`, ... until an unused slug is found.
/// The probe is advisory; the UNIQUE constraint on `public_links.slug` is
/// the authoritative guard and the caller retries on conflict.
async fn next_free_slug(conn: &mut SqliteConnection, base: &str) -> Result<String, AppError> {
    let mut candidate = base.to_string();
    let mut counter: u32 = 1;
    loop {
        let taken: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM public_links WHERE slug = $1")
            .bind(&candidate)
            .fetch_optional(&mut *conn)
            .await?;
        if taken.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Publish a proposal.
///
/// Reuses the proposal's existing public link if one exists (the slug is
/// stable for the life of the proposal); otherwise mints a collision-free
/// slug from the title. Always appends a brand-new snapshot carrying the
/// resolved blocks, the workspace brand settings (or null) and publish
/// metadata.
pub async fn publish(
    pool: &DbPool,
    proposal_id: i64,
    published_by: i64,
) -> Result<PublishOutcome, AppError> {
    let prop = proposal::get(pool, proposal_id).await?;

    let brand_settings = brand::find_by_workspace(pool, prop.workspace_id).await?;
    let live_blocks = block::list(pool, proposal_id).await?;
    let resolved = resolver::resolve_blocks(pool, prop.workspace_id, &live_blocks).await?;

    let brand_raw = brand_settings
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let blocks_raw = serde_json::to_string(&resolved)?;
    let published_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    // Bounded retry: a concurrent publish of another proposal can win the
    // probed slug between our SELECT and INSERT.
    for _ in 0..3 {
        let mut tx = pool.begin().await?;

        let existing: Option<(i64, String)> =
            sqlx::query_as("SELECT id, slug FROM public_links WHERE proposal_id = $1")
                .bind(proposal_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (link_id, slug) = match existing {
            Some((id, slug)) => (id, slug),
            None => {
                let base = slugify(&prop.title);
                let candidate = next_free_slug(&mut tx, &base).await?;
                let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
                    "INSERT INTO public_links (proposal_id, slug, created_by) \
                     VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(proposal_id)
                .bind(&candidate)
                .bind(published_by)
                .fetch_one(&mut *tx)
                .await;
                match inserted {
                    Ok(id) => (id, candidate),
                    Err(e) if is_unique_violation(&e) => {
                        tx.rollback().await?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let prior: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM proposal_snapshots WHERE public_link_id = $1")
                .bind(link_id)
                .fetch_one(&mut *tx)
                .await?;

        let snapshot_id: i64 = sqlx::query_scalar(
            "INSERT INTO proposal_snapshots \
                 (public_link_id, proposal_id, brand, blocks, version, published_at, published_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(link_id)
        .bind(proposal_id)
        .bind(&brand_raw)
        .bind(&blocks_raw)
        .bind(prior + 1)
        .bind(&published_at)
        .bind(published_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        return Ok(PublishOutcome { slug, snapshot_id });
    }

    Err(AppError::Internal(
        "Could not allocate a unique slug after repeated conflicts".to_string(),
    ))
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    slug: String,
    brand: Option<String>,
    blocks: String,
    version: i64,
    published_at: String,
    published_by: i64,
}

/// The newest snapshot behind an active slug. Reads snapshots only; live
/// block edits after a publish are invisible here until the next publish.
pub async fn latest_snapshot_by_slug(
    pool: &DbPool,
    slug: &str,
) -> Result<Option<PublicDocument>, AppError> {
    let row = sqlx::query_as::<_, SnapshotRow>(
        "SELECT l.slug, s.brand, s.blocks, s.version, s.published_at, s.published_by \
         FROM proposal_snapshots s \
         JOIN public_links l ON l.id = s.public_link_id \
         WHERE l.slug = $1 AND l.is_active = 1 \
         ORDER BY s.id DESC LIMIT 1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => Ok(Some(PublicDocument {
            slug: r.slug,
            brand: r.brand.map(|b| serde_json::from_str(&b)).transpose()?,
            blocks: serde_json::from_str(&r.blocks)?,
            meta: SnapshotMeta {
                version: r.version,
                published_at: r.published_at,
                published_by: r.published_by,
            },
        })),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_collapses_symbol_runs() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("Acme Corp!!!"), "acme-corp");
        assert_eq!(slugify("  --Acme__ &Co--  "), "acme-co");
    }

    #[test]
    fn slugify_handles_empty_and_symbol_only_titles() {
        assert_eq!(slugify(""), "proposal");
        assert_eq!(slugify("!!!"), "proposal");
    }

    #[test]
    fn slugify_lowercases() {
        assert_eq!(slugify("Website Redesign 2026"), "website-redesign-2026");
    }
}
