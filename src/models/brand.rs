//! Workspace brand settings. At most one row per workspace; publishing with
//! no brand customization is valid, so lookups return `Option`.

use serde::Serialize;
use serde_json::Value;

use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct BrandSettings {
    pub colors: Value,
    pub typography: Value,
    pub components: Value,
    pub seo: Value,
    pub logo_url: Option<String>,
}

#[derive(sqlx::FromRow)]
struct BrandRow {
    colors: String,
    typography: String,
    components: String,
    seo: String,
    logo_url: Option<String>,
}

pub async fn find_by_workspace(
    pool: &DbPool,
    workspace_id: i64,
) -> Result<Option<BrandSettings>, AppError> {
    let row = sqlx::query_as::<_, BrandRow>(
        "SELECT colors, typography, components, seo, logo_url \
         FROM brand_settings WHERE workspace_id = $1",
    )
    .bind(workspace_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => Ok(Some(BrandSettings {
            colors: serde_json::from_str(&r.colors)?,
            typography: serde_json::from_str(&r.typography)?,
            components: serde_json::from_str(&r.components)?,
            seo: serde_json::from_str(&r.seo)?,
            logo_url: r.logo_url,
        })),
        None => Ok(None),
    }
}

pub async fn upsert(
    pool: &DbPool,
    workspace_id: i64,
    settings: &BrandSettings,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO brand_settings (workspace_id, colors, typography, components, seo, logo_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT(workspace_id) DO UPDATE SET \
             colors = excluded.colors, typography = excluded.typography, \
             components = excluded.components, seo = excluded.seo, \
             logo_url = excluded.logo_url, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')",
    )
    .bind(workspace_id)
    .bind(serde_json::to_string(&settings.colors)?)
    .bind(serde_json::to_string(&settings.typography)?)
    .bind(serde_json::to_string(&settings.components)?)
    .bind(serde_json::to_string(&settings.seo)?)
    .bind(&settings.logo_url)
    .execute(pool)
    .await?;
    Ok(())
}
