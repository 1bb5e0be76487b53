//! Reference resolver: turns live blocks into the self-contained form a
//! snapshot stores. Foreign-id arrays inside block props (`case_ids`,
//! `faq_item_ids`) are expanded into inlined records, fetched with one
//! batch query per collection. Ids that no longer resolve are dropped
//! silently; a deleted case must not fail the whole publish.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::block::types::{Block, BlockType, CasesProps, FaqProps};
use crate::models::{case, faq};

/// A block with its references inlined. This is what gets frozen into a
/// snapshot; it never points back at live rows.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBlock {
    pub id: i64,
    pub block_type: BlockType,
    pub order_index: i64,
    pub props: Value,
    pub style_overrides: Option<Value>,
}

pub async fn resolve_blocks(
    pool: &DbPool,
    workspace_id: i64,
    blocks: &[Block],
) -> Result<Vec<ResolvedBlock>, AppError> {
    let mut case_ids: Vec<i64> = vec![];
    let mut faq_ids: Vec<i64> = vec![];

    for block in blocks {
        match block.block_type {
            BlockType::Cases => case_ids.extend(cases_refs(&block.props)),
            BlockType::Faq => faq_ids.extend(faq_refs(&block.props)),
            _ => {}
        }
    }

    let cases_by_id: HashMap<i64, _> = case::find_by_ids(pool, workspace_id, &case_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let faqs_by_id: HashMap<i64, _> = faq::find_by_ids(pool, workspace_id, &faq_ids)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let mut resolved = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut props = block.props.clone();
        match block.block_type {
            BlockType::Cases => {
                let inlined: Vec<Value> = cases_refs(&block.props)
                    .into_iter()
                    .filter_map(|id| cases_by_id.get(&id))
                    .map(|c| serde_json::to_value(c).unwrap_or(Value::Null))
                    .collect();
                if let Some(obj) = props.as_object_mut() {
                    obj.insert("cases".to_string(), Value::Array(inlined));
                }
            }
            BlockType::Faq => {
                let inlined: Vec<Value> = faq_refs(&block.props)
                    .into_iter()
                    .filter_map(|id| faqs_by_id.get(&id))
                    .map(|f| serde_json::to_value(f).unwrap_or(Value::Null))
                    .collect();
                if let Some(obj) = props.as_object_mut() {
                    obj.insert("faq_items".to_string(), Value::Array(inlined));
                }
            }
            _ => {}
        }
        resolved.push(ResolvedBlock {
            id: block.id,
            block_type: block.block_type,
            order_index: block.order_index,
            props,
            style_overrides: block.style_overrides.clone(),
        });
    }

    Ok(resolved)
}

// Props were schema-validated when stored; a row that fails to parse here
// is treated as carrying no references rather than blocking the publish.

fn cases_refs(props: &Value) -> Vec<i64> {
    serde_json::from_value::<CasesProps>(props.clone())
        .map(|p| p.case_ids)
        .unwrap_or_default()
}

fn faq_refs(props: &Value) -> Vec<i64> {
    serde_json::from_value::<FaqProps>(props.clone())
        .map(|p| p.faq_item_ids)
        .unwrap_or_default()
}
