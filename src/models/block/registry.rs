//! Static catalogue of block types: defaults used when a block is first
//! added, plus the grouping metadata the "add block" picker shows.
//! Pure data lookup, exhaustive over every `BlockType` variant.

use serde::Serialize;
use serde_json::{Value, json};

use super::types::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Structure,
    Content,
    Commercial,
}

impl BlockType {
    pub fn category(self) -> BlockCategory {
        match self {
            BlockType::Hero | BlockType::Cta => BlockCategory::Structure,
            BlockType::Text | BlockType::Timeline | BlockType::Quote | BlockType::Faq => {
                BlockCategory::Content
            }
            BlockType::Cases | BlockType::Pricing => BlockCategory::Commercial,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockType::Hero => "Hero",
            BlockType::Text => "Text",
            BlockType::Timeline => "Timeline",
            BlockType::Cases => "Case studies",
            BlockType::Faq => "FAQ",
            BlockType::Pricing => "Pricing",
            BlockType::Quote => "Quote",
            BlockType::Cta => "Call to action",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BlockType::Hero => "Opening section with title, subtitle and cover image",
            BlockType::Text => "Free-form rich text section",
            BlockType::Timeline => "Project phases with dates",
            BlockType::Cases => "Grid of selected case studies",
            BlockType::Faq => "Selected FAQ items",
            BlockType::Pricing => "Line-item pricing table",
            BlockType::Quote => "Client testimonial or pull quote",
            BlockType::Cta => "Closing call to action with button",
        }
    }

    /// Props a freshly added block starts with. Always valid against the
    /// type's own schema.
    pub fn default_props(self) -> Value {
        match self {
            BlockType::Hero => json!({
                "title": "Untitled proposal",
                "subtitle": "",
                "image_url": null,
            }),
            BlockType::Text => json!({
                "heading": null,
                "body": "",
            }),
            BlockType::Timeline => json!({
                "heading": "Timeline",
                "items": [],
            }),
            BlockType::Cases => json!({
                "heading": "Our work",
                "case_ids": [],
            }),
            BlockType::Faq => json!({
                "heading": "Frequently asked questions",
                "faq_item_ids": [],
            }),
            BlockType::Pricing => json!({
                "heading": "Investment",
                "currency": "EUR",
                "rows": [],
                "show_total": true,
            }),
            BlockType::Quote => json!({
                "text": "",
                "attribution": null,
            }),
            BlockType::Cta => json!({
                "heading": "Ready to get started?",
                "body": "",
                "button_label": "Accept proposal",
                "button_url": "",
            }),
        }
    }
}

/// One picker entry per registered type, grouped client-side by category.
#[derive(Debug, Clone, Serialize)]
pub struct PickerEntry {
    pub block_type: BlockType,
    pub label: &'static str,
    pub description: &'static str,
    pub category: BlockCategory,
}

pub fn picker_entries() -> Vec<PickerEntry> {
    BlockType::ALL
        .iter()
        .map(|&bt| PickerEntry {
            block_type: bt,
            label: bt.label(),
            description: bt.description(),
            category: bt.category(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::types::validate_props;

    #[test]
    fn default_props_validate_for_every_type() {
        for bt in BlockType::ALL {
            validate_props(bt, &bt.default_props())
                .unwrap_or_else(|e| panic!("defaults for {} invalid: {e}", bt.as_str()));
        }
    }

    #[test]
    fn picker_covers_every_type() {
        let entries = picker_entries();
        assert_eq!(entries.len(), BlockType::ALL.len());
    }
}
