use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::FieldError;
use crate::errors::AppError;

/// Closed set of block types a proposal can contain. Adding a variant is a
/// compile-time event: `validate_props`, `default_props` and the registry
/// metadata all dispatch via exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Hero,
    Text,
    Timeline,
    Cases,
    Faq,
    Pricing,
    Quote,
    Cta,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Hero,
        BlockType::Text,
        BlockType::Timeline,
        BlockType::Cases,
        BlockType::Faq,
        BlockType::Pricing,
        BlockType::Quote,
        BlockType::Cta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Hero => "hero",
            BlockType::Text => "text",
            BlockType::Timeline => "timeline",
            BlockType::Cases => "cases",
            BlockType::Faq => "faq",
            BlockType::Pricing => "pricing",
            BlockType::Quote => "quote",
            BlockType::Cta => "cta",
        }
    }

    /// Parse a stored or user-supplied tag. Fails closed: an unregistered
    /// tag is never accepted.
    pub fn parse(s: &str) -> Option<BlockType> {
        match s {
            "hero" => Some(BlockType::Hero),
            "text" => Some(BlockType::Text),
            "timeline" => Some(BlockType::Timeline),
            "cases" => Some(BlockType::Cases),
            "faq" => Some(BlockType::Faq),
            "pricing" => Some(BlockType::Pricing),
            "quote" => Some(BlockType::Quote),
            "cta" => Some(BlockType::Cta),
            _ => None,
        }
    }

    /// Whether props of this type embed foreign-id arrays that the
    /// reference resolver expands at publish time.
    pub fn has_references(self) -> bool {
        matches!(self, BlockType::Cases | BlockType::Faq)
    }
}

// Typed props schemas, one per block type. `deny_unknown_fields` keeps
// stray keys from riding along into storage.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroProps {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextProps {
    #[serde(default)]
    pub heading: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineProps {
    #[serde(default)]
    pub heading: String,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CasesProps {
    #[serde(default)]
    pub heading: String,
    pub case_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqProps {
    #[serde(default)]
    pub heading: String,
    pub faq_item_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingRow {
    pub label: String,
    pub amount: f64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingProps {
    #[serde(default)]
    pub heading: String,
    pub currency: String,
    pub rows: Vec<PricingRow>,
    #[serde(default)]
    pub show_total: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteProps {
    pub text: String,
    #[serde(default)]
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CtaProps {
    pub heading: String,
    #[serde(default)]
    pub body: String,
    pub button_label: String,
    pub button_url: String,
}

/// Validate a props payload against the schema for `block_type`. Rejected
/// payloads are never stored, not even partially.
pub fn validate_props(block_type: BlockType, props: &Value) -> Result<(), AppError> {
    let result = match block_type {
        BlockType::Hero => serde_json::from_value::<HeroProps>(props.clone()).map(drop),
        BlockType::Text => serde_json::from_value::<TextProps>(props.clone()).map(drop),
        BlockType::Timeline => serde_json::from_value::<TimelineProps>(props.clone()).map(drop),
        BlockType::Cases => serde_json::from_value::<CasesProps>(props.clone()).map(drop),
        BlockType::Faq => serde_json::from_value::<FaqProps>(props.clone()).map(drop),
        BlockType::Pricing => serde_json::from_value::<PricingProps>(props.clone()).map(drop),
        BlockType::Quote => serde_json::from_value::<QuoteProps>(props.clone()).map(drop),
        BlockType::Cta => serde_json::from_value::<CtaProps>(props.clone()).map(drop),
    };

    result.map_err(|e| AppError::Validation {
        message: format!("Invalid props for {} block: {e}", block_type.as_str()),
        field_errors: vec![FieldError {
            field: "props".to_string(),
            message: e.to_string(),
        }],
    })
}

/// A block as stored: typed tag, dense position, schema-validated props.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub id: i64,
    pub proposal_id: i64,
    pub block_type: BlockType,
    pub order_index: i64,
    pub props: Value,
    pub style_overrides: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_round_trips_every_type() {
        for bt in BlockType::ALL {
            assert_eq!(BlockType::parse(bt.as_str()), Some(bt));
        }
        assert_eq!(BlockType::parse("carousel"), None);
    }

    #[test]
    fn hero_props_require_title() {
        assert!(validate_props(BlockType::Hero, &json!({"title": "Hi"})).is_ok());
        let err = validate_props(BlockType::Hero, &json!({"subtitle": "no title"}));
        assert!(matches!(err, Err(AppError::Validation { .. })));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = validate_props(
            BlockType::Quote,
            &json!({"text": "x", "font_size": 12}),
        );
        assert!(matches!(err, Err(AppError::Validation { .. })));
    }

    #[test]
    fn only_cases_and_faq_carry_references() {
        for bt in BlockType::ALL {
            let expected = bt == BlockType::Cases || bt == BlockType::Faq;
            assert_eq!(bt.has_references(), expected);
        }
    }
}
