//! Translation of block attributes
//!
//! Only string values under a known set of keys are translated. Nested
//! mappings and lists are walked with a narrower key set, whatever key
//! they sit under. Everything else is copied as is.

use blockdoc::{AttributeValue, Attributes};
use tracing::warn;

use crate::classifier::is_non_translatable;
use crate::context::{BoxFuture, TranslationContext};

/// Nesting limit for attribute values
pub const MAX_ATTRIBUTE_DEPTH: usize = 64;

const TOP_LEVEL_KEYS: &[&str] = &[
    "heading",
    "buttonText",
    "title",
    "text",
    "content",
    "description",
    "label",
    "placeholder",
    "caption",
];

const NESTED_KEYS: &[&str] = &["text", "title", "description", "caption"];

/// Which keys are translatable at a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Keys of a block's own attribute mapping
    TopLevel,
    /// Keys of any mapping nested inside an attribute
    Nested,
}

impl KeyScope {
    pub fn includes(self, key: &str) -> bool {
        match self {
            KeyScope::TopLevel => TOP_LEVEL_KEYS.contains(&key),
            KeyScope::Nested => NESTED_KEYS.contains(&key),
        }
    }
}

/// Translate the attributes of one block
///
/// Returns a new mapping with the same keys in the same order. A string
/// whose call fails keeps its source value.
pub async fn translate_attributes(
    ctx: &mut TranslationContext<'_>,
    attributes: &Attributes,
    scope: KeyScope,
) -> Attributes {
    translate_mapping(ctx, attributes, scope, 0).await
}

fn translate_mapping<'a>(
    ctx: &'a mut TranslationContext<'_>,
    attributes: &'a Attributes,
    scope: KeyScope,
    depth: usize,
) -> BoxFuture<'a, Attributes> {
    Box::pin(async move {
        let mut translated = Attributes::with_capacity(attributes.len());
        for (key, value) in attributes {
            let value = match value {
                AttributeValue::String(text) if scope.includes(key) => {
                    AttributeValue::String(translate_leaf(ctx, text).await)
                }
                AttributeValue::Mapping(_) | AttributeValue::List(_) => {
                    translate_nested(ctx, value, depth + 1).await
                }
                other => other.clone(),
            };
            translated.insert(key.clone(), value);
        }
        translated
    })
}

fn translate_nested<'a>(
    ctx: &'a mut TranslationContext<'_>,
    value: &'a AttributeValue,
    depth: usize,
) -> BoxFuture<'a, AttributeValue> {
    Box::pin(async move {
        if depth > MAX_ATTRIBUTE_DEPTH {
            warn!(
                limit = MAX_ATTRIBUTE_DEPTH,
                "attribute nested too deeply, left untranslated"
            );
            return value.clone();
        }

        match value {
            AttributeValue::Mapping(mapping) => AttributeValue::Mapping(
                translate_mapping(ctx, mapping, KeyScope::Nested, depth).await,
            ),
            AttributeValue::List(items) => {
                let mut translated = Vec::with_capacity(items.len());
                for item in items {
                    // List entries are keyed by index, so bare strings never match
                    translated.push(match item {
                        AttributeValue::Mapping(_) | AttributeValue::List(_) => {
                            translate_nested(ctx, item, depth + 1).await
                        }
                        other => other.clone(),
                    });
                }
                AttributeValue::List(translated)
            }
            other => other.clone(),
        }
    })
}

async fn translate_leaf(ctx: &mut TranslationContext<'_>, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    if is_non_translatable(text) {
        ctx.record_skip();
        return text.to_string();
    }
    ctx.translate_text(text)
        .await
        .unwrap_or_else(|| text.to_string())
}
