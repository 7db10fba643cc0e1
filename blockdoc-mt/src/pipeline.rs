//! Whole-document translation
//!
//! Ties the parser, the walker and the renderer together for a post body,
//! and translates the surrounding fields of a [`Document`]: title, excerpt
//! and the selected custom fields.

use blockdoc::{AttributeValue, Parser, render};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::is_non_translatable;
use crate::config::TranslationConfig;
use crate::context::{BoxFuture, TranslationContext, TranslationStats};
use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, api_language_code};
use crate::walker::translate_tree;

/// A post to translate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Serialized block body
    #[serde(default)]
    pub content: String,
    /// Language the post is written in, when known
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub custom_fields: IndexMap<String, AttributeValue>,
}

/// Translated block body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyTranslation {
    pub content: String,
    pub stats: TranslationStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedDocument {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// Only the selected fields that had a value
    pub custom_fields: IndexMap<String, AttributeValue>,
    pub translated_fields: usize,
    pub stats: TranslationStats,
}

impl TranslatedDocument {
    /// Summary line for the caller
    pub fn message(&self) -> String {
        let mut message = "Translation completed successfully!".to_string();
        match self.translated_fields {
            0 => {}
            1 => message.push_str(" (1 custom field translated)"),
            n => message.push_str(&format!(" ({} custom fields translated)", n)),
        }
        message
    }
}

/// Translate a serialized block body
///
/// # Errors
///
/// * `MtError::Parse` - The body nests blocks deeper than the parser accepts
/// * `MtError::Render` - The translated tree cannot be serialized
///
/// Failed translation calls do not fail the body; the affected strings
/// stay in the source language and are counted in the stats.
pub async fn translate_document_body(
    translator: &dyn MachineTranslator,
    config: &TranslationConfig,
    body: &str,
) -> MtResult<BodyTranslation> {
    let mut ctx = TranslationContext::from_config(translator, config);
    let content = translate_body(&mut ctx, body).await?;
    Ok(BodyTranslation {
        content,
        stats: ctx.stats(),
    })
}

async fn translate_body(ctx: &mut TranslationContext<'_>, body: &str) -> MtResult<String> {
    if body.is_empty() {
        return Ok(String::new());
    }

    let blocks = Parser::new(body).parse()?;
    debug!(blocks = blocks.len(), "parsed document body");
    let translated = translate_tree(ctx, blocks).await;
    Ok(render(&translated)?)
}

/// Translate a post with its title, excerpt, body and selected custom fields
///
/// # Arguments
///
/// * `custom_field_names` - Names of the custom fields to translate; other
///   fields are not part of the result
///
/// # Errors
///
/// * `MtError::Precondition` - The document is not in the source language
/// * Any error of the title translation
/// * Any error of [`translate_document_body`]
pub async fn translate_document(
    translator: &dyn MachineTranslator,
    config: &TranslationConfig,
    document: &Document,
    custom_field_names: &[String],
) -> MtResult<TranslatedDocument> {
    config.validate()?;

    if let Some(language) = &document.language {
        let source = config.source_code();
        if api_language_code(language) != source {
            return Err(MtError::Precondition(format!(
                "document language '{}' does not match source language '{}'",
                language, source
            )));
        }
    }

    let mut ctx = TranslationContext::from_config(translator, config);

    let title = ctx.try_translate(&document.title).await?;

    let excerpt = if document.excerpt.is_empty() {
        String::new()
    } else {
        ctx.translate_text(&document.excerpt)
            .await
            .unwrap_or_else(|| document.excerpt.clone())
    };

    let content = translate_body(&mut ctx, &document.content).await?;

    let mut custom_fields = IndexMap::new();
    let mut translated_fields = 0;
    for name in custom_field_names {
        let Some(value) = document.custom_fields.get(name) else {
            continue;
        };
        if value.is_empty_value() {
            continue;
        }

        let translated = match value {
            AttributeValue::String(text) if is_non_translatable(text) => {
                ctx.record_skip();
                value.clone()
            }
            AttributeValue::String(text) => match ctx.translate_text(text).await {
                Some(translated) => {
                    translated_fields += 1;
                    AttributeValue::String(translated)
                }
                None => value.clone(),
            },
            AttributeValue::List(_) | AttributeValue::Mapping(_) => {
                translated_fields += 1;
                translate_string_leaves(&mut ctx, value).await
            }
            other => other.clone(),
        };
        custom_fields.insert(name.clone(), translated);
    }

    let result = TranslatedDocument {
        title,
        excerpt,
        content,
        custom_fields,
        translated_fields,
        stats: ctx.stats(),
    };

    info!(
        provider = translator.provider_name(),
        source = ctx.source_lang(),
        target = ctx.target_lang(),
        translated = result.stats.translated,
        skipped = result.stats.skipped,
        failed = result.stats.failed,
        custom_fields = result.translated_fields,
        "document translated"
    );

    Ok(result)
}

/// Translate every string inside a custom field value, whatever its key
fn translate_string_leaves<'a>(
    ctx: &'a mut TranslationContext<'_>,
    value: &'a AttributeValue,
) -> BoxFuture<'a, AttributeValue> {
    Box::pin(async move {
        match value {
            AttributeValue::String(text) => AttributeValue::String(
                ctx.translate_text(text)
                    .await
                    .unwrap_or_else(|| text.clone()),
            ),
            AttributeValue::List(items) => {
                let mut translated = Vec::with_capacity(items.len());
                for item in items {
                    translated.push(translate_string_leaves(ctx, item).await);
                }
                AttributeValue::List(translated)
            }
            AttributeValue::Mapping(mapping) => {
                let mut translated = IndexMap::with_capacity(mapping.len());
                for (key, item) in mapping {
                    translated.insert(key.clone(), translate_string_leaves(ctx, item).await);
                }
                AttributeValue::Mapping(translated)
            }
            other => other.clone(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMode, MockTranslator};

    fn config() -> TranslationConfig {
        TranslationConfig::new("test-key")
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = translate_document_body(&mock, &config(), "").await.unwrap();
        assert_eq!(result.content, "");
        assert_eq!(result.stats, TranslationStats::default());
    }

    #[tokio::test]
    async fn test_body_parse_error() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let depth = blockdoc::Parser::MAX_DEPTH + 1;
        let body = format!(
            "{}<!-- wp:paragraph --><p>tief</p><!-- /wp:paragraph -->{}",
            "<!-- wp:group -->".repeat(depth),
            "<!-- /wp:group -->".repeat(depth)
        );
        let result = translate_document_body(&mock, &config(), &body).await;
        assert!(matches!(result, Err(MtError::Parse(_))));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_still_translated() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let body = "<!-- wp:paragraph --><p>Hallo</p><!-- /wp:paragraph -->\n<!-- /wp:group -->\n<!-- wp:image {\"id\":} /--><!-- wp:heading --><h2>offen</h2>";
        let result = translate_document_body(&mock, &config(), body).await.unwrap();
        assert_eq!(
            result.content,
            "<!-- wp:paragraph --><p>Hallo</p>_EN-US<!-- /wp:paragraph -->\n<!-- /wp:group -->\n<!-- wp:image {\"id\":} /--><!-- wp:heading --><h2>offen</h2>_EN-US"
        );
        assert_eq!(result.stats.translated, 2);
    }

    #[tokio::test]
    async fn test_body_stats() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("zwei");
        let body = "<!-- wp:paragraph --><p>eins</p><!-- /wp:paragraph --><!-- wp:paragraph --><p>zwei</p><!-- /wp:paragraph -->";
        let result = translate_document_body(&mock, &config(), body).await.unwrap();
        assert_eq!(result.stats.translated, 1);
        assert_eq!(result.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_document_language_precondition() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let document = Document {
            title: "Titel".into(),
            language: Some("fr".into()),
            ..Default::default()
        };
        let result = translate_document(&mock, &config(), &document, &[]).await;
        assert!(matches!(result, Err(MtError::Precondition(_))));
        assert_eq!(mock.request_count(), 0);

        let german = Document {
            language: Some("de".into()),
            ..document
        };
        assert!(translate_document(&mock, &config(), &german, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_title_failure_fails_document() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("Titel");
        let document = Document {
            title: "Titel".into(),
            ..Default::default()
        };
        let result = translate_document(&mock, &config(), &document, &[]).await;
        assert!(matches!(result, Err(MtError::Transport(_))));
    }

    #[tokio::test]
    async fn test_excerpt_failure_keeps_original() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("Auszug");
        let document = Document {
            title: "Titel".into(),
            excerpt: "Kurzer Auszug".into(),
            ..Default::default()
        };
        let result = translate_document(&mock, &config(), &document, &[])
            .await
            .unwrap();
        assert_eq!(result.title, "Titel_EN-US");
        assert_eq!(result.excerpt, "Kurzer Auszug");
        assert_eq!(result.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_custom_fields() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let mut custom_fields = IndexMap::new();
        custom_fields.insert("subtitle".to_string(), AttributeValue::from("Untertitel"));
        custom_fields.insert(
            "link".to_string(),
            AttributeValue::from("https://example.com/seite"),
        );
        custom_fields.insert("rating".to_string(), AttributeValue::from(5i64));
        custom_fields.insert("empty".to_string(), AttributeValue::from(""));
        custom_fields.insert(
            "faq".to_string(),
            AttributeValue::List(vec![
                AttributeValue::from("Frage eins"),
                AttributeValue::from(true),
            ]),
        );
        custom_fields.insert("unselected".to_string(), AttributeValue::from("Nicht gewählt"));

        let document = Document {
            title: "Titel".into(),
            custom_fields,
            ..Default::default()
        };
        let result = translate_document(
            &mock,
            &config(),
            &document,
            &fields(&["subtitle", "link", "rating", "empty", "faq", "missing"]),
        )
        .await
        .unwrap();

        assert_eq!(
            result.custom_fields["subtitle"],
            AttributeValue::from("Untertitel_EN-US")
        );
        assert_eq!(
            result.custom_fields["link"],
            AttributeValue::from("https://example.com/seite")
        );
        assert_eq!(result.custom_fields["rating"], AttributeValue::from(5i64));
        assert_eq!(
            result.custom_fields["faq"],
            AttributeValue::List(vec![
                AttributeValue::from("Frage eins_EN-US"),
                AttributeValue::from(true),
            ])
        );
        assert!(!result.custom_fields.contains_key("empty"));
        assert!(!result.custom_fields.contains_key("unselected"));
        assert_eq!(result.translated_fields, 2);
        assert_eq!(result.message(), "Translation completed successfully! (2 custom fields translated)");
    }

    #[tokio::test]
    async fn test_failed_string_field_not_counted() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("kaputt");
        let mut custom_fields = IndexMap::new();
        custom_fields.insert("subtitle".to_string(), AttributeValue::from("ganz kaputt"));
        let document = Document {
            title: "Titel".into(),
            custom_fields,
            ..Default::default()
        };
        let result = translate_document(&mock, &config(), &document, &fields(&["subtitle"]))
            .await
            .unwrap();
        assert_eq!(
            result.custom_fields["subtitle"],
            AttributeValue::from("ganz kaputt")
        );
        assert_eq!(result.translated_fields, 0);
        assert_eq!(result.message(), "Translation completed successfully!");
    }

    #[tokio::test]
    async fn test_non_translatable_string_fields_are_copied_without_a_call() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let mut custom_fields = IndexMap::new();
        custom_fields.insert("link".to_string(), AttributeValue::from("https://example.com/a"));
        custom_fields.insert("contact".to_string(), AttributeValue::from("mailto:team@example.com"));
        custom_fields.insert("year".to_string(), AttributeValue::from("2024"));
        let document = Document {
            title: "Titel".into(),
            custom_fields,
            ..Default::default()
        };
        let result = translate_document(
            &mock,
            &config(),
            &document,
            &fields(&["link", "contact", "year"]),
        )
        .await
        .unwrap();

        assert_eq!(mock.requests(), vec!["Titel".to_string()]);
        assert_eq!(result.custom_fields, document.custom_fields);
        assert_eq!(result.translated_fields, 0);
        assert_eq!(result.stats.skipped, 3);
        assert_eq!(result.message(), "Translation completed successfully!");
    }

    #[test]
    fn test_message_singular() {
        let document = TranslatedDocument {
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            custom_fields: IndexMap::new(),
            translated_fields: 1,
            stats: TranslationStats::default(),
        };
        assert_eq!(
            document.message(),
            "Translation completed successfully! (1 custom field translated)"
        );
    }

    #[test]
    fn test_document_deserialize_defaults() {
        let document: Document = serde_json::from_str(r#"{"title":"Titel"}"#).unwrap();
        assert_eq!(document.content, "");
        assert!(document.language.is_none());
        assert!(document.custom_fields.is_empty());
    }
}
