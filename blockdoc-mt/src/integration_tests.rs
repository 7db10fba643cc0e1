//! End-to-End Tests for the Block Translation Pipeline
//!
//! These tests run parse → walk → render against realistic post bodies,
//! using the mock translator unless marked `#[ignore]`.
//!
//! # Running the live tests
//!
//! ```bash
//! export DEEPL_API_KEY=...
//! cargo test -p blockdoc-mt integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use super::super::*;
    use blockdoc::{Parser, render};

    /// A post mixing core blocks, custom blocks and nesting
    const POST: &str = r#"<!-- wp:radicle/page-header {"title":"Über uns","images":[{"url":"https://example.com/team.jpg","text":"Unser Team"}]} -->
<div class="page-header"><h1>Über uns</h1></div>
<!-- /wp:radicle/page-header -->

<!-- wp:paragraph {"className":"intro"} -->
<p class="intro">Wir bauen <strong>schöne</strong> Dinge.</p>
<!-- /wp:paragraph -->

<!-- wp:radicle/modal {"buttonText":"Mehr erfahren"} -->
<div class="modal">
<!-- wp:heading {"level":3} -->
<h3>Kontakt</h3>
<!-- /wp:heading -->

<!-- wp:radicle/image-with-text {"title":"Standort","text":"Mitten in Berlin","image":{"url":"https://example.com/berlin.jpg"},"image_left":false} /-->
</div>
<!-- /wp:radicle/modal -->

<!-- wp:spacer {"height":"40px"} /-->"#;

    /// Core and generic blocks only; their stored markup is kept verbatim
    const CORE_POST: &str = r#"<!-- wp:heading {"level":2} -->
<h2 class="wp-block-heading">Willkommen</h2>
<!-- /wp:heading -->

<!-- wp:group {"layout":{"type":"constrained"}} -->
<div class="wp-block-group"><!-- wp:paragraph -->
<p>Erster Absatz mit <a href="https://example.com">Link</a>.</p>
<!-- /wp:paragraph -->

<!-- wp:image {"id":7,"sizeSlug":"large"} -->
<figure class="wp-block-image size-large"><img src="https://example.com/bild.jpg" alt=""/></figure>
<!-- /wp:image --></div>
<!-- /wp:group -->

<!-- wp:separator /-->"#;

    fn glossary() -> MockTranslator {
        MockTranslator::glossary(&[
            ("Über uns", "About us"),
            ("Unser Team", "Our team"),
            ("Wir bauen", "We build"),
            ("schöne", "beautiful"),
            ("Dinge", "things"),
            ("Mehr erfahren", "Learn more"),
            ("Kontakt", "Contact"),
            ("Standort", "Location"),
            ("Mitten in Berlin", "In the heart of Berlin"),
        ])
    }

    #[test]
    fn test_untouched_tree_renders_byte_for_byte() {
        let blocks = Parser::new(CORE_POST).parse().unwrap();
        assert_eq!(render(&blocks).unwrap(), CORE_POST);
    }

    #[tokio::test]
    async fn test_failing_translator_keeps_core_post_intact() {
        let mock = MockTranslator::new(MockMode::Error("service unavailable".into()));
        let config = TranslationConfig::new("test-key");
        let result = translate_document_body(&mock, &config, CORE_POST).await.unwrap();
        assert_eq!(result.content, CORE_POST);
        assert_eq!(result.stats.failed, 2);
    }

    #[tokio::test]
    async fn test_noop_translation_is_lossless() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let config = TranslationConfig::new("test-key");
        let result = translate_document_body(&mock, &config, POST).await.unwrap();

        // Only regenerated custom blocks may differ; core blocks must not
        assert!(result.content.contains(
            "<!-- wp:paragraph {\"className\":\"intro\"} -->\n<p class=\"intro\">Wir bauen <strong>schöne</strong> Dinge.</p>\n<!-- /wp:paragraph -->"
        ));
        assert!(result.content.ends_with("<!-- wp:spacer {\"height\":\"40px\"} /-->"));
        assert_eq!(result.stats.failed, 0);
    }

    #[tokio::test]
    async fn test_full_post_translation() {
        let mock = glossary();
        let config = TranslationConfig::new("test-key");
        let result = translate_document_body(&mock, &config, POST).await.unwrap();
        let content = result.content;

        // Core block: markup translated, delimiters and kind intact
        assert!(content.contains(
            "<!-- wp:paragraph {\"className\":\"intro\"} -->\n<p class=\"intro\">We build <strong>beautiful</strong> things.</p>\n<!-- /wp:paragraph -->"
        ));
        // Custom block: attributes translated, markup regenerated from them
        assert!(content.contains("\"title\":\"About us\""));
        assert!(content.contains("\"text\":\"Our team\""));
        assert!(content.contains("https://example.com/team.jpg"));
        // Nested blocks keep their position inside the container
        let contact = content.find("<h3>Contact</h3>").unwrap();
        let location = content.find("Location").unwrap();
        assert!(contact < location);
        assert!(content.contains("\"buttonText\":\"Learn more\""));
        assert!(content.contains("<h3>Location</h3><p>In the heart of Berlin</p>"));
        assert!(content.contains("<div class=\"image-and-text image-right\">"));
        assert!(content.ends_with("<!-- wp:spacer {\"height\":\"40px\"} /-->"));
    }

    #[tokio::test]
    async fn test_always_failing_translator_keeps_everything() {
        let mock = MockTranslator::new(MockMode::Error("service unavailable".into()));
        let config = TranslationConfig::new("test-key");
        let result = translate_document_body(&mock, &config, POST).await.unwrap();

        let expected = translate_document_body(&MockTranslator::new(MockMode::NoOp), &config, POST)
            .await
            .unwrap();
        assert_eq!(result.content, expected.content);
        assert_eq!(result.stats.translated, 0);
        assert!(result.stats.failed > 0);
    }

    #[tokio::test]
    async fn test_child_order_survives_failures() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("zwei");
        let config = TranslationConfig::new("test-key");
        let body = "<!-- wp:group -->\n<div>\n<!-- wp:paragraph --><p>eins</p><!-- /wp:paragraph -->\n<!-- wp:paragraph --><p>zwei</p><!-- /wp:paragraph -->\n<!-- wp:paragraph --><p>drei</p><!-- /wp:paragraph -->\n</div>\n<!-- /wp:group -->";
        let result = translate_document_body(&mock, &config, body).await.unwrap();

        let eins = result.content.find("eins").unwrap();
        let zwei = result.content.find("zwei").unwrap();
        let drei = result.content.find("drei").unwrap();
        assert!(eins < zwei && zwei < drei);
        assert!(result.content.contains("<p>zwei</p><!-- /wp:paragraph -->"));
    }

    #[tokio::test]
    async fn test_each_string_sent_once() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let config = TranslationConfig::new("test-key");
        translate_document_body(&mock, &config, POST).await.unwrap();

        let requests = mock.requests();
        let mut unique = requests.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(requests.len(), unique.len(), "duplicate requests: {:?}", requests);
        // URLs never reach the translator
        assert!(requests.iter().all(|text| !text.starts_with("https://")));
    }

    #[tokio::test]
    async fn test_document_end_to_end() {
        let mock = glossary();
        let config = TranslationConfig::new("test-key");
        let document: Document = serde_json::from_value(serde_json::json!({
            "title": "Über uns",
            "excerpt": "Unser Team",
            "content": "<!-- wp:paragraph -->\n<p>Kontakt</p>\n<!-- /wp:paragraph -->",
            "language": "de",
            "custom_fields": {"tagline": "Wir bauen Dinge"}
        }))
        .unwrap();

        let result = translate_document(&mock, &config, &document, &["tagline".to_string()])
            .await
            .unwrap();
        assert_eq!(result.title, "About us");
        assert_eq!(result.excerpt, "Our team");
        assert_eq!(
            result.content,
            "<!-- wp:paragraph -->\n<p>Contact</p>\n<!-- /wp:paragraph -->"
        );
        assert_eq!(
            result.custom_fields["tagline"].as_str(),
            Some("We build things")
        );
        assert_eq!(
            result.message(),
            "Translation completed successfully! (1 custom field translated)"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_e2e_real_api_paragraph() {
        let Ok(config) = TranslationConfig::from_env() else {
            eprintln!("Skipping: DEEPL_API_KEY not set");
            return;
        };
        let provider = DeepLProvider::new(&config).unwrap();
        let body = "<!-- wp:paragraph -->\n<p>Guten Morgen, <em>liebe</em> Leser.</p>\n<!-- /wp:paragraph -->";
        let result = translate_document_body(&provider, &config, body).await.unwrap();
        println!("{}", result.content);
        assert!(result.content.starts_with("<!-- wp:paragraph -->\n<p>"));
        assert!(result.content.ends_with("</p>\n<!-- /wp:paragraph -->"));
        assert!(result.content.contains("<em>"));
    }
}
