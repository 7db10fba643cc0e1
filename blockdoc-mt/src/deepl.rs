//! DeepL API provider for machine translation
//!
//! Sends one string per request to the DeepL v2 `translate` endpoint with
//! HTML tag handling on, so whole block markup can be translated without
//! disturbing its tags.
//!
//! # Authentication
//!
//! The API key is sent as `Authorization: DeepL-Auth-Key <key>`. Keys of
//! the free tier (ending in `:fx`) are routed to `api-free.deepl.com`,
//! all others to `api.deepl.com`.
//!
//! # Example
//!
//! ```ignore
//! use blockdoc_mt::{DeepLProvider, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = DeepLProvider::from_env()?;
//!     let result = provider.translate("<p>Hallo Welt</p>", "DE", "EN-US").await?;
//!     println!("{}", result); // "<p>Hello World</p>"
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TranslationConfig;
use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, api_language_code, validate_locale};

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    source_lang: &'a str,
    target_lang: &'a str,
    preserve_formatting: bool,
    tag_handling: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

/// DeepL API v2 provider
#[derive(Clone)]
pub struct DeepLProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client carrying the request timeout
    client: reqwest::Client,
    /// Translate endpoint, chosen from the key unless configured
    endpoint: String,
}

impl DeepLProvider {
    /// Create a provider from an explicit configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If the API key is empty or the HTTP client cannot be built
    pub fn new(config: &TranslationConfig) -> MtResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| MtError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            endpoint: config.endpoint().to_string(),
        })
    }

    /// Create a provider from the `DEEPL_*` environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::new(&TranslationConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for DeepLProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLProvider")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for DeepLProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let source_lang = api_language_code(source_locale);
        let target_lang = api_language_code(target_locale);
        let body = TranslateRequest {
            text: [text],
            source_lang: &source_lang,
            target_lang: &target_lang,
            preserve_formatting: true,
            tag_handling: "html",
        };

        debug!(
            endpoint = %self.endpoint,
            chars = text.chars().count(),
            "sending translate request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.text().await?;
        let parsed: TranslateResponse = serde_json::from_str(&payload)
            .map_err(|e| MtError::Format(format!("Failed to parse API response: {}", e)))?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.text)
            .ok_or_else(|| MtError::Format("missing 'translations[0].text'".to_string()))
    }

    fn provider_name(&self) -> &str {
        "DeepL"
    }
}
