//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the block walker works the same against DeepL or the mock translator.
//!
//! # Example
//!
//! ```ignore
//! use blockdoc_mt::{DeepLProvider, MachineTranslator, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationConfig::from_env()?;
//!     let provider = DeepLProvider::new(&config)?;
//!
//!     let result = provider.translate("Hallo Welt", "DE", "EN-US").await?;
//!     println!("{}", result); // "Hello World"
//!     Ok(())
//! }
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations translate one string per call. Markup inside the text
/// must be left intact, since whole block markup is sent as one string.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target language
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate, possibly containing HTML tags
    /// * `source_locale` - Source language code (e.g., "DE")
    /// * `target_locale` - Target language code (e.g., "EN-US")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - Transport, API or response format failure
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Name of this provider, for logs
    fn provider_name(&self) -> &str;
}

/// Language code in the form the DeepL API expects: `en-us` → `EN-US`
pub fn api_language_code(locale: &str) -> String {
    locale.replace('_', "-").to_uppercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
