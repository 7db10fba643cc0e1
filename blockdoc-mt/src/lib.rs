//! Machine translation for block documents
//!
//! This crate translates posts made of delimited blocks with DeepL while
//! keeping the block structure intact. Core text blocks have their markup
//! translated as one HTML string; custom blocks have their text attributes
//! translated and their markup rebuilt from them.
//!
//! # Workflow Example
//!
//! ```ignore
//! use blockdoc_mt::{DeepLProvider, TranslationConfig, translate_document_body};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Read the API key and language pair from DEEPL_* variables
//!     let config = TranslationConfig::from_env()?;
//!     let provider = DeepLProvider::new(&config)?;
//!
//!     // 2. Parse, translate and render the body
//!     let body = "<!-- wp:paragraph -->\n<p>Hallo Welt</p>\n<!-- /wp:paragraph -->";
//!     let result = translate_document_body(&provider, &config, body).await?;
//!
//!     println!("{}", result.content);
//!     println!("{:?}", result.stats);
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod classifier;
pub mod config;
pub mod context;
pub mod deepl;
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod translator;
pub mod walker;

// Integration tests (only available during testing)
#[cfg(test)]
mod integration_tests;

// Re-export main types for convenient access
pub use attributes::{KeyScope, MAX_ATTRIBUTE_DEPTH, translate_attributes};
pub use classifier::is_non_translatable;
pub use config::{DEEPL_FREE_URL, DEEPL_PRO_URL, TranslationConfig};
pub use context::{TranslationContext, TranslationStats, translate_scalar_field};
pub use deepl::DeepLProvider;
pub use error::{MtError, MtResult, TranslationOutcome};
pub use mock::{MockMode, MockTranslator};
pub use pipeline::{
    BodyTranslation, Document, TranslatedDocument, translate_document, translate_document_body,
};
pub use translator::{MachineTranslator, api_language_code, validate_locale};
pub use walker::translate_tree;
