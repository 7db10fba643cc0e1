//! Translation settings
//!
//! One [`TranslationConfig`] is passed explicitly into every translation
//! entry point. It is usually read from the environment:
//!
//! | variable | default |
//! |---|---|
//! | `DEEPL_API_KEY` | required |
//! | `DEEPL_SOURCE_LANG` | `DE` |
//! | `DEEPL_TARGET_LANG` | `EN-US` |
//! | `DEEPL_TIMEOUT_SECS` | `30` |
//! | `DEEPL_API_URL` | chosen from the key |
//! | `DEEPL_TOTAL_TIMEOUT_SECS` | none |

use std::time::Duration;

use serde::Deserialize;

use crate::error::{MtError, MtResult};
use crate::translator::{api_language_code, validate_locale};

pub const DEEPL_FREE_URL: &str = "https://api-free.deepl.com/v2/translate";
pub const DEEPL_PRO_URL: &str = "https://api.deepl.com/v2/translate";

/// Keys for the free API tier end with this marker
const FREE_KEY_MARKER: &str = ":fx";

fn default_source_lang() -> String {
    "DE".to_string()
}

fn default_target_lang() -> String {
    "EN-US".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Clone, Deserialize)]
pub struct TranslationConfig {
    pub api_key: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Overrides the endpoint derived from the key
    #[serde(default)]
    pub base_url: Option<String>,
    /// Wall-time budget in milliseconds for all calls made for one document
    #[serde(default)]
    pub total_timeout_ms: Option<u64>,
}

impl TranslationConfig {
    pub fn new(api_key: &str) -> Self {
        TranslationConfig {
            api_key: api_key.to_string(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            timeout_ms: default_timeout_ms(),
            base_url: None,
            total_timeout_ms: None,
        }
    }

    /// Read the configuration from `DEEPL_*` environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MtResult<Self> {
        let api_key = lookup("DEEPL_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                MtError::Config("DEEPL_API_KEY environment variable not set".to_string())
            })?;

        let mut config = Self::new(api_key.trim());

        if let Some(source) = lookup("DEEPL_SOURCE_LANG") {
            config.source_lang = source;
        }
        if let Some(target) = lookup("DEEPL_TARGET_LANG") {
            config.target_lang = target;
        }
        if let Some(timeout) = lookup("DEEPL_TIMEOUT_SECS") {
            config.timeout_ms = parse_secs("DEEPL_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(url) = lookup("DEEPL_API_URL") {
            config.base_url = Some(url);
        }
        if let Some(total) = lookup("DEEPL_TOTAL_TIMEOUT_SECS") {
            config.total_timeout_ms = Some(parse_secs("DEEPL_TOTAL_TIMEOUT_SECS", &total)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_languages(mut self, source: &str, target: &str) -> Self {
        self.source_lang = source.to_string();
        self.target_lang = target.to_string();
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Per-request timeout, kept to the millisecond
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = millis(timeout);
        self
    }

    /// Budget for all calls of one document, kept to the millisecond
    pub fn with_total_timeout(mut self, budget: Duration) -> Self {
        self.total_timeout_ms = Some(millis(budget));
        self
    }

    pub fn validate(&self) -> MtResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(MtError::Config("API key cannot be empty".to_string()));
        }
        validate_locale(&self.source_lang)?;
        validate_locale(&self.target_lang)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout_ms.map(Duration::from_millis)
    }

    pub fn is_free_key(&self) -> bool {
        self.api_key.contains(FREE_KEY_MARKER)
    }

    /// Endpoint for translate requests
    pub fn endpoint(&self) -> &str {
        match &self.base_url {
            Some(url) => url.as_str(),
            None if self.is_free_key() => DEEPL_FREE_URL,
            None => DEEPL_PRO_URL,
        }
    }

    pub fn source_code(&self) -> String {
        api_language_code(&self.source_lang)
    }

    pub fn target_code(&self) -> String {
        api_language_code(&self.target_lang)
    }
}

impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &"***")
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("timeout", &self.timeout())
            .field("base_url", &self.base_url)
            .field("total_timeout", &self.total_timeout())
            .finish()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Read a whole number of seconds, returned in milliseconds
fn parse_secs(name: &str, value: &str) -> MtResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map(|secs| secs.saturating_mul(1000))
        .map_err(|_| MtError::Config(format!("{} must be a number of seconds, got '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_endpoint_selection_by_key() {
        assert_eq!(TranslationConfig::new("abc-123:fx").endpoint(), DEEPL_FREE_URL);
        assert_eq!(TranslationConfig::new("abc-123").endpoint(), DEEPL_PRO_URL);
        assert_eq!(
            TranslationConfig::new("abc:fx")
                .with_base_url("http://127.0.0.1:9/v2/translate")
                .endpoint(),
            "http://127.0.0.1:9/v2/translate"
        );
    }

    #[test]
    fn test_defaults() {
        let config = TranslationConfig::new("key");
        assert_eq!(config.source_code(), "DE");
        assert_eq!(config.target_code(), "EN-US");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.total_timeout(), None);
    }

    #[test]
    fn test_from_lookup_without_key() {
        match TranslationConfig::from_lookup(lookup(&[])) {
            Err(MtError::Config(msg)) => assert!(msg.contains("not set")),
            other => panic!("Expected Config error, got {:?}", other),
        }
        assert!(TranslationConfig::from_lookup(lookup(&[("DEEPL_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = TranslationConfig::from_lookup(lookup(&[
            ("DEEPL_API_KEY", "secret:fx"),
            ("DEEPL_SOURCE_LANG", "fr"),
            ("DEEPL_TARGET_LANG", "en-gb"),
            ("DEEPL_TIMEOUT_SECS", "5"),
            ("DEEPL_TOTAL_TIMEOUT_SECS", "120"),
        ]))
        .unwrap();
        assert_eq!(config.source_code(), "FR");
        assert_eq!(config.target_code(), "EN-GB");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.total_timeout(), Some(Duration::from_secs(120)));
        assert!(config.is_free_key());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(
            TranslationConfig::from_lookup(lookup(&[
                ("DEEPL_API_KEY", "k"),
                ("DEEPL_TIMEOUT_SECS", "soon"),
            ]))
            .is_err()
        );
        assert!(matches!(
            TranslationConfig::from_lookup(lookup(&[
                ("DEEPL_API_KEY", "k"),
                ("DEEPL_TARGET_LANG", "en us"),
            ])),
            Err(MtError::InvalidLocale(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: TranslationConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.source_lang, "DE");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.total_timeout(), None);

        let config: TranslationConfig =
            serde_json::from_str(r#"{"api_key":"k","timeout_ms":250,"total_timeout_ms":1500}"#)
                .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.total_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_sub_second_timeouts_survive() {
        let config = TranslationConfig::new("k")
            .with_timeout(Duration::from_millis(500))
            .with_total_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.total_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_debug_masks_key() {
        let debug = format!("{:?}", TranslationConfig::new("super-secret"));
        assert!(debug.contains("***"));
        assert!(!debug.contains("super-secret"));
    }
}
