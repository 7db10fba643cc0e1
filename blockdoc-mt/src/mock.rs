//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the block walker
//! and the document pipeline without an API key or network access. Every
//! request is recorded so tests can assert exactly what was sent.
//!
//! # Example
//!
//! ```ignore
//! use blockdoc_mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("Hallo", "DE", "EN-US").await.unwrap();
//!     assert_eq!(result, "Hallo_EN-US");
//! }
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "Hallo" → "Hallo_EN-US"
    Suffix,

    /// Whole-string lookup; unknown strings get the suffix treatment
    Mappings(HashMap<String, String>),

    /// Replace every known phrase inside the text, leaving markup alone:
    /// "<p>Hallo Welt</p>" with ("Hallo Welt", "Hello World") → "<p>Hello World</p>"
    Glossary(Vec<(String, String)>),

    /// Simulate API errors
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay
    delay: Duration,
    /// Texts containing any of these fail with a transport error
    fail_on: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay: Duration::ZERO,
            fail_on: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Glossary translator from `(source, target)` phrase pairs
    pub fn glossary(pairs: &[(&str, &str)]) -> Self {
        Self::new(MockMode::Glossary(
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        ))
    }

    /// Add a simulated network delay to every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every request whose text contains `needle`
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Every text sent so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    fn record(&self, text: &str) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        if self.fail_on.iter().any(|needle| text.contains(needle.as_str())) {
            return Err(MtError::Transport(format!("simulated failure for '{}'", text)));
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => Ok(map
                .get(text)
                .cloned()
                .unwrap_or_else(|| format!("{}_{}", text, target))),
            MockMode::Glossary(pairs) => Ok(pairs
                .iter()
                .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))),
            MockMode::Error(msg) => Err(MtError::Api {
                status: 500,
                message: msg.clone(),
            }),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        self.record(text);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.apply_translation(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
