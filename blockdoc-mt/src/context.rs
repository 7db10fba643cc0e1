//! Per-document translation state
//!
//! A [`TranslationContext`] is threaded through the attribute translator and
//! the block walker. It carries the translator, the language pair, an
//! optional wall-time deadline and the running [`TranslationStats`].

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TranslationConfig;
use crate::error::{MtError, MtResult, TranslationOutcome};
use crate::translator::MachineTranslator;

/// Boxed future used by the recursive walkers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Counters for one translation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// Strings the translator returned a result for
    pub translated: usize,
    /// Strings left alone because they are URLs, numbers or too short
    pub skipped: usize,
    /// Strings kept in the source language after a failed call
    pub failed: usize,
}

impl TranslationStats {
    pub fn total(&self) -> usize {
        self.translated + self.skipped + self.failed
    }
}

pub struct TranslationContext<'a> {
    translator: &'a dyn MachineTranslator,
    source_lang: String,
    target_lang: String,
    deadline: Option<Instant>,
    stats: TranslationStats,
}

impl<'a> TranslationContext<'a> {
    pub fn new(translator: &'a dyn MachineTranslator, source_lang: &str, target_lang: &str) -> Self {
        TranslationContext {
            translator,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            deadline: None,
            stats: TranslationStats::default(),
        }
    }

    /// Context for the language pair and time budget of `config`
    pub fn from_config(translator: &'a dyn MachineTranslator, config: &TranslationConfig) -> Self {
        let mut context = Self::new(translator, &config.source_code(), &config.target_code());
        if let Some(budget) = config.total_timeout() {
            context = context.with_budget(budget);
        }
        context
    }

    /// Stop issuing calls once `budget` has elapsed from now
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub fn stats(&self) -> TranslationStats {
        self.stats
    }

    /// Note a string that was deliberately not sent
    pub fn record_skip(&mut self) {
        self.stats.skipped += 1;
    }

    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Translate `text`, returning the error on failure
    ///
    /// Empty text is returned as is without a call. Failures are counted
    /// but not logged.
    pub async fn try_translate(&mut self, text: &str) -> TranslationOutcome {
        if text.is_empty() {
            return Ok(String::new());
        }

        let outcome = match self.remaining() {
            Some(remaining) if remaining.is_zero() => Err(MtError::DeadlineExceeded),
            Some(remaining) => tokio::time::timeout(
                remaining,
                self.translator
                    .translate(text, &self.source_lang, &self.target_lang),
            )
            .await
            .unwrap_or(Err(MtError::DeadlineExceeded)),
            None => {
                self.translator
                    .translate(text, &self.source_lang, &self.target_lang)
                    .await
            }
        };

        match &outcome {
            Ok(_) => {
                self.stats.translated += 1;
                debug!(
                    provider = self.translator.provider_name(),
                    chars = text.chars().count(),
                    "translated string"
                );
            }
            Err(_) => self.stats.failed += 1,
        }
        outcome
    }

    /// Translate `text`, logging a warning and returning `None` on failure
    pub async fn translate_text(&mut self, text: &str) -> Option<String> {
        match self.try_translate(text).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                warn!(
                    provider = self.translator.provider_name(),
                    error = %e,
                    "keeping source text after failed translation"
                );
                None
            }
        }
    }
}

/// Translate one plain field such as a title or excerpt
pub async fn translate_scalar_field(
    translator: &dyn MachineTranslator,
    config: &TranslationConfig,
    text: &str,
) -> MtResult<String> {
    TranslationContext::from_config(translator, config)
        .try_translate(text)
        .await
}
