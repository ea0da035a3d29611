/*!
 * Mock translator implementations for testing.
 *
 * This module provides mock translators that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds with translated text
 * - `MockTranslator::failing()` - Always fails (empty result list)
 * - `MockTranslator::failing_for_language(..)` - Fails for one language only
 * - `MockTranslator::with_empty_words(..)` - Returns empty translations for
 *   specific words while siblings succeed
 * - `MockTranslator::slow(..)` - Delays every call (for budget testing)
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::providers::{TranslationResult, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Always succeeds with a deterministic translation per (word, lang)
    #[default]
    Working,
    /// Always fails: returns an empty result list
    Failing,
    /// Fails only for the named languages; others succeed
    FailingForLanguages(HashSet<String>),
    /// Succeeds, but the named words get empty translations
    EmptyWords(HashSet<String>),
    /// Succeeds after a fixed delay on every call
    Slow {
        /// Delay applied before answering
        delay_ms: u64,
    },
}

/// Mock translator for exercising orchestrator behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate_batch calls made
    call_count: Arc<AtomicUsize>,
    /// Whether to include an example sentence in results
    with_examples: bool,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            with_examples: true,
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock that always returns an empty list
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails only for the given language
    pub fn failing_for_language(lang: &str) -> Self {
        let mut langs = HashSet::new();
        langs.insert(lang.to_string());
        Self::new(MockBehavior::FailingForLanguages(langs))
    }

    /// Create a mock that returns empty translations for the given words
    pub fn with_empty_words(words: &[&str]) -> Self {
        let words = words.iter().map(|w| w.to_string()).collect();
        Self::new(MockBehavior::EmptyWords(words))
    }

    /// Create a mock that delays every call
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Disable example sentences in results
    pub fn without_examples(mut self) -> Self {
        self.with_examples = false;
        self
    }

    /// Number of translate_batch calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.call_count.clone()
    }

    /// Deterministic translation text for a (word, lang) pair
    pub fn translation_for(word: &str, lang: &str) -> String {
        format!("{}-{}", word, lang)
    }

    fn result_for(&self, word: &str, lang: &str, empty: bool) -> TranslationResult {
        TranslationResult {
            word: word.to_string(),
            translation: if empty {
                String::new()
            } else {
                Self::translation_for(word, lang)
            },
            example: if self.with_examples && !empty {
                format!("Example sentence using {} in {}.", word, lang)
            } else {
                String::new()
            },
            alternatives: if empty {
                Vec::new()
            } else {
                vec![format!("{}-alt-{}", word, lang)]
            },
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_batch(&self, words: &[String], target_lang: &str) -> Vec<TranslationResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => words
                .iter()
                .map(|w| self.result_for(w, target_lang, false))
                .collect(),
            MockBehavior::Failing => Vec::new(),
            MockBehavior::FailingForLanguages(langs) => {
                if langs.contains(target_lang) {
                    Vec::new()
                } else {
                    words
                        .iter()
                        .map(|w| self.result_for(w, target_lang, false))
                        .collect()
                }
            }
            MockBehavior::EmptyWords(empty_words) => words
                .iter()
                .map(|w| self.result_for(w, target_lang, empty_words.contains(w)))
                .collect(),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                words
                    .iter()
                    .map(|w| self.result_for(w, target_lang, false))
                    .collect()
            }
        }
    }
}
