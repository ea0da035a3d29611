/*!
 * Provider implementations for the translation API.
 *
 * This module contains the adapter trait the orchestrator depends on and the
 * client implementations behind it:
 * - OpenRouter: chat-completions API over HTTP
 * - Mock: configurable behaviors for testing
 */

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use std::fmt::Debug;

pub mod mock;
pub mod openrouter;

pub use mock::MockTranslator;
pub use openrouter::OpenRouterTranslator;

/// One structured translation result for a single source word
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    /// The source word this result belongs to
    pub word: String,
    /// The primary translation; empty means the provider failed for this word
    pub translation: String,
    /// Optional example sentence in the target language
    pub example: String,
    /// Alternative translations
    pub alternatives: Vec<String>,
}

/// Adapter over a remote text-generation API.
///
/// Implementations never propagate provider-level failures (timeouts, non-2xx
/// statuses, malformed bodies): a total failure for a call surfaces as an
/// empty result list, and the orchestrator converts that into per-item
/// errors. Result order should correspond to input order, but callers match
/// by `word` first and fall back to position.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Provider name recorded as provenance on written records
    fn name(&self) -> &str;

    /// Translate up to `batch_size` source words into one target language
    async fn translate_batch(&self, words: &[String], target_lang: &str) -> Vec<TranslationResult>;
}

/// Raw result shape as returned by the model, with every field optional
#[derive(Debug, Deserialize)]
struct RawTranslation {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    alternatives: Option<Vec<String>>,
}

/// Parse a model response into translation results.
///
/// The content may be wrapped in markdown code fences or surrounded by prose;
/// the parser extracts the outermost JSON array. When no array can be parsed
/// at all, it degrades to identity translations (word -> word) so every
/// requested word still gets an outcome; the caller logs the degraded path.
/// A missing `word` field falls back to the input word at the same index; a
/// missing `translation` stays empty and is counted as an error downstream.
pub fn parse_translation_payload(content: &str, words: &[String]) -> Vec<TranslationResult> {
    let mut json_str = content.trim();

    // Strip markdown code fences
    if json_str.starts_with("```") {
        json_str = json_str
            .trim_start_matches("```json")
            .trim_start_matches("```JSON")
            .trim_start_matches("```");
        json_str = json_str.trim_end_matches("```").trim();
    }

    // Extract the outermost JSON array, tolerating leading/trailing prose
    let sliced = match (json_str.find('['), json_str.rfind(']')) {
        (Some(start), Some(end)) if start < end => &json_str[start..=end],
        _ => json_str,
    };

    let raw: Vec<RawTranslation> = match serde_json::from_str(sliced) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Unparseable provider response, falling back to identity translations: {}", e);
            return words
                .iter()
                .map(|w| TranslationResult {
                    word: w.clone(),
                    translation: w.clone(),
                    example: String::new(),
                    alternatives: Vec::new(),
                })
                .collect();
        }
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, r)| TranslationResult {
            word: r
                .word
                .filter(|w| !w.is_empty())
                .or_else(|| words.get(i).cloned())
                .unwrap_or_default(),
            translation: r.translation.unwrap_or_default(),
            example: r.example.unwrap_or_default(),
            alternatives: r.alternatives.unwrap_or_default(),
        })
        .collect()
}
