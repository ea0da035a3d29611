use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::languages;
use crate::providers::{parse_translation_payload, TranslationResult, Translator};

/// Provider name recorded as provenance on written records
const PROVIDER_NAME: &str = "gemini";

/// OpenRouter client for the chat-completions API
#[derive(Debug)]
pub struct OpenRouterTranslator {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model passed with every request
    model: String,
    /// Maximum number of tokens to generate
    max_tokens: u32,
    /// Temperature for generation
    temperature: f32,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Temperature for generation
    temperature: f32,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Completion choices; the first one carries the content
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The generated message
    message: ChatResponseMessage,
}

/// Message body of a completion choice
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// The actual text content
    #[serde(default)]
    content: String,
}

impl OpenRouterTranslator {
    /// Create a new client from provider configuration and a resolved API key
    pub fn new(config: &ProviderConfig, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Build the system prompt for a target language
    fn system_prompt(lang_name: &str) -> String {
        format!(
            r#"You are a professional translator. Translate English words to {lang}.
Return a JSON array with translations and example sentences.

Rules:
- translation: The most natural, commonly used translation
- example: A short, useful example sentence in {lang} using the translation
- alternatives: 1-2 alternative translations (optional)
- For function words (of, the, is), provide the equivalent or usage explanation
- NEVER return empty translations

Output format (strict JSON array):
[
  {{"word": "hello", "translation": "...", "example": "...", "alternatives": ["..."]}}
]"#,
            lang = lang_name
        )
    }

    /// Build the user prompt listing the words to translate
    fn user_prompt(words: &[String], lang_name: &str) -> String {
        let numbered = words
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{}. {}", i + 1, w))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Translate these {} English words to {}:\n{}\n\nReturn ONLY the JSON array, no other text.",
            words.len(),
            lang_name,
            numbered
        )
    }

    /// Complete a chat request, returning the generated content
    async fn complete(&self, system: String, user: String) -> Result<String, ProviderError> {
        let api_url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate_batch(&self, words: &[String], target_lang: &str) -> Vec<TranslationResult> {
        if words.is_empty() {
            return Vec::new();
        }

        let lang_name = languages::language_name(target_lang);
        let system = Self::system_prompt(lang_name);
        let user = Self::user_prompt(words, lang_name);

        match self.complete(system, user).await {
            Ok(content) => {
                debug!(
                    "Provider returned {} chars for {} ({} words)",
                    content.len(),
                    target_lang,
                    words.len()
                );
                parse_translation_payload(&content, words)
            }
            Err(e) => {
                // Total failure for this call; the orchestrator converts an
                // empty list into per-item errors.
                error!("Translation call failed for {}: {}", target_lang, e);
                Vec::new()
            }
        }
    }
}
