/*!
 * # vocabatch - bounded-time vocabulary batch translation
 *
 * A Rust library and service for translating a corpus of English vocabulary
 * cards into ~70 target languages with an LLM provider.
 *
 * ## Features
 *
 * - Resumable translation job: a cursor carries progress across invocations
 * - Wall-clock budget per invocation, suited to cron-style scheduling
 * - Parallel per-language fan-out in bounded chunks
 * - Durable per-item upserts with a (card, language) dedup constraint
 * - Fire-and-forget enrichment writes (example sentences)
 * - HTTP trigger endpoint and a CLI runner that drives the job to completion
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `languages`: The static target-language table
 * - `database`: SQLite-backed corpus and completion index
 * - `pipeline`: Work selection, batch orchestration, invocation service
 * - `providers`: Translation provider adapters (OpenRouter, mock)
 * - `server`: HTTP trigger surface
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod languages;
pub mod pipeline;
pub mod providers;
pub mod server;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, Repository};
pub use errors::{AppError, PipelineError, ProviderError};
pub use languages::{all_language_codes, is_supported, language_name};
pub use pipeline::{PipelineService, RunOutcome, RunRequest, RunStats, RunTotals};
pub use providers::{MockTranslator, OpenRouterTranslator, TranslationResult, Translator};
