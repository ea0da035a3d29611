/*!
 * Invocation service: one resumable pipeline step, plus a driver that chains
 * steps to completion.
 *
 * `run_invocation` is the unit of work behind both the HTTP handler and the
 * CLI runner: select a batch, orchestrate it under the budget, and report
 * where to resume. `run_to_completion` chains invocations through the
 * returned cursor until the corpus is done.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app_config::PipelineConfig;
use crate::database::Repository;
use crate::errors::PipelineError;
use crate::languages::{all_language_codes, is_supported};
use crate::pipeline::orchestrator::{BatchOrchestrator, OrchestratorSettings};
use crate::pipeline::selector::WorkSelector;
use crate::providers::Translator;

/// Parameters for one invocation; every field falls back to the configured
/// default when absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRequest {
    /// Words per provider call
    pub batch_size: Option<usize>,
    /// Cards selected per invocation
    pub cards_per_run: Option<usize>,
    /// Languages translated concurrently
    pub parallel_languages: Option<usize>,
    /// Target language codes; `None` means the full supported set
    pub languages: Option<Vec<String>>,
    /// Resumption cursor from a previous invocation
    pub continue_from: Option<String>,
}

/// Counters reported for one invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Distinct cards that received at least one new translation
    pub cards_processed: usize,
    /// Translation records written
    pub translations: usize,
    /// Per-item errors
    pub errors: usize,
    /// Invocation duration in milliseconds
    pub duration: u64,
    /// Languages that had pending work for the batch
    pub languages_processed: usize,
    /// Concurrency level used
    pub parallel_languages: usize,
}

/// Result of one invocation
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The selector found no incomplete cards past the cursor
    Completed,
    /// A batch was processed; `continue_from` resumes the scan
    Progress {
        stats: RunStats,
        /// Whether another invocation is expected to find work
        has_more: bool,
        /// Last card id in the selected batch
        last_card_id: Option<String>,
        /// Cursor for the next invocation
        continue_from: Option<String>,
    },
}

/// Accumulated counters for a multi-invocation run
#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    /// Invocations executed
    pub invocations: usize,
    /// Sum of cards processed across invocations
    pub cards_processed: usize,
    /// Sum of translations written
    pub translations: usize,
    /// Sum of per-item errors
    pub errors: usize,
    /// Total wall-clock time
    pub duration: Duration,
}

/// Runs pipeline invocations against one repository and one provider
pub struct PipelineService {
    selector: WorkSelector,
    orchestrator: BatchOrchestrator,
    config: PipelineConfig,
}

impl PipelineService {
    /// Create a new service
    pub fn new(repo: Repository, translator: Arc<dyn Translator>, config: PipelineConfig) -> Self {
        Self {
            selector: WorkSelector::new(repo.clone()),
            orchestrator: BatchOrchestrator::new(repo, translator),
            config,
        }
    }

    /// Execute one bounded invocation.
    ///
    /// Only selection-level failures are fatal; the orchestrator absorbs
    /// provider and per-item write failures into its counters.
    pub async fn run_invocation(&self, request: &RunRequest) -> Result<RunOutcome, PipelineError> {
        let started = Instant::now();

        let languages = self.resolve_languages(request)?;
        let cards_per_run = request
            .cards_per_run
            .unwrap_or(self.config.cards_per_run)
            .max(1);
        let parallel_languages = request
            .parallel_languages
            .unwrap_or(self.config.parallel_languages)
            .max(1);

        let settings = OrchestratorSettings {
            batch_size: request.batch_size.unwrap_or(self.config.batch_size).max(1),
            parallel_languages,
            max_execution_time: Duration::from_millis(self.config.max_execution_time_ms),
            chunk_delay: Duration::from_millis(self.config.chunk_delay_ms),
        };

        let cards = self
            .selector
            .next_batch(languages.len(), cards_per_run, request.continue_from.clone())
            .await
            .map_err(|e| PipelineError::Selection(e.to_string()))?;

        if cards.is_empty() {
            info!("No more cards to translate (cursor: {:?})", request.continue_from);
            return Ok(RunOutcome::Completed);
        }

        debug!(
            "Invocation: {} card(s), {} language(s), cursor {:?}",
            cards.len(),
            languages.len(),
            request.continue_from
        );

        let outcome = self
            .orchestrator
            .run_batch(&cards, &languages, &settings, started)
            .await
            .map_err(|e| PipelineError::Selection(e.to_string()))?;

        // More work remains when the batch was full (the corpus may extend
        // past it) or when the cursor could not clear this batch.
        let has_more = cards.len() == cards_per_run || !outcome.batch_completed;

        let stats = RunStats {
            cards_processed: outcome.cards_processed,
            translations: outcome.translations,
            errors: outcome.errors,
            duration: started.elapsed().as_millis() as u64,
            languages_processed: outcome.languages_processed,
            parallel_languages,
        };

        info!(
            "Invocation done: {} card(s), {} translation(s), {} error(s) in {} ms (hasMore: {})",
            stats.cards_processed, stats.translations, stats.errors, stats.duration, has_more
        );

        Ok(RunOutcome::Progress {
            stats,
            has_more,
            last_card_id: cards.last().map(|c| c.id.clone()),
            continue_from: outcome.cursor,
        })
    }

    /// Chain invocations through the cursor until the corpus is complete.
    ///
    /// A single forward pass can skip a card the fallback cursor stepped
    /// over (budget exhaustion mid-card, transient provider failure), so the
    /// scan restarts from the original cursor as long as the previous pass
    /// wrote anything. A pass with zero writes means no further progress is
    /// possible, which bounds the loop even when the provider keeps failing.
    pub async fn run_to_completion(
        &self,
        request: &RunRequest,
        show_progress: bool,
    ) -> Result<RunTotals, PipelineError> {
        let started = Instant::now();
        let mut totals = RunTotals::default();

        let progress = if show_progress {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };

        loop {
            let mut cursor = request.continue_from.clone();
            let mut pass_translations = 0usize;

            loop {
                let step = RunRequest {
                    continue_from: cursor.clone(),
                    ..request.clone()
                };

                match self.run_invocation(&step).await? {
                    RunOutcome::Completed => break,
                    RunOutcome::Progress {
                        stats,
                        has_more,
                        continue_from,
                        ..
                    } => {
                        totals.invocations += 1;
                        totals.cards_processed += stats.cards_processed;
                        totals.translations += stats.translations;
                        totals.errors += stats.errors;
                        pass_translations += stats.translations;

                        if let Some(bar) = &progress {
                            bar.set_message(format!(
                                "{} invocation(s), {} card(s), {} translation(s), {} error(s)",
                                totals.invocations,
                                totals.cards_processed,
                                totals.translations,
                                totals.errors
                            ));
                        }

                        if !has_more {
                            break;
                        }
                        cursor = continue_from;
                    }
                }
            }

            if pass_translations == 0 {
                break;
            }
        }

        totals.duration = started.elapsed();

        if let Some(bar) = &progress {
            bar.finish_with_message(format!(
                "Done: {} invocation(s), {} translation(s), {} error(s) in {:.1}s",
                totals.invocations,
                totals.translations,
                totals.errors,
                totals.duration.as_secs_f64()
            ));
        }

        Ok(totals)
    }

    /// Validate and resolve the requested language codes
    fn resolve_languages(&self, request: &RunRequest) -> Result<Vec<String>, PipelineError> {
        match &request.languages {
            None => Ok(all_language_codes()),
            Some(codes) => {
                for code in codes {
                    if !is_supported(code) {
                        return Err(PipelineError::UnsupportedLanguage(code.clone()));
                    }
                }
                Ok(codes.clone())
            }
        }
    }
}
