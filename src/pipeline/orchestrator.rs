/*!
 * Batch orchestration: chunked parallel fan-out under a wall-clock budget.
 *
 * Given one batch of cards and the target language list, the orchestrator
 * determines which (card, language) pairs are still missing, partitions the
 * pending languages into chunks of `parallel_languages`, and runs one
 * translation task per language concurrently within each chunk. Every write
 * is an individually durable upsert, so stopping at a chunk boundary when
 * the budget runs out needs no rollback.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::database::models::{CardRecord, EnrichmentRecord, TranslationRecord};
use crate::database::Repository;
use crate::providers::Translator;

/// Maximum number of alternates stored beyond the primary translation
const MAX_ALTERNATIVES: usize = 3;

/// Tuning knobs for one orchestrator run
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Words per provider call
    pub batch_size: usize,
    /// Languages translated concurrently within one chunk
    pub parallel_languages: usize,
    /// Wall-clock budget for the invocation; checked between chunks only
    pub max_execution_time: Duration,
    /// Pacing delay between chunks
    pub chunk_delay: Duration,
}

/// Aggregate result of one orchestrator run over one card batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Number of distinct cards that received at least one new translation
    pub cards_processed: usize,
    /// Total translation records written
    pub translations: usize,
    /// Total per-item errors (missing/empty results, rejected writes)
    pub errors: usize,
    /// Number of languages that had pending work for this batch
    pub languages_processed: usize,
    /// Whether the run stopped early because the budget was exceeded
    pub budget_exhausted: bool,
    /// Resumption cursor: last card of the contiguous batch prefix confirmed
    /// complete for every requested language. Falls back to the last card id
    /// in the batch when nothing completed, so the scan always advances.
    pub cursor: Option<String>,
    /// Whether every card in the batch is complete for all requested languages
    pub batch_completed: bool,
}

/// Per-language task result, combined only after the whole chunk settles
struct LanguageOutcome {
    translations: usize,
    errors: usize,
    /// (card_id, lang) pairs successfully written by this task
    written: Vec<(String, String)>,
}

/// Runs one bounded batch of translation work
pub struct BatchOrchestrator {
    /// Repository backing the completion index
    repo: Repository,
    /// The translation provider adapter
    translator: Arc<dyn Translator>,
}

impl BatchOrchestrator {
    /// Create a new orchestrator
    pub fn new(repo: Repository, translator: Arc<dyn Translator>) -> Self {
        Self { repo, translator }
    }

    /// Process one card batch against the requested languages.
    ///
    /// `started` is the invocation start; the budget covers selection and
    /// orchestration together. Chunks already in flight run to completion
    /// when the budget expires, so the overrun is bounded by the slowest
    /// single language call of the current chunk.
    pub async fn run_batch(
        &self,
        cards: &[CardRecord],
        languages: &[String],
        settings: &OrchestratorSettings,
        started: Instant,
    ) -> Result<BatchOutcome> {
        let card_ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();

        // Per-run in-memory completion check, distinct from the selector's
        // coarser per-card language count.
        let mut done = self.repo.existing_translation_pairs(&card_ids).await?;

        let languages_needing_work: Vec<String> = languages
            .iter()
            .filter(|lang| {
                cards
                    .iter()
                    .any(|card| !done.contains(&(card.id.clone(), (*lang).clone())))
            })
            .cloned()
            .collect();

        info!(
            "Processing {} language(s) for {} card(s) (parallel: {})",
            languages_needing_work.len(),
            cards.len(),
            settings.parallel_languages
        );

        let mut translations = 0usize;
        let mut errors = 0usize;
        let mut touched: HashSet<String> = HashSet::new();
        let mut budget_exhausted = false;

        let chunks: Vec<&[String]> = languages_needing_work
            .chunks(settings.parallel_languages.max(1))
            .collect();
        let chunk_count = chunks.len();

        for (chunk_index, chunk) in chunks.into_iter().enumerate() {
            if started.elapsed() > settings.max_execution_time {
                info!(
                    "Time budget exceeded after {} translation(s); leaving remaining languages for the next invocation",
                    translations
                );
                budget_exhausted = true;
                break;
            }

            // One concurrent task per language; every task returns an outcome
            // instead of failing, so a broken language never cancels its
            // siblings and the join always waits for the full chunk.
            let tasks = chunk
                .iter()
                .map(|lang| self.translate_language(cards, lang, &done, settings.batch_size));
            let outcomes = join_all(tasks).await;

            // Reduce sequentially after the chunk has settled; counters are
            // never shared between in-flight tasks.
            for outcome in outcomes {
                translations += outcome.translations;
                errors += outcome.errors;
                for (card_id, lang) in outcome.written {
                    touched.insert(card_id.clone());
                    done.insert((card_id, lang));
                }
            }

            if chunk_index + 1 < chunk_count && !settings.chunk_delay.is_zero() {
                tokio::time::sleep(settings.chunk_delay).await;
            }
        }

        let (cursor, batch_completed) = Self::advance_cursor(cards, languages, &done);

        Ok(BatchOutcome {
            cards_processed: touched.len(),
            translations,
            errors,
            languages_processed: languages_needing_work.len(),
            budget_exhausted,
            cursor,
            batch_completed,
        })
    }

    /// Translate all pending cards of the batch into one language.
    ///
    /// Infallible by contract: provider failures and rejected writes become
    /// error counts in the returned outcome.
    async fn translate_language(
        &self,
        cards: &[CardRecord],
        lang: &str,
        done: &HashSet<(String, String)>,
        batch_size: usize,
    ) -> LanguageOutcome {
        let pending: Vec<&CardRecord> = cards
            .iter()
            .filter(|card| !done.contains(&(card.id.clone(), lang.to_string())))
            .collect();

        let mut outcome = LanguageOutcome {
            translations: 0,
            errors: 0,
            written: Vec::new(),
        };

        if pending.is_empty() {
            return outcome;
        }

        for group in pending.chunks(batch_size.max(1)) {
            let terms: Vec<String> = group.iter().map(|c| c.term.clone()).collect();
            let results = self.translator.translate_batch(&terms, lang).await;

            if results.is_empty() {
                // Total failure for this call: one error per requested word.
                warn!("Provider returned no results for {} ({} words)", lang, terms.len());
                outcome.errors += terms.len();
                continue;
            }

            // Match results by word first, fall back to positional index.
            let mut by_word: HashMap<&str, &crate::providers::TranslationResult> = HashMap::new();
            for result in &results {
                by_word.entry(result.word.as_str()).or_insert(result);
            }

            for (i, card) in group.iter().enumerate() {
                let result = by_word
                    .get(card.term.as_str())
                    .copied()
                    .or_else(|| results.get(i));

                let Some(result) = result else {
                    outcome.errors += 1;
                    continue;
                };

                if result.translation.is_empty() {
                    // No record is written for a missing translation; the
                    // pair stays pending for a later run.
                    outcome.errors += 1;
                    continue;
                }

                let mut translations = vec![result.translation.clone()];
                translations.extend(
                    result
                        .alternatives
                        .iter()
                        .filter(|alt| !alt.is_empty())
                        .take(MAX_ALTERNATIVES)
                        .cloned(),
                );

                let record = TranslationRecord::new(
                    card.id.clone(),
                    lang.to_string(),
                    translations,
                    self.translator.name().to_string(),
                );

                match self.repo.upsert_translation(&record).await {
                    Ok(()) => {
                        outcome.translations += 1;
                        outcome.written.push((card.id.clone(), lang.to_string()));

                        if !result.example.is_empty() {
                            self.write_enrichment(card, lang, result);
                        }
                    }
                    Err(e) => {
                        error!("Upsert failed for {} -> {}: {}", card.term, lang, e);
                        outcome.errors += 1;
                    }
                }
            }
        }

        outcome
    }

    /// Launch a detached, best-effort enrichment write.
    ///
    /// The task owns everything it needs and swallows its own failure, so it
    /// can never surface into the primary translation path.
    fn write_enrichment(&self, card: &CardRecord, lang: &str, result: &crate::providers::TranslationResult) {
        let repo = self.repo.clone();
        let record = EnrichmentRecord::new(
            card.id.clone(),
            lang.to_string(),
            result.translation.clone(),
            result.example.clone(),
            self.translator.name().to_string(),
        );

        tokio::spawn(async move {
            if let Err(e) = repo.upsert_enrichment(&record).await {
                debug!(
                    "Enrichment write failed for {}/{} (ignored): {}",
                    record.card_id, record.lang, e
                );
            }
        });
    }

    /// Compute the resumption cursor from the post-run completion set.
    ///
    /// The cursor advances to the last card of the contiguous prefix of the
    /// batch that is complete for every requested language. When no card
    /// completed at all, it falls back to the last card in the batch so a
    /// permanently failing provider cannot stall the scan forever.
    fn advance_cursor(
        cards: &[CardRecord],
        languages: &[String],
        done: &HashSet<(String, String)>,
    ) -> (Option<String>, bool) {
        let mut prefix_end: Option<String> = None;
        let mut complete_prefix_len = 0usize;

        for card in cards {
            let complete = languages
                .iter()
                .all(|lang| done.contains(&(card.id.clone(), lang.clone())));
            if !complete {
                break;
            }
            prefix_end = Some(card.id.clone());
            complete_prefix_len += 1;
        }

        let batch_completed = complete_prefix_len == cards.len() && !cards.is_empty();

        let cursor = match prefix_end {
            Some(id) => Some(id),
            None => cards.last().map(|c| c.id.clone()),
        };

        (cursor, batch_completed)
    }
}
