/*!
 * Work selection for the batch pipeline.
 *
 * The selector answers one question: which cards still need translations?
 * It delegates the counting to an indexed aggregation query so the corpus is
 * never loaded into memory, and honors the resumption cursor as a strict
 * lower bound on card ids.
 */

use anyhow::Result;
use log::debug;

use crate::database::models::CardRecord;
use crate::database::Repository;

/// Selects the next bounded batch of incomplete cards
#[derive(Clone)]
pub struct WorkSelector {
    /// Repository backing the corpus and the completion index
    repo: Repository,
}

impl WorkSelector {
    /// Create a new selector over the given repository
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Return up to `cards_per_run` cards, ascending by id and strictly
    /// greater than `continue_from`, whose count of distinct translated
    /// languages is below `total_languages`.
    ///
    /// An empty result is the pipeline's terminal condition for the given
    /// cursor. A shortfall (fewer cards than requested) is natural near the
    /// end of the corpus, not an error.
    pub async fn next_batch(
        &self,
        total_languages: usize,
        cards_per_run: usize,
        continue_from: Option<String>,
    ) -> Result<Vec<CardRecord>> {
        let cards = self
            .repo
            .select_cards_needing_translation(total_languages, cards_per_run, continue_from.clone())
            .await?;

        debug!(
            "Selected {} card(s) needing translation (cursor: {:?})",
            cards.len(),
            continue_from
        );

        Ok(cards)
    }
}
