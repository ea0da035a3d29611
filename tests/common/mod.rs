/*!
 * Common test utilities for the vocabatch test suite
 */

use std::sync::Arc;

use anyhow::Result;
use vocabatch::app_config::PipelineConfig;
use vocabatch::database::models::CardRecord;
use vocabatch::database::Repository;
use vocabatch::pipeline::{PipelineService, RunRequest};
use vocabatch::providers::Translator;

/// Write a config file into a fresh temporary directory.
///
/// The directory guard is returned so callers control its lifetime.
pub fn create_config_file(content: &str) -> Result<(tempfile::TempDir, std::path::PathBuf)> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, content)?;
    Ok((dir, path))
}

/// Pipeline settings sized for fast tests
pub fn test_pipeline_config(cards_per_run: usize) -> PipelineConfig {
    PipelineConfig {
        batch_size: 15,
        cards_per_run,
        parallel_languages: 2,
        max_execution_time_ms: 30_000,
        chunk_delay_ms: 0,
    }
}

/// Create an in-memory repository seeded with cards (id, term)
pub async fn seeded_repository(terms: &[(&str, &str)]) -> Result<Repository> {
    let repo = Repository::new_in_memory()?;
    let cards: Vec<CardRecord> = terms
        .iter()
        .map(|(id, term)| CardRecord::with_id(id.to_string(), term.to_string()))
        .collect();
    if !cards.is_empty() {
        repo.insert_cards(cards).await?;
    }
    Ok(repo)
}

/// Wire a service over a repository and a provider
pub fn build_service(
    repo: Repository,
    translator: Arc<dyn Translator>,
    cards_per_run: usize,
) -> PipelineService {
    PipelineService::new(repo, translator, test_pipeline_config(cards_per_run))
}

/// A request limited to the given target languages
pub fn request_for(languages: &[&str]) -> RunRequest {
    RunRequest {
        languages: Some(languages.iter().map(|l| l.to_string()).collect()),
        ..RunRequest::default()
    }
}
