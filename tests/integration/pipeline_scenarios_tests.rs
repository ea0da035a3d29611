/*!
 * End-to-end pipeline behavior tests.
 *
 * These drive the public service API against an in-memory database and the
 * configurable mock provider, covering the resumability and failure-isolation
 * guarantees of the batch job.
 */

use std::sync::Arc;

use vocabatch::app_config::PipelineConfig;
use vocabatch::pipeline::{PipelineService, RunOutcome, RunRequest};
use vocabatch::providers::MockTranslator;

use crate::common::{build_service, request_for, seeded_repository, test_pipeline_config};

const CORPUS: &[(&str, &str)] = &[
    ("c01", "hello"),
    ("c02", "book"),
    ("c03", "run"),
    ("c04", "water"),
    ("c05", "house"),
];

#[tokio::test]
async fn test_pipeline_shouldProcessSmallCorpusInOneInvocation() {
    let repo = seeded_repository(&[("c1", "one"), ("c2", "two"), ("c3", "three")])
        .await
        .unwrap();
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 10);

    let outcome = service
        .run_invocation(&request_for(&["fr", "es"]))
        .await
        .unwrap();

    match outcome {
        RunOutcome::Progress {
            stats, has_more, ..
        } => {
            // 3 cards x 2 languages in a single run, nothing left over
            assert_eq!(stats.translations, 6);
            assert_eq!(stats.cards_processed, 3);
            assert_eq!(stats.errors, 0);
            assert!(!has_more);
        }
        RunOutcome::Completed => panic!("expected progress"),
    }
    assert_eq!(repo.count_translations().await.unwrap(), 6);
}

#[tokio::test]
async fn test_pipeline_shouldOnlySelectIncompleteCards() {
    let repo = seeded_repository(&[("c1", "one"), ("c2", "two"), ("c3", "three")])
        .await
        .unwrap();

    // c2 already has both requested languages recorded
    for lang in ["fr", "es"] {
        let record = vocabatch::database::models::TranslationRecord::new(
            "c2".to_string(),
            lang.to_string(),
            vec![MockTranslator::translation_for("two", lang)],
            "mock".to_string(),
        );
        repo.upsert_translation(&record).await.unwrap();
    }

    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 10);
    let outcome = service
        .run_invocation(&request_for(&["fr", "es"]))
        .await
        .unwrap();

    match outcome {
        RunOutcome::Progress { stats, .. } => {
            // Only c1 and c3 were pending: exactly 4 new records
            assert_eq!(stats.translations, 4);
            assert_eq!(stats.cards_processed, 2);
        }
        RunOutcome::Completed => panic!("expected progress"),
    }
    assert_eq!(repo.count_translations().await.unwrap(), 6);
}

#[tokio::test]
async fn test_pipeline_shouldTranslateFreshCorpusCompletely() {
    let repo = seeded_repository(CORPUS).await.unwrap();
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 2);

    let totals = service
        .run_to_completion(&request_for(&["fr", "es", "de"]), false)
        .await
        .unwrap();

    assert_eq!(totals.translations, 15);
    assert_eq!(totals.errors, 0);
    assert_eq!(totals.cards_processed, 5);
    assert_eq!(repo.count_translations().await.unwrap(), 15);

    let record = repo.get_translation("c03", "de").await.unwrap().unwrap();
    assert_eq!(record.translations[0], MockTranslator::translation_for("run", "de"));
    assert_eq!(record.provider, "mock");
}

#[tokio::test]
async fn test_pipeline_shouldBeIdempotentOnRerun() {
    let repo = seeded_repository(CORPUS).await.unwrap();
    let languages = request_for(&["fr", "es"]);

    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 3);
    service.run_to_completion(&languages, false).await.unwrap();

    let first = repo.get_translation("c01", "fr").await.unwrap().unwrap();

    // Fresh provider so the call counter starts at zero
    let mock = Arc::new(MockTranslator::working());
    let service = build_service(repo.clone(), mock.clone(), 3);
    let totals = service.run_to_completion(&languages, false).await.unwrap();

    assert_eq!(totals.translations, 0);
    assert_eq!(mock.calls(), 0);
    assert_eq!(repo.count_translations().await.unwrap(), 10);

    // Existing records untouched
    let second = repo.get_translation("c01", "fr").await.unwrap().unwrap();
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_pipeline_shouldIsolateFailingLanguageAndBackfillLater() {
    let repo = seeded_repository(CORPUS).await.unwrap();
    let languages = request_for(&["fr", "es"]);

    // French is down; Spanish keeps working in the same chunks
    let service = build_service(
        repo.clone(),
        Arc::new(MockTranslator::failing_for_language("fr")),
        10,
    );
    let outcome = service.run_invocation(&languages).await.unwrap();
    match outcome {
        RunOutcome::Progress { stats, .. } => {
            assert_eq!(stats.translations, 5);
            assert_eq!(stats.errors, 5);
        }
        RunOutcome::Completed => panic!("expected progress"),
    }
    assert!(repo.get_translation("c01", "es").await.unwrap().is_some());
    assert!(repo.get_translation("c01", "fr").await.unwrap().is_none());

    // The partially translated cards are still selectable; a later run with
    // a healthy provider fills only the gap.
    let mock = Arc::new(MockTranslator::working());
    let service = build_service(repo.clone(), mock.clone(), 10);
    let totals = service.run_to_completion(&languages, false).await.unwrap();

    assert_eq!(totals.translations, 5);
    assert_eq!(repo.count_translations().await.unwrap(), 10);
    assert!(repo.get_translation("c01", "fr").await.unwrap().is_some());
}

#[tokio::test]
async fn test_pipeline_shouldResumeAfterBudgetExhaustion() {
    let repo = seeded_repository(&[("c01", "hello")]).await.unwrap();

    // Each provider call takes 40ms against a 10ms budget with one language
    // per chunk: every invocation completes exactly one chunk, then yields.
    let config = PipelineConfig {
        parallel_languages: 1,
        max_execution_time_ms: 10,
        chunk_delay_ms: 0,
        ..test_pipeline_config(10)
    };
    let service = PipelineService::new(
        repo.clone(),
        Arc::new(MockTranslator::slow(40)),
        config,
    );
    let request = request_for(&["fr", "es", "de"]);

    let outcome = service.run_invocation(&request).await.unwrap();
    match &outcome {
        RunOutcome::Progress { stats, has_more, .. } => {
            assert_eq!(stats.translations, 1);
            assert!(*has_more);
        }
        RunOutcome::Completed => panic!("expected progress"),
    }
    assert_eq!(repo.count_translations().await.unwrap(), 1);

    // Chaining invocations through the cursor finishes the job
    let totals = service.run_to_completion(&request, false).await.unwrap();
    assert_eq!(totals.translations, 2);
    assert_eq!(repo.count_translations().await.unwrap(), 3);
}

#[tokio::test]
async fn test_pipeline_shouldRetryEmptyTranslationsOnLaterRun() {
    let repo = seeded_repository(&[("c01", "hello"), ("c02", "book")]).await.unwrap();
    let languages = request_for(&["fr"]);

    // The provider answers but leaves "book" untranslated
    let service = build_service(
        repo.clone(),
        Arc::new(MockTranslator::with_empty_words(&["book"])),
        10,
    );
    let outcome = service.run_invocation(&languages).await.unwrap();
    match outcome {
        RunOutcome::Progress { stats, .. } => {
            assert_eq!(stats.translations, 1);
            assert_eq!(stats.errors, 1);
        }
        RunOutcome::Completed => panic!("expected progress"),
    }

    // No record at all for the failed word, not an empty one
    assert!(repo.get_translation("c02", "fr").await.unwrap().is_none());
    assert_eq!(repo.count_translations().await.unwrap(), 1);

    // The pair is picked up again once the provider recovers
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 10);
    let totals = service.run_to_completion(&languages, false).await.unwrap();
    assert_eq!(totals.translations, 1);
    assert!(repo.get_translation("c02", "fr").await.unwrap().is_some());
}

#[tokio::test]
async fn test_pipeline_shouldTerminateOnPermanentProviderOutage() {
    let repo = seeded_repository(CORPUS).await.unwrap();
    let service = build_service(repo.clone(), Arc::new(MockTranslator::failing()), 2);

    // The fallback cursor keeps the scan advancing even though nothing is
    // ever written, so the driver must reach the end of the corpus.
    let totals = service
        .run_to_completion(&request_for(&["fr"]), false)
        .await
        .unwrap();

    assert_eq!(totals.translations, 0);
    assert_eq!(totals.errors, 5);
    assert_eq!(repo.count_translations().await.unwrap(), 0);
}

#[tokio::test]
async fn test_pipeline_shouldChainCursorsAcrossManualInvocations() {
    let repo = seeded_repository(CORPUS).await.unwrap();
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 2);

    let mut cursor: Option<String> = None;
    let mut invocations = 0;

    loop {
        let request = RunRequest {
            continue_from: cursor.clone(),
            ..request_for(&["fr"])
        };
        match service.run_invocation(&request).await.unwrap() {
            RunOutcome::Completed => break,
            RunOutcome::Progress {
                has_more,
                continue_from,
                ..
            } => {
                invocations += 1;
                assert!(invocations <= 5, "cursor failed to advance");
                if !has_more {
                    break;
                }
                cursor = continue_from;
            }
        }
    }

    // 5 cards at 2 per run
    assert_eq!(invocations, 3);
    assert_eq!(repo.count_translations().await.unwrap(), 5);
}

#[tokio::test]
async fn test_pipeline_shouldWriteEnrichmentsBestEffort() {
    let repo = seeded_repository(&[("c01", "hello")]).await.unwrap();
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), 10);

    service
        .run_to_completion(&request_for(&["fr"]), false)
        .await
        .unwrap();

    // Detached writes need a moment to land
    for _ in 0..50 {
        if repo.count_enrichments().await.unwrap() > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(repo.get_enrichment("c01", "fr").await.unwrap().is_some());
}
