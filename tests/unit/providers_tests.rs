/*!
 * Tests for the provider adapter contract
 */

use vocabatch::providers::{MockTranslator, Translator};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[tokio::test]
async fn test_translateBatch_shouldReturnOneResultPerWord() {
    let translator = MockTranslator::working();
    let results = translator.translate_batch(&words(&["hello", "book"]), "fr").await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].word, "hello");
    assert_eq!(results[0].translation, MockTranslator::translation_for("hello", "fr"));
    assert!(!results[0].example.is_empty());
}

#[tokio::test]
async fn test_translateBatch_shouldReturnEmptyListOnTotalFailure() {
    // Total failure surfaces as an empty list, never as a panic or Err
    let translator = MockTranslator::failing();
    let results = translator.translate_batch(&words(&["hello"]), "fr").await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_translateBatch_shouldFailOnlyForConfiguredLanguage() {
    let translator = MockTranslator::failing_for_language("fr");

    assert!(translator.translate_batch(&words(&["hello"]), "fr").await.is_empty());
    assert_eq!(translator.translate_batch(&words(&["hello"]), "es").await.len(), 1);
}

#[tokio::test]
async fn test_translateBatch_shouldLeaveConfiguredWordsEmpty() {
    let translator = MockTranslator::with_empty_words(&["book"]);
    let results = translator.translate_batch(&words(&["hello", "book"]), "fr").await;

    assert_eq!(results.len(), 2);
    assert!(!results[0].translation.is_empty());
    assert!(results[1].translation.is_empty());
}

#[tokio::test]
async fn test_translateBatch_shouldCountCalls() {
    let translator = MockTranslator::working();
    assert_eq!(translator.calls(), 0);

    translator.translate_batch(&words(&["hello"]), "fr").await;
    translator.translate_batch(&words(&["hello"]), "es").await;
    assert_eq!(translator.calls(), 2);
}

#[tokio::test]
async fn test_withoutExamples_shouldOmitExampleSentences() {
    let translator = MockTranslator::working().without_examples();
    let results = translator.translate_batch(&words(&["hello"]), "fr").await;
    assert!(results[0].example.is_empty());
}
