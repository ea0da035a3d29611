/*!
 * Tests for the target-language registry
 */

use vocabatch::languages::{
    all_language_codes, is_supported, language_name, SOURCE_LANGUAGE, TARGET_LANGUAGES,
};

#[test]
fn test_targetLanguages_shouldCoverSeventyLanguages() {
    assert_eq!(TARGET_LANGUAGES.len(), 70);
    assert_eq!(all_language_codes().len(), 70);
}

#[test]
fn test_targetLanguages_shouldHaveUniqueCodes() {
    let codes = all_language_codes();
    let unique: std::collections::HashSet<&String> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn test_targetLanguages_shouldNotIncludeSourceLanguage() {
    assert_eq!(SOURCE_LANGUAGE, "en");
    assert!(!is_supported("en"));
}

#[test]
fn test_isSupported_shouldAcceptNonIsoEntries() {
    // Cantonese and Traditional Chinese have no clean ISO 639-1 code
    assert!(is_supported("yue"));
    assert!(is_supported("zh-TW"));
    assert!(is_supported("zh"));
}

#[test]
fn test_isSupported_shouldRejectUnknownCodes() {
    assert!(!is_supported("xx"));
    assert!(!is_supported(""));
    assert!(!is_supported("FR"));
}

#[test]
fn test_languageName_shouldResolveDisplayNames() {
    assert_eq!(language_name("fr"), "French");
    assert_eq!(language_name("yue"), "Cantonese");
}

#[test]
fn test_languageName_shouldFallBackToCode() {
    assert_eq!(language_name("xx"), "xx");
}
