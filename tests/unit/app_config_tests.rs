/*!
 * Tests for configuration loading and validation
 */

use vocabatch::app_config::Config;

use crate::common::create_config_file;

#[test]
fn test_default_shouldMatchServiceDefaults() {
    let config = Config::default();

    assert_eq!(config.pipeline.batch_size, 15);
    assert_eq!(config.pipeline.cards_per_run, 10);
    assert_eq!(config.pipeline.parallel_languages, 5);
    assert_eq!(config.pipeline.max_execution_time_ms, 45_000);
    assert_eq!(config.pipeline.chunk_delay_ms, 50);
    assert_eq!(config.provider.model, "google/gemini-2.5-flash-lite");
    assert_eq!(config.provider.max_tokens, 2000);
    assert_eq!(config.server.bind_addr, "127.0.0.1:8787");
}

#[test]
fn test_fromFile_shouldFillOmittedFieldsWithDefaults() {
    let (dir, path) = create_config_file(
        r#"{
            "pipeline": { "cards_per_run": 25 },
            "provider": { "model": "test/model" }
        }"#,
    )
    .expect("Failed to write config file");

    let config = Config::from_file(&path).expect("Failed to load config");
    assert_eq!(config.pipeline.cards_per_run, 25);
    assert_eq!(config.provider.model, "test/model");
    // Everything else falls back to defaults
    assert_eq!(config.pipeline.batch_size, 15);
    assert_eq!(config.provider.max_tokens, 2000);

    drop(dir);
}

#[test]
fn test_fromFile_shouldRejectMalformedJson() {
    let (dir, path) = create_config_file("{ not json").expect("Failed to write config file");
    assert!(Config::from_file(&path).is_err());
    drop(dir);
}

#[test]
fn test_loadOrDefault_shouldUseDefaultsWhenFileMissing() {
    let config = Config::load_or_default("definitely-missing-conf.json")
        .expect("Missing file must not be an error");
    assert_eq!(config.pipeline.cards_per_run, 10);
}

#[test]
fn test_validate_shouldRejectZeroBatchSize() {
    let mut config = Config::default();
    config.pipeline.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_shouldRejectOutOfRangeTemperature() {
    let mut config = Config::default();
    config.provider.temperature = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_resolveApiKey_shouldPreferConfigValue() {
    let mut config = Config::default();
    config.provider.api_key = "from-config".to_string();
    assert_eq!(config.resolve_api_key(), "from-config");
}
