/*!
 * Tests for the error type hierarchy
 */

use vocabatch::errors::{AppError, PipelineError, ProviderError};

#[test]
fn test_providerError_shouldFormatApiError() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "slow down".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("429"));
    assert!(message.contains("slow down"));
}

#[test]
fn test_pipelineError_shouldWrapProviderError() {
    let provider = ProviderError::AuthenticationError("bad key".to_string());
    let pipeline: PipelineError = provider.into();
    assert!(matches!(pipeline, PipelineError::Provider(_)));
    assert!(pipeline.to_string().contains("bad key"));
}

#[test]
fn test_pipelineError_shouldNameUnsupportedLanguage() {
    let error = PipelineError::UnsupportedLanguage("xx".to_string());
    assert!(error.to_string().contains("xx"));
}

#[test]
fn test_appError_shouldWrapPipelineError() {
    let error: AppError = PipelineError::Selection("query failed".to_string()).into();
    assert!(matches!(error, AppError::Pipeline(_)));
    assert!(error.to_string().contains("query failed"));
}

#[test]
fn test_appError_shouldConvertIoError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_appError_shouldConvertAnyhowError() {
    let error: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(error, AppError::Unknown(_)));
}
