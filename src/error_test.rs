use super::*;

// =============================================================================
// error_code
// =============================================================================

#[test]
fn error_codes_are_distinct() {
    let codes = [
        AuthError::InvalidCredentials.error_code(),
        AuthError::AccountAlreadyExists.error_code(),
        AuthError::NetworkUnavailable.error_code(),
        AuthError::ProviderError("boom".into()).error_code(),
    ];
    for (i, a) in codes.iter().enumerate() {
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn provider_error_code_ignores_message() {
    assert_eq!(AuthError::ProviderError("a".into()).error_code(), "E_PROVIDER");
    assert_eq!(AuthError::ProviderError(String::new()).error_code(), "E_PROVIDER");
}

// =============================================================================
// retryable
// =============================================================================

#[test]
fn only_network_errors_are_retryable() {
    assert!(AuthError::NetworkUnavailable.retryable());
    assert!(!AuthError::InvalidCredentials.retryable());
    assert!(!AuthError::AccountAlreadyExists.retryable());
    assert!(!AuthError::ProviderError("quota".into()).retryable());
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn provider_error_display_includes_message() {
    let err = AuthError::ProviderError("TOO_MANY_ATTEMPTS_TRY_LATER".into());
    assert_eq!(err.to_string(), "provider error: TOO_MANY_ATTEMPTS_TRY_LATER");
}
