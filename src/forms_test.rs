use std::sync::Arc;

use super::*;
use crate::notice::NoticeKind;
use crate::provider::MemoryProvider;
use crate::session::SessionStatus;

async fn store_with_account() -> (Arc<MemoryProvider>, SessionStore) {
    let provider = Arc::new(MemoryProvider::new());
    provider.add_account("a@x.com", "pw123");
    let store = SessionStore::start(provider.clone());
    store.wait_until_known().await;
    (provider, store)
}

// =============================================================================
// FormError
// =============================================================================

#[test]
fn missing_field_messages_name_the_field() {
    assert_eq!(FormError::MissingField(Field::Email).to_string(), "Email is required.");
    assert_eq!(FormError::MissingField(Field::Password).to_string(), "Password is required.");
    assert_eq!(FormError::MissingField(Field::ConfirmPassword).to_string(), "Confirm Password is required.");
    assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords do not match");
}

#[test]
fn missing_field_is_info_mismatch_is_error() {
    assert_eq!(FormError::MissingField(Field::Email).notice().kind, NoticeKind::Info);
    assert_eq!(FormError::PasswordMismatch.notice().kind, NoticeKind::Error);
}

// =============================================================================
// LoginForm
// =============================================================================

#[test]
fn login_validate_checks_email_first() {
    assert_eq!(LoginForm::default().validate().unwrap_err(), FormError::MissingField(Field::Email));
    assert_eq!(
        LoginForm::new("a@x.com", "").validate().unwrap_err(),
        FormError::MissingField(Field::Password)
    );
    assert_eq!(LoginForm::new("   ", "pw").validate().unwrap_err(), FormError::MissingField(Field::Email));
}

#[test]
fn whitespace_only_fields_count_as_missing() {
    // Stricter than a plain emptiness check: blanks never reach the provider.
    assert_eq!(LoginForm::new("  ", "pw").validate().unwrap_err(), FormError::MissingField(Field::Email));
    assert_eq!(LoginForm::new("a@x.com", " \t ").validate().unwrap_err(), FormError::MissingField(Field::Password));
    assert_eq!(
        RegisterForm::new("b@x.com", "pw", "   ").validate().unwrap_err(),
        FormError::MissingField(Field::ConfirmPassword)
    );
}

#[test]
fn login_validate_trims_email_only() {
    let credentials = LoginForm::new(" a@x.com ", " pw ").validate().unwrap();
    assert_eq!(credentials.email(), "a@x.com");
    assert_eq!(credentials.password(), " pw ");
}

#[tokio::test]
async fn login_with_empty_field_never_calls_provider() {
    let (provider, store) = store_with_account().await;

    let notice = LoginForm::new("", "pw123").submit(&store, &AuthConfig::default()).await;
    assert_eq!(notice.message, "Email is required.");
    let notice = LoginForm::new("a@x.com", "").submit(&store, &AuthConfig::default()).await;
    assert_eq!(notice.message, "Password is required.");

    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn login_success_notice() {
    let (provider, store) = store_with_account().await;
    let notice = LoginForm::new("a@x.com", "pw123").submit(&store, &AuthConfig::default()).await;

    assert_eq!(notice, Notice::success(LOGIN_SUCCESS));
    assert_eq!(provider.call_count(), 1);
    assert!(store.status().is_authenticated());
}

#[tokio::test]
async fn login_failure_notice_keeps_status() {
    let (_provider, store) = store_with_account().await;
    let notice = LoginForm::new("a@x.com", "wrong").submit(&store, &AuthConfig::default()).await;

    assert_eq!(notice, Notice::error(LOGIN_FAILED));
    assert_eq!(store.status(), SessionStatus::Unauthenticated);
}

// =============================================================================
// RegisterForm
// =============================================================================

#[test]
fn register_validate_order() {
    assert_eq!(RegisterForm::default().validate().unwrap_err(), FormError::MissingField(Field::Email));
    assert_eq!(
        RegisterForm::new("b@x.com", "", "").validate().unwrap_err(),
        FormError::MissingField(Field::Password)
    );
    assert_eq!(
        RegisterForm::new("b@x.com", "pw", "").validate().unwrap_err(),
        FormError::MissingField(Field::ConfirmPassword)
    );
    assert_eq!(RegisterForm::new("b@x.com", "pw", "pw2").validate().unwrap_err(), FormError::PasswordMismatch);
}

#[tokio::test]
async fn register_mismatch_never_calls_provider() {
    let (provider, store) = store_with_account().await;
    let notice = RegisterForm::new("b@x.com", "pw1", "pw2").submit(&store, &AuthConfig::default()).await;

    assert_eq!(notice.message, "Passwords do not match");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn register_success_notice() {
    let (_provider, store) = store_with_account().await;
    let notice = RegisterForm::new("b@x.com", "pw1", "pw1").submit(&store, &AuthConfig::default()).await;

    assert_eq!(notice, Notice::success(REGISTER_SUCCESS));
    assert_eq!(store.status().identity().map(|i| i.email.as_str()), Some("b@x.com"));
}

#[tokio::test]
async fn register_existing_account_shows_generic_error() {
    let (provider, store) = store_with_account().await;
    let notice = RegisterForm::new("a@x.com", "pw123", "pw123").submit(&store, &AuthConfig::default()).await;

    assert_eq!(notice, Notice::error(REGISTER_FAILED));
    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.status(), SessionStatus::Unauthenticated);
}

// =============================================================================
// Notice timing
// =============================================================================

#[tokio::test]
async fn submit_notices_use_configured_duration() {
    let (_provider, store) = store_with_account().await;
    let config = AuthConfig { notice_duration_ms: 750, ..AuthConfig::default() };
    let expected = std::time::Duration::from_millis(750);

    let rejected = LoginForm::new("", "pw123").submit(&store, &config).await;
    assert_eq!(rejected.duration, expected);

    let failed = LoginForm::new("a@x.com", "wrong").submit(&store, &config).await;
    assert_eq!(failed.duration, expected);

    let mismatch = RegisterForm::new("b@x.com", "pw1", "pw2").submit(&store, &config).await;
    assert_eq!(mismatch.duration, expected);

    let registered = RegisterForm::new("b@x.com", "pw1", "pw1").submit(&store, &config).await;
    assert_eq!(registered, Notice::success(REGISTER_SUCCESS).with_duration(expected));
}
