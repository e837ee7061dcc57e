use super::*;
use crate::config::ProviderTimeouts;

// =============================================================================
// build_provider
// =============================================================================

#[tokio::test]
async fn default_config_builds_memory_provider() {
    let provider = build_provider(&AuthConfig::default()).unwrap();

    let mut events = provider.subscribe();
    let first = events.try_next().expect("memory provider reports immediately");
    assert_eq!(first, AuthStateChange { identity: None });

    let err = provider.sign_in("a@x.com", "pw").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[test]
fn identity_toolkit_without_key_is_rejected() {
    let config = AuthConfig { provider: ProviderKind::IdentityToolkit, ..AuthConfig::default() };
    let Err(err) = build_provider(&config) else {
        panic!("expected MissingApiKey");
    };
    assert!(matches!(err, ConfigError::MissingApiKey { ref var } if var == "AUTH_API_KEY_ENV"));
}

#[tokio::test]
async fn identity_toolkit_with_key_builds() {
    let config = AuthConfig {
        provider: ProviderKind::IdentityToolkit,
        api_key: Some("test-key".into()),
        base_url: "http://127.0.0.1:9".into(),
        timeouts: ProviderTimeouts { request_secs: 1, connect_secs: 1 },
        ..AuthConfig::default()
    };
    let provider = build_provider(&config).unwrap();

    // Starts signed out without any network call.
    let mut events = provider.subscribe();
    assert_eq!(events.try_next(), Some(AuthStateChange { identity: None }));
}

// =============================================================================
// Subscription
// =============================================================================

#[tokio::test]
async fn subscription_ends_when_sender_drops() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut subscription = Subscription::new(rx);
    assert!(subscription.try_next().is_none());

    tx.send(AuthStateChange { identity: Some(Identity::new("u1", "a@x.com")) }).unwrap();
    drop(tx);

    let change = subscription.next().await.unwrap();
    assert_eq!(change.identity.map(|i| i.id), Some("u1".to_string()));
    assert!(subscription.next().await.is_none());
}
