use super::*;

fn alice() -> Identity {
    Identity::new("u1", "alice@example.com")
}

// =============================================================================
// subscribe
// =============================================================================

#[test]
fn undetermined_subscribe_delivers_nothing() {
    let listeners = Listeners::new();
    let mut sub = listeners.subscribe();
    assert!(sub.try_next().is_none());
    assert!(!listeners.is_determined());
}

#[test]
fn determined_subscribe_delivers_current_state() {
    let listeners = Listeners::determined(Some(alice()));
    let mut sub = listeners.subscribe();
    assert_eq!(sub.try_next(), Some(AuthStateChange { identity: Some(alice()) }));
    assert!(sub.try_next().is_none());
}

#[test]
fn determined_signed_out_delivers_none_identity() {
    let listeners = Listeners::determined(None);
    let mut sub = listeners.subscribe();
    assert_eq!(sub.try_next(), Some(AuthStateChange { identity: None }));
}

// =============================================================================
// publish
// =============================================================================

#[test]
fn publish_reaches_every_subscriber_in_order() {
    let listeners = Listeners::new();
    let mut a = listeners.subscribe();
    let mut b = listeners.subscribe();

    listeners.publish(Some(alice()));
    listeners.publish(None);

    for sub in [&mut a, &mut b] {
        assert_eq!(sub.try_next(), Some(AuthStateChange { identity: Some(alice()) }));
        assert_eq!(sub.try_next(), Some(AuthStateChange { identity: None }));
        assert!(sub.try_next().is_none());
    }
}

#[test]
fn publish_updates_current_identity() {
    let listeners = Listeners::new();
    assert!(listeners.current_identity().is_none());

    listeners.publish(Some(alice()));
    assert!(listeners.is_determined());
    assert_eq!(listeners.current_identity(), Some(alice()));

    listeners.publish(None);
    assert!(listeners.is_determined());
    assert!(listeners.current_identity().is_none());
}

#[test]
fn late_subscriber_sees_only_latest_state() {
    let listeners = Listeners::new();
    listeners.publish(None);
    listeners.publish(Some(alice()));

    let mut sub = listeners.subscribe();
    assert_eq!(sub.try_next(), Some(AuthStateChange { identity: Some(alice()) }));
    assert!(sub.try_next().is_none());
}

// =============================================================================
// unsubscribe
// =============================================================================

#[test]
fn dropped_subscription_is_pruned() {
    let listeners = Listeners::new();
    let keep = listeners.subscribe();
    let dropped = listeners.subscribe();
    assert_eq!(listeners.subscriber_count(), 2);

    drop(dropped);
    assert_eq!(listeners.subscriber_count(), 1);

    listeners.publish(None);
    assert_eq!(listeners.subscriber_count(), 1);
    drop(keep);
    assert_eq!(listeners.subscriber_count(), 0);
}

#[tokio::test]
async fn next_returns_none_after_listeners_dropped() {
    let listeners = Listeners::new();
    let mut sub = listeners.subscribe();
    listeners.publish(None);
    drop(listeners);

    assert_eq!(sub.next().await, Some(AuthStateChange { identity: None }));
    assert!(sub.next().await.is_none());
}
