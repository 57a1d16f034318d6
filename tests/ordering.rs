//! Interleavings of in-flight queries, toggles and disposal.

mod common;

use common::{GatedStore, Harness};
use follow_sync::{FollowButton, FollowStatus, FollowingTab, SubscriptionRecord, Topic, TopicKey};
use std::sync::Arc;

fn gated_button(h: &Harness, gate: &Arc<GatedStore>, topic: Topic) -> Arc<FollowButton> {
    Arc::new(FollowButton::new(
        topic,
        h.context.clone(),
        gate.clone(),
        h.session.clone(),
    ))
}

#[tokio::test]
async fn test_toggle_outranks_earlier_query() {
    let h = Harness::new();
    let gate = Arc::new(GatedStore::new(h.store.clone()));
    let slow = gated_button(&h, &gate, Topic::bill(193, "H100"));
    let fast = FollowButton::new(
        Topic::bill(193, "H100"),
        h.context.clone(),
        h.store.clone(),
        h.session.clone(),
    );

    let pending = tokio::spawn({
        let slow = slow.clone();
        async move { slow.mount().await }
    });
    // The slow query has read "not following" and is held.
    gate.entered.notified().await;

    fast.mount().await.unwrap();
    fast.activate().await.unwrap();
    assert_eq!(fast.status(), FollowStatus::Following);

    gate.release();
    let status = pending.await.unwrap().unwrap();
    assert_eq!(status, FollowStatus::Following);
    assert_eq!(slow.status(), FollowStatus::Following);
}

#[tokio::test]
async fn test_query_responses_converge_in_any_order() {
    let h = Harness::new();
    h.seed("u1", Topic::user("u2"));
    let gate_a = Arc::new(GatedStore::new(h.store.clone()));
    let gate_b = Arc::new(GatedStore::new(h.store.clone()));
    let a = gated_button(&h, &gate_a, Topic::user("u2"));
    let b = gated_button(&h, &gate_b, Topic::user("u2"));

    let pending_a = tokio::spawn({
        let a = a.clone();
        async move { a.mount().await }
    });
    gate_a.entered.notified().await;
    let pending_b = tokio::spawn({
        let b = b.clone();
        async move { b.mount().await }
    });
    gate_b.entered.notified().await;

    // Later query answers first.
    gate_b.release();
    pending_b.await.unwrap().unwrap();
    gate_a.release();
    pending_a.await.unwrap().unwrap();

    assert_eq!(a.status(), FollowStatus::Following);
    assert_eq!(a.status(), b.status());
}

#[tokio::test]
async fn test_last_arriving_query_wins_without_toggle() {
    let h = Harness::new();
    let gate_a = Arc::new(GatedStore::new(h.store.clone()));
    let gate_b = Arc::new(GatedStore::new(h.store.clone()));
    let a = gated_button(&h, &gate_a, Topic::user("u2"));
    let b = gated_button(&h, &gate_b, Topic::user("u2"));

    let pending_a = tokio::spawn({
        let a = a.clone();
        async move { a.mount().await }
    });
    gate_a.entered.notified().await;

    // The record appears through another device between the two reads.
    h.store
        .insert(SubscriptionRecord::new(common::uid("u1"), Topic::user("u2")));
    let pending_b = tokio::spawn({
        let b = b.clone();
        async move { b.mount().await }
    });
    gate_b.entered.notified().await;

    gate_b.release();
    pending_b.await.unwrap().unwrap();
    gate_a.release();
    pending_a.await.unwrap().unwrap();

    // Both buttons read the one shared value.
    assert_eq!(a.status(), b.status());
    assert_eq!(a.status(), FollowStatus::NotFollowing);
}

#[tokio::test]
async fn test_disposed_button_drops_late_response() {
    let h = Harness::new();
    h.seed("u1", Topic::bill(193, "H100"));
    let gate = Arc::new(GatedStore::new(h.store.clone()));
    let button = gated_button(&h, &gate, Topic::bill(193, "H100"));

    let pending = tokio::spawn({
        let button = button.clone();
        async move { button.mount().await }
    });
    gate.entered.notified().await;
    button.dispose();
    gate.release();

    assert_eq!(pending.await.unwrap().unwrap(), FollowStatus::Unknown);
    assert_eq!(
        h.context.get_status(&TopicKey::bill(193, "H100")),
        FollowStatus::Unknown
    );
}

#[tokio::test]
async fn test_disposed_tab_drops_late_listing() {
    let h = Harness::new();
    h.seed("u1", Topic::bill(193, "H100"));
    let gate = Arc::new(GatedStore::new(h.store.clone()));
    let tab = Arc::new(FollowingTab::new(
        gate.clone(),
        h.context.clone(),
        h.session.clone(),
    ));

    let pending = tokio::spawn({
        let tab = tab.clone();
        async move { tab.refresh().await }
    });
    gate.entered.notified().await;
    tab.dispose();
    // One permit per listing call.
    gate.release();
    gate.release();

    assert!(!pending.await.unwrap().unwrap());
    assert!(tab.lists().bills.is_empty());
    assert_eq!(h.context.watcher_count(), 0);
}

#[tokio::test]
async fn test_unfollow_during_listing_is_not_overwritten() {
    let h = Harness::new();
    h.seed("u1", Topic::bill(193, "H100"));
    let gate = Arc::new(GatedStore::new(h.store.clone()));
    let tab = Arc::new(FollowingTab::new(
        gate.clone(),
        h.context.clone(),
        h.session.clone(),
    ));
    let button = FollowButton::new(
        Topic::bill(193, "H100"),
        h.context.clone(),
        h.store.clone(),
        h.session.clone(),
    );
    button.mount().await.unwrap();

    let pending = tokio::spawn({
        let tab = tab.clone();
        async move { tab.refresh().await }
    });
    gate.entered.notified().await;
    button.activate().await.unwrap();
    // Lists are still empty, so there is nothing to clear yet.
    assert!(!tab.sync());
    gate.release();
    gate.release();

    assert!(pending.await.unwrap().unwrap());
    assert_eq!(button.status(), FollowStatus::NotFollowing);
    // The held listing still contained the bill; it must not be shown.
    assert!(tab.lists().bills.is_empty());
    assert!(!tab.sync());
}

#[tokio::test]
async fn test_sync_after_dispose_changes_nothing() {
    let h = Harness::new();
    h.seed("u1", Topic::bill(193, "H100"));
    let tab = FollowingTab::new(h.store.clone(), h.context.clone(), h.session.clone());
    assert!(tab.refresh().await.unwrap());

    tab.dispose();
    assert_eq!(h.context.watcher_count(), 0);

    assert!(!tab.sync());
    assert_eq!(h.context.watcher_count(), 0);
    assert_eq!(tab.lists().bills.len(), 1);
}

#[tokio::test]
async fn test_overflowed_watcher_is_replaced() {
    let h = Harness::new();
    let context = Arc::new(follow_sync::FollowStatusContext::with_config(
        &follow_sync::FollowConfig {
            watch_buffer_size: 1,
            ..Default::default()
        },
    ));
    h.seed("u1", Topic::bill(193, "H100"));
    let tab = FollowingTab::new(h.store.clone(), context.clone(), h.session.clone());
    tab.refresh().await.unwrap();

    context.set_status(&TopicKey::bill(193, "H200"), true);
    context.set_status(&TopicKey::bill(193, "H300"), true);
    assert_eq!(context.watcher_count(), 0);

    assert!(tab.sync());
    assert_eq!(context.watcher_count(), 1);
    assert!(tab.lists().bills.is_empty());
}
