//! Integration tests for the hold commands against the in-memory store.

mod support;

use std::time::Duration;

use slothold_core::ObserverState;
use slothold_domain::{EventType, SlotHoldError};
use slothold_lib::{
    clear_selection, current_hold, is_holding, select_duration, select_event, select_slot,
};
use support::{test_app, wait_for_hold, wait_for_state};

#[tokio::test]
async fn selecting_a_slot_reserves_it_in_utc() {
    let app = test_app().await;

    select_event(&app.ctx, Some(EventType::new(7, 30))).await.unwrap();
    select_slot(&app.ctx, "2024-01-01T10:00:00+02:00").await.unwrap();

    let id = wait_for_hold(&app.ctx, Option::is_some).await.expect("hold");
    let held = app.store.get(&id).expect("hold in store");
    assert_eq!(held.slot_utc_start_date, "2024-01-01T08:00:00Z");
    assert_eq!(held.slot_utc_end_date, "2024-01-01T08:30:00Z");
    assert!(is_holding(&app.ctx));

    let status = current_hold(&app.ctx).await.unwrap();
    assert_eq!(status.reservation_id, Some(id));
    assert_eq!(status.state, "active");
    assert_eq!(status.selected_timeslot.as_deref(), Some("2024-01-01T10:00:00+02:00"));

    app.ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn duration_overrides_event_length() {
    let app = test_app().await;

    select_event(&app.ctx, Some(EventType::new(7, 30))).await.unwrap();
    select_duration(&app.ctx, Some(45)).await.unwrap();
    select_slot(&app.ctx, "2024-01-01T23:30:00Z").await.unwrap();

    let id = wait_for_hold(&app.ctx, Option::is_some).await.expect("hold");
    let held = app.store.get(&id).expect("hold in store");
    assert_eq!(held.slot_utc_end_date, "2024-01-02T00:15:00Z");

    app.ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn clearing_the_selection_releases_the_hold() {
    let app = test_app().await;

    select_event(&app.ctx, Some(EventType::new(7, 30))).await.unwrap();
    select_slot(&app.ctx, "2024-01-01T10:00:00Z").await.unwrap();
    let id = wait_for_hold(&app.ctx, Option::is_some).await.expect("hold");

    clear_selection(&app.ctx).await.unwrap();
    wait_for_state(&app.ctx, ObserverState::Idle).await;

    assert!(app.store.get(&id).is_none());
    assert_eq!(app.store.live_count(), 0);

    app.ctx.shutdown().await.unwrap();
    assert_eq!(app.ctx.client.stats().released, 1);
}

#[tokio::test]
async fn moving_to_another_slot_moves_the_single_hold() {
    let app = test_app().await;

    select_event(&app.ctx, Some(EventType::new(7, 30))).await.unwrap();
    select_slot(&app.ctx, "2024-01-01T10:00:00Z").await.unwrap();
    let id = wait_for_hold(&app.ctx, Option::is_some).await.expect("hold");

    select_slot(&app.ctx, "2024-01-01T11:00:00Z").await.unwrap();

    // The request carries the held id, so the store extends it onto the new range
    let moved = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match app.store.get(&id) {
                Some(hold) if hold.slot_utc_start_date == "2024-01-01T11:00:00Z" => return hold,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    })
    .await
    .expect("hold moved to the new slot");

    assert_eq!(moved.slot_utc_end_date, "2024-01-01T11:30:00Z");
    assert_eq!(app.store.live_count(), 1);
    assert_eq!(app.ctx.client.held(), Some(id.clone()));

    app.ctx.shutdown().await.unwrap();
    assert!(app.store.get(&id).is_none());
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let app = test_app().await;

    let err = select_slot(&app.ctx, "tomorrow at ten").await.unwrap_err();
    assert!(matches!(err, SlotHoldError::InvalidInput(_)));

    let err = select_event(&app.ctx, Some(EventType::new(7, 0))).await.unwrap_err();
    assert!(matches!(err, SlotHoldError::InvalidInput(_)));

    let status = current_hold(&app.ctx).await.unwrap();
    assert_eq!(status.reservation_id, None);
    assert_eq!(status.state, "idle");

    app.ctx.shutdown().await.unwrap();
}
