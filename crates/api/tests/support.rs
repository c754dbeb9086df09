//! Shared helpers for app integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use slothold_core::ObserverState;
use slothold_domain::{Config, ReservationId};
use slothold_infra::{InMemoryReservationStore, LogSmsSender};
use slothold_lib::AppContext;

pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<InMemoryReservationStore>,
    pub sms: Arc<LogSmsSender>,
}

pub async fn test_app() -> TestApp {
    let config = Config::default();
    let store = Arc::new(InMemoryReservationStore::new(&config.reservation));
    let sms = Arc::new(LogSmsSender::new());
    let ctx = AppContext::new_with_services(config, store.clone(), sms.clone())
        .await
        .expect("context should start");
    TestApp { ctx, store, sms }
}

/// Wait until the held identifier satisfies `predicate`.
pub async fn wait_for_hold<F>(ctx: &AppContext, predicate: F) -> Option<ReservationId>
where
    F: Fn(&Option<ReservationId>) -> bool,
{
    let mut rx = ctx.client.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let current = rx.borrow_and_update().clone();
            if predicate(&current) {
                return current;
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    })
    .await
    .expect("hold did not reach the expected state in time")
}

/// Wait until the observer reports `state`.
pub async fn wait_for_state(ctx: &AppContext, state: ObserverState) {
    let mut rx = ctx.subscribe_observer_state();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|current| *current == state))
        .await
        .expect("observer did not reach the expected state in time")
        .expect("observer state channel closed");
}
