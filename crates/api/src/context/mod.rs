//! Application context - dependency injection container

use std::sync::Arc;

use slothold_core::{
    ObserverConfig, ObserverError, ObserverState, ReminderService, ReservationStore,
    SelectionObserver, SelectionStore, SlotReservationClient, SmsSender,
};
use slothold_domain::{Config, EventType, Result};
use slothold_infra::{HttpReservationStore, LogSmsSender};
use tokio::sync::{watch, Mutex};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub client: Arc<SlotReservationClient>,
    pub selection: Arc<SelectionStore>,
    pub reminders: Arc<ReminderService>,
    event_tx: watch::Sender<Option<EventType>>,
    observer_state: watch::Receiver<ObserverState>,
    observer: Mutex<SelectionObserver>,
}

impl AppContext {
    /// Create a new application context from the environment or a config
    /// file, backed by the HTTP reservation store.
    pub async fn new() -> Result<Self> {
        let config = slothold_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Create a new application context with custom configuration
    pub async fn new_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(HttpReservationStore::new(&config.store)?);
        Self::new_with_store(config, store).await
    }

    /// Create a new application context around an existing store
    ///
    /// Tests and local runs use this with the in-memory store.
    pub async fn new_with_store(config: Config, store: Arc<dyn ReservationStore>) -> Result<Self> {
        Self::new_with_services(config, store, Arc::new(LogSmsSender::new())).await
    }

    /// Create a new application context with every outbound port supplied
    pub async fn new_with_services(
        config: Config,
        store: Arc<dyn ReservationStore>,
        sms: Arc<dyn SmsSender>,
    ) -> Result<Self> {
        config.reservation.validate()?;

        let client = Arc::new(SlotReservationClient::new(store));
        let selection = Arc::new(SelectionStore::new());
        let reminders = Arc::new(ReminderService::new(sms, &config.reminders));
        let (event_tx, event_rx) = watch::channel(None);

        let mut observer = SelectionObserver::new(
            Arc::clone(&client),
            ObserverConfig::from_reservation(&config.reservation),
        );
        let observer_state = observer.subscribe_state();
        observer.start(event_rx, selection.subscribe())?;

        info!(
            minutes_to_book = config.reservation.minutes_to_book,
            heartbeat_ms = config.reservation.heartbeat_interval().as_millis() as u64,
            "application context ready"
        );

        Ok(Self {
            config,
            client,
            selection,
            reminders,
            event_tx,
            observer_state,
            observer: Mutex::new(observer),
        })
    }

    /// Replace the event type the booker is looking at.
    pub fn set_event(&self, event: Option<EventType>) {
        self.event_tx.send_if_modified(|current| {
            if *current == event {
                false
            } else {
                *current = event;
                true
            }
        });
    }

    pub fn event(&self) -> Option<EventType> {
        *self.event_tx.borrow()
    }

    pub fn observer_state(&self) -> ObserverState {
        *self.observer_state.borrow()
    }

    pub fn subscribe_observer_state(&self) -> watch::Receiver<ObserverState> {
        self.observer_state.clone()
    }

    /// Stop the observer, which releases any held reservation.
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        let mut observer = self.observer.lock().await;
        match observer.stop().await {
            Ok(()) | Err(ObserverError::NotRunning) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
