//! Selection store
//!
//! The booker writes the chosen slot and duration here; the observer only
//! reads it. Backed by a `watch` channel so readers always see the latest
//! value and never a queue of intermediate ones.

use chrono::{DateTime, FixedOffset};
use slothold_domain::Selection;
use tokio::sync::watch;

#[derive(Debug)]
pub struct SelectionStore {
    tx: watch::Sender<Selection>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Selection::default());
        Self { tx }
    }

    /// Replace the whole selection.
    pub fn select(&self, selection: Selection) {
        self.tx.send_if_modified(|current| {
            if *current == selection {
                false
            } else {
                *current = selection;
                true
            }
        });
    }

    pub fn select_timeslot(&self, timeslot: DateTime<FixedOffset>) {
        self.tx.send_if_modified(|current| {
            let changed = current.selected_timeslot != Some(timeslot);
            current.selected_timeslot = Some(timeslot);
            changed
        });
    }

    pub fn select_duration(&self, minutes: Option<u32>) {
        self.tx.send_if_modified(|current| {
            let changed = current.selected_duration != minutes;
            current.selected_duration = minutes;
            changed
        });
    }

    /// Drop the selected timeslot; the chosen duration is kept for the next
    /// slot the booker picks.
    pub fn clear(&self) {
        self.tx.send_if_modified(|current| current.selected_timeslot.take().is_some());
    }

    pub fn current(&self) -> Selection {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.tx.subscribe()
    }
}
