//! Reservation store adapters

pub mod http;
pub mod memory;

pub use http::HttpReservationStore;
pub use memory::InMemoryReservationStore;
