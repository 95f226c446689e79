//! Query travel times from an origin to a set of destinations.
//!
//! The `TravelTimeProvider` trait abstracts the one-to-many matrix query used
//! to order delivery stops. Callers supply an origin and a slice of
//! destinations and receive one [`Duration`](std::time::Duration) per
//! destination, aligned by index.
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice, or when
//! the backing service fails.

mod provider;

pub use provider::{TravelTimeProvider, TravelTimes, UNREACHABLE};
