//! Core domain types for Stopwise delivery-route planning.
//!
//! Responsibilities:
//! - Model the origin, clicked destinations and derived rankings.
//! - Order destinations by driving time from the origin.
//! - Own per-view session state and reconcile overlapping recomputes.
//! - Wire map input to recomputation through the [`RoutePlanner`].
//!
//! Boundaries:
//! - Distance, routing and map rendering are collaborators behind the
//!   [`TravelTimeProvider`], [`RoutingService`] and [`map::MapSurface`]
//!   traits. Concrete HTTP adapters live in `stopwise-data`.
//!
//! Invariants:
//! - The stop sequence sent for routing is always the origin followed by the
//!   destinations in ascending travel-time order from that origin.
//! - Single-threaded: collaborator futures are `?Send` and recomputes run on
//!   a Tokio `LocalSet`.

#![forbid(unsafe_code)]

mod coordinate;
mod error;
pub mod map;
mod planner;
mod routing;
mod sequencer;
mod session;
pub mod travel_time;

#[doc(hidden)]
pub mod test_support;

pub use coordinate::{Coordinate, CoordinateError};
pub use error::{ErrorClass, ServiceError};
pub use planner::{PlannerConfig, RecomputeOutcome, RoutePlanner};
pub use routing::{RouteGeometry, RouteLeg, RouteSummary, RoutingService};
pub use sequencer::{RankedDestination, rank, rank_with_times};
pub use session::{
    ApplyPolicy, Completion, DeliverySession, Destination, PlannedRoute, RecomputeTicket,
    RouteStatus,
};
pub use travel_time::{TravelTimeProvider, TravelTimes, UNREACHABLE};
