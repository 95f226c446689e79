//! Facade crate for Stopwise delivery-route planning.
//!
//! This crate re-exports the core planner and domain types and exposes the
//! TomTom service adapter behind the `tomtom` feature.

#![forbid(unsafe_code)]

pub use stopwise_core::{
    ApplyPolicy, Completion, Coordinate, CoordinateError, DeliverySession, Destination,
    ErrorClass, PlannedRoute, PlannerConfig, RankedDestination, RecomputeOutcome, RecomputeTicket,
    RouteGeometry, RouteLeg, RoutePlanner, RouteStatus, RouteSummary, RoutingService,
    ServiceError, TravelTimeProvider, TravelTimes, UNREACHABLE, map, rank, rank_with_times,
};

#[cfg(feature = "tomtom")]
pub use stopwise_data::tomtom::{TomTomClient, TomTomConfig, TravelMode};
