//! Per-view delivery session state.
//!
//! A [`DeliverySession`] owns the origin, the clicked destinations and the
//! bookkeeping that decides which recompute result ends up on the map. It is
//! created when the view mounts and dropped when it unmounts.
//!
//! Every recompute receives a [`RecomputeTicket`] snapshotting the origin and
//! destinations at issue time. Completions are reported back through
//! [`DeliverySession::complete`], which applies the [`ApplyPolicy`].

use crate::{Coordinate, RankedDestination, RouteGeometry, ServiceError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A delivery stop added by a map click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// Stop position.
    pub location: Coordinate,
    /// Zero-based index in the click sequence.
    pub ordinal: usize,
}

impl Destination {
    /// One-based label shown on the stop's marker.
    #[must_use]
    pub const fn label(&self) -> usize {
        self.ordinal + 1
    }
}

/// How overlapping recompute completions are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ApplyPolicy {
    /// Apply a completion only if it was issued after every completion
    /// applied so far.
    #[default]
    LastRequestWins,
    /// Apply every completion in arrival order.
    LastCompletionWins,
}

/// Snapshot handed to an asynchronous recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeTicket {
    /// Monotonically increasing request number, starting at 1.
    pub sequence: u64,
    /// Origin at issue time.
    pub origin: Coordinate,
    /// Destinations in click order at issue time.
    pub destinations: Vec<Coordinate>,
}

/// A route ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// Stops sent to the routing service, origin first.
    pub stops: Vec<Coordinate>,
    /// Destinations with their travel times, in visiting order.
    pub ranked: Vec<RankedDestination>,
    /// Geometry returned by the routing service.
    pub geometry: RouteGeometry,
}

/// Observable recompute state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RouteStatus {
    /// No recompute is outstanding.
    #[default]
    Idle,
    /// At least one recompute has been issued and not completed.
    Recomputing {
        /// Number of outstanding recomputes.
        pending: usize,
    },
    /// The most recent applicable recompute failed.
    Failed(ServiceError),
}

/// Result of reporting a completion to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The route replaced the displayed one.
    Applied(PlannedRoute),
    /// A newer completion was already applied; the result was dropped.
    Superseded,
    /// The recompute failed; the displayed route is unchanged.
    Failed(ServiceError),
}

/// State for one mounted map view.
#[derive(Debug, Clone)]
pub struct DeliverySession {
    origin: Coordinate,
    destinations: Vec<Destination>,
    policy: ApplyPolicy,
    issued: u64,
    latest_applied: u64,
    pending: usize,
    failure: Option<ServiceError>,
    displayed: Option<PlannedRoute>,
}

impl DeliverySession {
    /// Start an empty session at `origin`.
    ///
    /// # Examples
    /// ```
    /// use stopwise_core::{ApplyPolicy, Coordinate, DeliverySession, RouteStatus};
    ///
    /// let origin = Coordinate::new(41.0082, 28.9784)?;
    /// let session = DeliverySession::new(origin, ApplyPolicy::default());
    /// assert!(session.destinations().is_empty());
    /// assert_eq!(session.status(), RouteStatus::Idle);
    /// # Ok::<(), stopwise_core::CoordinateError>(())
    /// ```
    #[must_use]
    pub const fn new(origin: Coordinate, policy: ApplyPolicy) -> Self {
        Self {
            origin,
            destinations: Vec::new(),
            policy,
            issued: 0,
            latest_applied: 0,
            pending: 0,
            failure: None,
            displayed: None,
        }
    }

    /// Current origin.
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Relocate the origin.
    ///
    /// Existing destinations are kept; the next recompute ranks them from the
    /// new origin.
    pub const fn move_origin(&mut self, origin: Coordinate) {
        self.origin = origin;
    }

    /// Destinations in click order.
    #[must_use]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Completion policy in force.
    #[must_use]
    pub const fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    /// The route currently on the map, if any.
    #[must_use]
    pub const fn displayed(&self) -> Option<&PlannedRoute> {
        self.displayed.as_ref()
    }

    /// Derive the observable state.
    #[must_use]
    pub fn status(&self) -> RouteStatus {
        if self.pending > 0 {
            RouteStatus::Recomputing {
                pending: self.pending,
            }
        } else if let Some(error) = &self.failure {
            RouteStatus::Failed(error.clone())
        } else {
            RouteStatus::Idle
        }
    }

    /// Append a destination and issue a recompute for the new set.
    ///
    /// Duplicate positions are appended like any other click.
    pub fn add_destination(&mut self, location: Coordinate) -> (Destination, RecomputeTicket) {
        let destination = Destination {
            location,
            ordinal: self.destinations.len(),
        };
        self.destinations.push(destination);
        (destination, self.begin_recompute())
    }

    /// Issue a recompute ticket for the current origin and destinations.
    ///
    /// Clears any previous failure.
    pub fn begin_recompute(&mut self) -> RecomputeTicket {
        self.issued += 1;
        self.pending += 1;
        self.failure = None;
        RecomputeTicket {
            sequence: self.issued,
            origin: self.origin,
            destinations: self.destinations.iter().map(|d| d.location).collect(),
        }
    }

    /// Report the outcome of the recompute issued as `sequence`.
    ///
    /// Under [`ApplyPolicy::LastRequestWins`] a completion older than one
    /// already applied (successfully or not) is [`Completion::Superseded`].
    pub fn complete(
        &mut self,
        sequence: u64,
        result: Result<PlannedRoute, ServiceError>,
    ) -> Completion {
        self.pending = self.pending.saturating_sub(1);

        if self.policy == ApplyPolicy::LastRequestWins && sequence <= self.latest_applied {
            return Completion::Superseded;
        }
        self.latest_applied = self.latest_applied.max(sequence);

        match result {
            Ok(route) => {
                self.failure = None;
                self.displayed = Some(route.clone());
                Completion::Applied(route)
            }
            Err(error) => {
                self.failure = Some(error.clone());
                Completion::Failed(error)
            }
        }
    }
}
