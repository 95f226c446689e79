//! View controller wiring map input to route recomputation.
//!
//! [`RoutePlanner::mount`] opens the map, places the draggable origin marker
//! and subscribes to clicks and origin drags. Each click appends a destination,
//! drops its marker and spawns a full recompute on the current [`LocalSet`]:
//! rank the destinations from the origin, fetch route geometry for
//! `[origin, ranked...]` and redraw the `route` layer.
//!
//! Recomputes are never cancelled by newer clicks. The session's
//! [`ApplyPolicy`] decides which completion stays on the map. Failures leave
//! the previous route in place and raise a notice on the map surface.
//!
//! [`LocalSet`]: tokio::task::LocalSet

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use tokio::task::JoinHandle;

use crate::map::{
    MapOptions, MapSurface, Marker, MarkerKind, Notice, ORIGIN_POPUP, ROUTE_LAYER_ID, RouteLayer,
    Subscription,
};
use crate::{
    ApplyPolicy, Completion, Coordinate, DeliverySession, PlannedRoute, RecomputeTicket,
    RoutingService, ServiceError, TravelTimeProvider, rank_with_times,
};

/// Settings for a mounted planner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Completion policy for overlapping recomputes.
    pub policy: ApplyPolicy,
    /// Map view parameters; the centre is the initial origin.
    pub map: MapOptions,
}

impl PlannerConfig {
    /// Default settings centred on `origin`.
    #[must_use]
    pub fn centered_on(origin: Coordinate) -> Self {
        Self {
            policy: ApplyPolicy::default(),
            map: MapOptions::centered_on(origin),
        }
    }

    /// Use `policy` for overlapping recomputes.
    #[must_use]
    pub const fn with_policy(mut self, policy: ApplyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// What happened to one recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// The route was drawn.
    Applied {
        /// Ticket sequence number.
        sequence: u64,
    },
    /// A newer result was already on the map.
    Superseded {
        /// Ticket sequence number.
        sequence: u64,
    },
    /// A service call failed; a notice was shown.
    Failed {
        /// Ticket sequence number.
        sequence: u64,
        /// The failure.
        error: ServiceError,
    },
    /// The planner was unmounted before the result arrived.
    Discarded {
        /// Ticket sequence number.
        sequence: u64,
    },
    /// There were no destinations to route.
    Skipped,
}

struct Shared<D, R, M> {
    session: RefCell<DeliverySession>,
    travel_times: D,
    routing: R,
    map: M,
    mounted: Cell<bool>,
    notice_shown: Cell<bool>,
    tasks: RefCell<Vec<JoinHandle<RecomputeOutcome>>>,
}

impl<D, R, M> Shared<D, R, M>
where
    D: TravelTimeProvider + 'static,
    R: RoutingService + 'static,
    M: MapSurface + 'static,
{
    fn add_destination(
        this: &Rc<Self>,
        position: Coordinate,
    ) -> impl Future<Output = RecomputeOutcome> + 'static {
        let (destination, ticket) = this.session.borrow_mut().add_destination(position);
        log::debug!(
            "destination {} added at ({}, {})",
            destination.label(),
            position.latitude(),
            position.longitude()
        );
        this.map.add_marker(Marker {
            position,
            kind: MarkerKind::Delivery {
                label: destination.label(),
            },
        });
        Self::run(Rc::clone(this), ticket)
    }

    fn spawn_click(this: &Rc<Self>, position: Coordinate) {
        let recompute = Self::add_destination(this, position);
        let handle = tokio::task::spawn_local(recompute);
        this.tasks.borrow_mut().push(handle);
    }

    fn move_origin(&self, position: Coordinate) {
        log::debug!(
            "origin moved to ({}, {})",
            position.latitude(),
            position.longitude()
        );
        self.session.borrow_mut().move_origin(position);
    }

    async fn run(this: Rc<Self>, ticket: RecomputeTicket) -> RecomputeOutcome {
        let sequence = ticket.sequence;
        let result = this.plan(&ticket).await;
        if !this.mounted.get() {
            log::debug!("recompute {sequence} finished after unmount; discarding");
            return RecomputeOutcome::Discarded { sequence };
        }

        let completion = this.session.borrow_mut().complete(sequence, result);
        match completion {
            Completion::Applied(route) => {
                this.draw(route);
                log::debug!("recompute {sequence} applied");
                RecomputeOutcome::Applied { sequence }
            }
            Completion::Superseded => {
                log::debug!("recompute {sequence} superseded by a newer result");
                RecomputeOutcome::Superseded { sequence }
            }
            Completion::Failed(error) => {
                log::warn!("recompute {sequence} failed: {error}");
                this.map.show_notice(Notice {
                    class: error.class(),
                    message: format!("Could not update the route: {error}"),
                });
                this.notice_shown.set(true);
                RecomputeOutcome::Failed { sequence, error }
            }
        }
    }

    async fn plan(&self, ticket: &RecomputeTicket) -> Result<PlannedRoute, ServiceError> {
        let ranked = rank_with_times(&self.travel_times, ticket.origin, &ticket.destinations).await?;
        let stops: Vec<Coordinate> = std::iter::once(ticket.origin)
            .chain(ranked.iter().map(|entry| entry.location))
            .collect();
        let geometry = self.routing.calculate_route(&stops).await?;
        Ok(PlannedRoute {
            stops,
            ranked,
            geometry,
        })
    }

    fn draw(&self, route: PlannedRoute) {
        if self.map.has_layer(ROUTE_LAYER_ID) {
            self.map.remove_layer(ROUTE_LAYER_ID);
        }
        self.map.add_layer(RouteLayer::route(route.geometry));
        if self.notice_shown.replace(false) {
            self.map.clear_notice();
        }
    }
}

/// Controller for one mounted map view.
///
/// The planner is single-threaded: construct and drive it inside a Tokio
/// [`LocalSet`](tokio::task::LocalSet).
pub struct RoutePlanner<D, R, M> {
    shared: Rc<Shared<D, R, M>>,
    subscriptions: Vec<Subscription>,
}

impl<D, R, M> RoutePlanner<D, R, M>
where
    D: TravelTimeProvider + 'static,
    R: RoutingService + 'static,
    M: MapSurface + 'static,
{
    /// Open the map, place the origin marker and start listening for input.
    ///
    /// Click handlers spawn recomputes with [`tokio::task::spawn_local`], so
    /// map events must be emitted from within a `LocalSet`.
    pub fn mount(config: PlannerConfig, travel_times: D, routing: R, map: M) -> Self {
        let origin = config.map.center;
        map.open(&config.map);
        map.add_marker(Marker {
            position: origin,
            kind: MarkerKind::Origin {
                popup: ORIGIN_POPUP.to_owned(),
            },
        });

        let shared = Rc::new(Shared {
            session: RefCell::new(DeliverySession::new(origin, config.policy)),
            travel_times,
            routing,
            map,
            mounted: Cell::new(true),
            notice_shown: Cell::new(false),
            tasks: RefCell::new(Vec::new()),
        });

        let on_click: Weak<Shared<D, R, M>> = Rc::downgrade(&shared);
        let on_drag: Weak<Shared<D, R, M>> = Rc::downgrade(&shared);
        let events = shared.map.events();
        let subscriptions = vec![
            events.on_click(move |position| {
                if let Some(shared) = on_click.upgrade() {
                    Shared::spawn_click(&shared, position);
                }
            }),
            events.on_drag_end(move |position| {
                if let Some(shared) = on_drag.upgrade() {
                    shared.move_origin(position);
                }
            }),
        ];

        log::info!(
            "map mounted at ({}, {}) with {:?}",
            origin.latitude(),
            origin.longitude(),
            config.policy
        );
        Self {
            shared,
            subscriptions,
        }
    }

    /// Append a destination as a click would, returning its recompute.
    ///
    /// The destination and its marker are added immediately; the returned
    /// future performs the service calls and redraw when awaited.
    pub fn add_destination(
        &self,
        position: Coordinate,
    ) -> impl Future<Output = RecomputeOutcome> + 'static {
        Shared::add_destination(&self.shared, position)
    }

    /// Relocate the origin as a marker drag would.
    pub fn move_origin(&self, position: Coordinate) {
        self.shared.move_origin(position);
    }

    /// Re-rank and redraw the current destinations without adding one.
    ///
    /// Resolves to [`RecomputeOutcome::Skipped`] when there are no
    /// destinations.
    pub fn recompute(&self) -> impl Future<Output = RecomputeOutcome> + 'static {
        let ticket = {
            let mut session = self.shared.session.borrow_mut();
            (!session.destinations().is_empty()).then(|| session.begin_recompute())
        };
        let shared = Rc::clone(&self.shared);
        async move {
            match ticket {
                Some(ticket) => Shared::run(shared, ticket).await,
                None => RecomputeOutcome::Skipped,
            }
        }
    }

    /// Wait for every recompute spawned by map clicks since the last settle.
    ///
    /// Returns the outcomes in spawn order, including recomputes that already
    /// finished. Recomputes spawned while waiting are awaited too.
    pub async fn settle(&self) -> Vec<RecomputeOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let pending = std::mem::take(&mut *self.shared.tasks.borrow_mut());
            if pending.is_empty() {
                return outcomes;
            }
            for handle in pending {
                match handle.await {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(err) => log::warn!("recompute task ended abnormally: {err}"),
                }
            }
        }
    }

    /// Inspect the session state.
    pub fn with_session<T>(&self, inspect: impl FnOnce(&DeliverySession) -> T) -> T {
        inspect(&self.shared.session.borrow())
    }

    /// The map surface this planner draws on.
    #[must_use]
    pub fn map(&self) -> &M {
        &self.shared.map
    }

    /// Tear the view down.
    ///
    /// Unsubscribes input handlers, aborts outstanding recomputes and removes
    /// the map. Results that race with teardown are discarded.
    pub fn unmount(self) {
        self.shared.mounted.set(false);
        for subscription in self.subscriptions {
            subscription.unsubscribe();
        }
        let tasks = std::mem::take(&mut *self.shared.tasks.borrow_mut());
        let aborted = tasks.iter().filter(|task| !task.is_finished()).count();
        for task in tasks {
            task.abort();
        }
        self.shared.map.remove();
        log::info!("map unmounted; {aborted} recompute(s) abandoned");
    }
}
