//! Deterministic test doubles for the distance and routing services.
//!
//! Both stubs are cheap handles over shared state: clone one before handing
//! it to a planner and keep the clone to inspect requests or change the
//! response.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    Coordinate, RouteGeometry, RoutingService, ServiceError, TravelTimeProvider, TravelTimes,
    UNREACHABLE,
};

#[derive(Debug, Clone)]
enum StubResponse {
    /// Return this vector verbatim, whatever the destinations.
    Times(TravelTimes),
    /// Look each destination up; unknown ones are unreachable.
    Lookup(Vec<(Coordinate, Duration)>),
    Error(ServiceError),
}

#[derive(Debug)]
struct TravelTimeState {
    response: StubResponse,
    next_failure: Option<ServiceError>,
    requests: Vec<(Coordinate, Vec<Coordinate>)>,
}

/// Stub [`TravelTimeProvider`] returning pre-configured responses.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stopwise_core::{Coordinate, TravelTimeProvider};
/// use stopwise_core::test_support::StubTravelTimeProvider;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let stop = Coordinate::new(41.02, 28.99)?;
/// let provider = StubTravelTimeProvider::with_lookup(vec![(stop, Duration::from_secs(90))]);
///
/// let origin = Coordinate::new(41.0, 29.0)?;
/// let times = provider.get_travel_times(origin, &[stop]).await?;
/// assert_eq!(times, vec![Duration::from_secs(90)]);
/// assert_eq!(provider.requests(), vec![(origin, vec![stop])]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct StubTravelTimeProvider {
    state: Rc<RefCell<TravelTimeState>>,
}

impl StubTravelTimeProvider {
    fn from_response(response: StubResponse) -> Self {
        Self {
            state: Rc::new(RefCell::new(TravelTimeState {
                response,
                next_failure: None,
                requests: Vec::new(),
            })),
        }
    }

    /// Return `times` for any non-empty input, even if the lengths differ.
    #[must_use]
    pub fn with_times(times: TravelTimes) -> Self {
        Self::from_response(StubResponse::Times(times))
    }

    /// Answer per destination from `table`; unknown destinations are
    /// [`UNREACHABLE`].
    #[must_use]
    pub fn with_lookup(table: Vec<(Coordinate, Duration)>) -> Self {
        Self::from_response(StubResponse::Lookup(table))
    }

    /// Fail every non-empty request with `error`.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Fail only the next request with `error`.
    pub fn fail_next(&self, error: ServiceError) {
        self.state.borrow_mut().next_failure = Some(error);
    }

    /// Number of requests received with a non-empty destination list.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.state.borrow().requests.len()
    }

    /// Every non-empty request received, as `(origin, destinations)`.
    #[must_use]
    pub fn requests(&self) -> Vec<(Coordinate, Vec<Coordinate>)> {
        self.state.borrow().requests.clone()
    }
}

fn lookup(table: &[(Coordinate, Duration)], destination: &Coordinate) -> Duration {
    table
        .iter()
        .find(|(location, _)| location == destination)
        .map_or(UNREACHABLE, |(_, time)| *time)
}

#[async_trait(?Send)]
impl TravelTimeProvider for StubTravelTimeProvider {
    async fn get_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<TravelTimes, ServiceError> {
        if destinations.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        let mut state = self.state.borrow_mut();
        state.requests.push((origin, destinations.to_vec()));
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        match &state.response {
            StubResponse::Times(times) => Ok(times.clone()),
            StubResponse::Lookup(table) => Ok(destinations
                .iter()
                .map(|destination| lookup(table, destination))
                .collect()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

#[derive(Debug)]
struct RoutingState {
    failure: Option<ServiceError>,
    next_failure: Option<ServiceError>,
    requests: Vec<Vec<Coordinate>>,
}

/// Stub [`RoutingService`] drawing straight segments between stops.
#[derive(Debug, Clone)]
pub struct StubRoutingService {
    state: Rc<RefCell<RoutingState>>,
}

impl StubRoutingService {
    /// Succeed with [`RouteGeometry::straight_line`].
    #[must_use]
    pub fn straight_line() -> Self {
        Self {
            state: Rc::new(RefCell::new(RoutingState {
                failure: None,
                next_failure: None,
                requests: Vec::new(),
            })),
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        let stub = Self::straight_line();
        stub.state.borrow_mut().failure = Some(error);
        stub
    }

    /// Fail only the next request with `error`.
    pub fn fail_next(&self, error: ServiceError) {
        self.state.borrow_mut().next_failure = Some(error);
    }

    /// Stop sequences received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.state.borrow().requests.clone()
    }
}

#[async_trait(?Send)]
impl RoutingService for StubRoutingService {
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        if stops.len() < 2 {
            return Err(ServiceError::TooFewStops {
                actual: stops.len(),
            });
        }
        let mut state = self.state.borrow_mut();
        state.requests.push(stops.to_vec());
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(RouteGeometry::straight_line(stops)),
        }
    }
}
