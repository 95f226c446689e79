//! Behavioural tests for destination ranking.

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::time::Duration;
use stopwise_core::test_support::StubTravelTimeProvider;
use stopwise_core::{Coordinate, ErrorClass, ServiceError, rank};

use support::{block_on, d1, d2, d3, origin};

/// Result cell holding the outcome of a ranking request.
type ResultCell = RefCell<Result<Vec<Coordinate>, ServiceError>>;

#[fixture]
fn provider() -> RefCell<Option<StubTravelTimeProvider>> {
    RefCell::new(None)
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(Ok(Vec::new()))
}

fn rank_into(
    provider: &RefCell<Option<StubTravelTimeProvider>>,
    result: &ResultCell,
    destinations: &[Coordinate],
) {
    let guard = provider.borrow();
    let stub = guard.as_ref().expect("provider must be initialised");
    *result.borrow_mut() = block_on(rank(stub, origin(), destinations));
}

// --- Given steps ---

#[given("a distance service timing D1 at 600s, D2 at 200s and D3 at 400s")]
fn timed_service(#[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>) {
    *provider.borrow_mut() = Some(StubTravelTimeProvider::with_lookup(vec![
        (d1(), Duration::from_secs(600)),
        (d2(), Duration::from_secs(200)),
        (d3(), Duration::from_secs(400)),
    ]));
}

#[given("a distance service that is unavailable")]
fn unavailable_service(#[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>) {
    *provider.borrow_mut() = Some(StubTravelTimeProvider::with_error(
        ServiceError::NetworkError {
            url: "https://api.tomtom.com/routing/1/matrix/sync/json".to_owned(),
            message: "connection refused".to_owned(),
        },
    ));
}

#[given("a distance service returning a single travel time")]
fn short_service(#[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>) {
    *provider.borrow_mut() = Some(StubTravelTimeProvider::with_times(vec![
        Duration::from_secs(60),
    ]));
}

// --- When steps ---

#[when("I rank D1, D2 and D3 from the origin")]
fn rank_three(
    #[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>,
    #[from(result)] result: &ResultCell,
) {
    rank_into(provider, result, &[d1(), d2(), d3()]);
}

#[when("I rank no destinations")]
fn rank_none(
    #[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>,
    #[from(result)] result: &ResultCell,
) {
    rank_into(provider, result, &[]);
}

// --- Then steps ---

#[then("the ranked order is D2, D3, D1")]
fn then_ordered(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let ordered = borrowed.as_ref().expect("expected Ok result");
    assert_eq!(ordered, &vec![d2(), d3(), d1()]);
}

#[then("the ranked order is empty")]
fn then_empty(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let ordered = borrowed.as_ref().expect("expected Ok result");
    assert!(ordered.is_empty(), "expected no destinations, got {ordered:?}");
}

#[then("the distance service was not called")]
fn then_not_called(#[from(provider)] provider: &RefCell<Option<StubTravelTimeProvider>>) {
    let guard = provider.borrow();
    let stub = guard.as_ref().expect("provider must be initialised");
    assert_eq!(stub.calls(), 0, "empty input must not reach the service");
}

#[then("a service unavailable error is returned")]
fn then_unavailable(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    match &*borrowed {
        Err(err) => assert_eq!(err.class(), ErrorClass::ServiceUnavailable),
        Ok(ordered) => panic!("expected an error, got {ordered:?}"),
    }
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/sequencer.feature", name = $title)]
        fn $fn_name(provider: RefCell<Option<StubTravelTimeProvider>>, result: ResultCell) {
            let _ = (provider, result);
        }
    };
}

register_scenario!(
    ordering_by_driving_time,
    "ordering clicked destinations by driving time"
);
register_scenario!(ranking_no_destinations, "ranking no destinations");
register_scenario!(failing_distance_service, "failing distance service");
register_scenario!(
    too_few_travel_times,
    "distance service returning too few times"
);
