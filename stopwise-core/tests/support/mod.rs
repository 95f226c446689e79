//! Shared coordinates and runtime helpers for behaviour tests.

use std::future::Future;

use stopwise_core::Coordinate;

fn coordinate(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("fixture coordinates are valid")
}

/// Default origin: central Istanbul.
pub fn origin() -> Coordinate {
    coordinate(41.0082, 28.9784)
}

/// Alternative origin the user drags the marker to.
pub fn depot() -> Coordinate {
    coordinate(40.9923, 29.0244)
}

pub fn d1() -> Coordinate {
    coordinate(41.0430, 28.9850)
}

pub fn d2() -> Coordinate {
    coordinate(41.0150, 28.9600)
}

pub fn d3() -> Coordinate {
    coordinate(41.0270, 28.9740)
}

/// Drive `future` to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build")
        .block_on(future)
}
