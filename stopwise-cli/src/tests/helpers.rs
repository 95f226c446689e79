//! Test helpers for writing plan requests and stubbing services.

use std::fs;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use stopwise_core::Coordinate;
use stopwise_core::test_support::{StubRoutingService, StubTravelTimeProvider};
use tempfile::TempDir;

use crate::CliError;
use crate::plan::{PlanConfig, PlanServices};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a request file.
pub(super) struct RequestDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl RequestDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn coordinate(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("valid coordinate")
}

pub(super) fn d1() -> Coordinate {
    coordinate(41.0430, 28.9850)
}

pub(super) fn d2() -> Coordinate {
    coordinate(41.0150, 28.9600)
}

pub(super) fn d3() -> Coordinate {
    coordinate(41.0270, 28.9740)
}

/// Request JSON clicking D1, D2 then D3 from central Istanbul.
pub(super) const THREE_STOPS: &str = r#"{
    "origin": {"latitude": 41.0082, "longitude": 28.9784},
    "stops": [
        {"latitude": 41.0430, "longitude": 28.9850},
        {"latitude": 41.0150, "longitude": 28.9600},
        {"latitude": 41.0270, "longitude": 28.9740}
    ]
}"#;

/// Services answering from in-memory stubs.
pub(super) struct StubServices {
    pub(super) travel_times: StubTravelTimeProvider,
    pub(super) routing: StubRoutingService,
}

impl StubServices {
    /// D1 600 s, D2 200 s, D3 400 s.
    pub(super) fn timed() -> Self {
        Self {
            travel_times: StubTravelTimeProvider::with_lookup(vec![
                (d1(), Duration::from_secs(600)),
                (d2(), Duration::from_secs(200)),
                (d3(), Duration::from_secs(400)),
            ]),
            routing: StubRoutingService::straight_line(),
        }
    }
}

impl PlanServices for StubServices {
    type TravelTimes = StubTravelTimeProvider;
    type Routing = StubRoutingService;

    fn build(
        &self,
        _config: &PlanConfig,
    ) -> Result<(StubTravelTimeProvider, StubRoutingService), CliError> {
        Ok((self.travel_times.clone(), self.routing.clone()))
    }
}
