//! Request and response bodies for the TomTom Routing API.
//!
//! See: <https://developer.tomtom.com/routing-api/documentation>

use serde::{Deserialize, Serialize};
use stopwise_core::Coordinate;

/// A WGS84 position as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for LatLon {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatrixPoint {
    pub point: LatLon,
}

/// Body of a synchronous matrix request.
#[derive(Debug, Serialize)]
pub struct MatrixRequest {
    pub origins: Vec<MatrixPoint>,
    pub destinations: Vec<MatrixPoint>,
}

impl MatrixRequest {
    /// A one-row matrix from `origin` to every destination.
    pub fn one_to_many(origin: Coordinate, destinations: &[Coordinate]) -> Self {
        let point = |c: &Coordinate| MatrixPoint {
            point: LatLon::from(*c),
        };
        Self {
            origins: vec![point(&origin)],
            destinations: destinations.iter().map(point).collect(),
        }
    }
}

/// Distance and duration of a route or leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub length_in_meters: u64,
    pub travel_time_in_seconds: u64,
}

/// Matrix response; `matrix[i][j]` is origin `i` to destination `j`.
#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    #[serde(default)]
    pub matrix: Vec<Vec<MatrixCell>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    /// Per-cell HTTP-like status; anything but 200 means no route.
    pub status_code: u16,
    pub response: Option<CellResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResponse {
    pub route_summary: Option<Summary>,
}

impl MatrixCell {
    /// Summary of a successful cell.
    pub fn summary(&self) -> Option<Summary> {
        if self.status_code != 200 {
            return None;
        }
        self.response.as_ref().and_then(|r| r.route_summary)
    }
}

/// Calculate Route response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    pub summary: Summary,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub summary: Summary,
    #[serde(default)]
    pub points: Vec<LatLon>,
}

/// Error envelope. Routing uses `description`, matrix uses `message`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub description: Option<String>,
    pub message: Option<String>,
}

impl ErrorDetail {
    pub fn text(self) -> String {
        self.description.or(self.message).unwrap_or_default()
    }
}
