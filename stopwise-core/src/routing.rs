//! Drivable route geometry and the routing collaborator.
//!
//! A [`RouteGeometry`] is an ordered list of legs, one per pair of consecutive
//! stops, each carrying its own path and summary.

use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString, MultiLineString};

use crate::{Coordinate, ServiceError};

/// Length and travel time of a route or one of its legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteSummary {
    /// Driving distance in metres.
    pub length_meters: u64,
    /// Estimated driving time.
    pub travel_time: Duration,
}

/// Path between two consecutive stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Points along the leg, `x = longitude`, `y = latitude`.
    pub path: LineString<f64>,
    /// Leg distance and duration.
    pub summary: RouteSummary,
}

/// An ordered path through a sequence of stops.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::{Coord, LineString};
/// use stopwise_core::{RouteGeometry, RouteLeg, RouteSummary};
///
/// let summary = RouteSummary { length_meters: 1200, travel_time: Duration::from_secs(90) };
/// let leg = RouteLeg {
///     path: LineString::from(vec![Coord { x: 28.97, y: 41.00 }, Coord { x: 28.99, y: 41.01 }]),
///     summary,
/// };
/// let route = RouteGeometry::new(vec![leg], summary);
/// assert_eq!(route.legs.len(), 1);
/// assert_eq!(route.to_multi_line_string().0.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Legs in travel order.
    pub legs: Vec<RouteLeg>,
    /// Totals for the whole route.
    pub summary: RouteSummary,
}

impl RouteGeometry {
    /// Construct a route from legs and an overall summary.
    #[must_use]
    pub const fn new(legs: Vec<RouteLeg>, summary: RouteSummary) -> Self {
        Self { legs, summary }
    }

    /// Build a geometry of straight segments joining `stops` in order.
    ///
    /// Summaries are zero; this is useful for previews and test doubles.
    #[must_use]
    pub fn straight_line(stops: &[Coordinate]) -> Self {
        let legs = stops
            .windows(2)
            .map(|pair| RouteLeg {
                path: pair.iter().map(|stop| Coord::from(*stop)).collect(),
                summary: RouteSummary::default(),
            })
            .collect();
        Self::new(legs, RouteSummary::default())
    }

    /// Collect the legs into a single multi-line geometry.
    #[must_use]
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.legs.iter().map(|leg| leg.path.clone()).collect())
    }

    /// Render the route as a GeoJSON `FeatureCollection`.
    ///
    /// The collection holds one `MultiLineString` feature whose properties
    /// carry the overall summary and one segment summary per leg, the shape
    /// map layers accept as a line source.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        use serde_json::json;

        let coordinates: Vec<Vec<[f64; 2]>> = self
            .legs
            .iter()
            .map(|leg| leg.path.coords().map(|c| [c.x, c.y]).collect())
            .collect();
        let segments: Vec<serde_json::Value> = self
            .legs
            .iter()
            .map(|leg| summary_json(&leg.summary))
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "summary": summary_json(&self.summary),
                    "segmentSummary": segments,
                },
            }],
        })
    }
}

#[cfg(feature = "serde")]
fn summary_json(summary: &RouteSummary) -> serde_json::Value {
    serde_json::json!({
        "lengthInMeters": summary.length_meters,
        "travelTimeInSeconds": summary.travel_time.as_secs(),
    })
}

/// Compute drivable geometry through an ordered list of stops.
///
/// The first stop is the origin. Implementations must return
/// `Err(ServiceError::TooFewStops { .. })` for fewer than two stops.
#[async_trait(?Send)]
pub trait RoutingService {
    /// Return the route visiting `stops` in the given order.
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError>;
}

#[async_trait(?Send)]
impl<T> RoutingService for &T
where
    T: RoutingService + ?Sized,
{
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        (**self).calculate_route(stops).await
    }
}
