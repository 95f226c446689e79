//! Map rendering collaborator.
//!
//! The map itself (tiles, marker and popup drawing, layer styling) belongs to
//! the external mapping SDK. [`MapSurface`] is the narrow interface the
//! planner drives; [`MapEvents`] carries user input back.

mod events;
mod recording;

pub use events::{MapEvents, Subscription};
pub use recording::{RecordingMap, SurfaceCommand};

use crate::{Coordinate, ErrorClass, RouteGeometry};

/// Identifier of the layer holding the drawn route.
pub const ROUTE_LAYER_ID: &str = "route";

/// Popup text attached to the origin marker.
pub const ORIGIN_POPUP: &str = "Your Location";

/// Style identifiers requested from the mapping service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStyle {
    /// Base map style.
    pub map: String,
    /// Traffic incidents overlay style.
    pub traffic_incidents: String,
    /// Traffic flow overlay style.
    pub traffic_flow: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            map: "basic_main-lite".to_owned(),
            traffic_incidents: "incidents_day".to_owned(),
            traffic_flow: "flow_absolute".to_owned(),
        }
    }
}

/// Parameters for opening the map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Initial map centre, also the initial origin.
    pub center: Coordinate,
    /// Initial zoom level.
    pub zoom: u8,
    /// Style identifiers.
    pub style: MapStyle,
}

impl MapOptions {
    /// Options centred on `center` with the default zoom and style.
    #[must_use]
    pub fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            zoom: 12,
            style: MapStyle::default(),
        }
    }
}

/// What a marker represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// The draggable origin marker with its popup text.
    Origin {
        /// Popup text, shown open.
        popup: String,
    },
    /// A delivery stop labelled with its one-based click count.
    Delivery {
        /// Marker label.
        label: usize,
    },
}

/// A marker to place on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker position.
    pub position: Coordinate,
    /// Marker role and decoration.
    pub kind: MarkerKind,
}

impl Marker {
    /// Whether the user may drag the marker.
    #[must_use]
    pub const fn is_draggable(&self) -> bool {
        matches!(self.kind, MarkerKind::Origin { .. })
    }
}

/// Line styling for the route layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePaint {
    /// CSS colour.
    pub color: String,
    /// Line width in pixels.
    pub width: u8,
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            color: "#4a90e2".to_owned(),
            width: 6,
        }
    }
}

/// A line layer sourced from route geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    /// Layer identifier.
    pub id: String,
    /// Geometry to draw.
    pub geometry: RouteGeometry,
    /// Line styling.
    pub paint: LinePaint,
}

impl RouteLayer {
    /// The standard route layer for `geometry`.
    #[must_use]
    pub fn route(geometry: RouteGeometry) -> Self {
        Self {
            id: ROUTE_LAYER_ID.to_owned(),
            geometry,
            paint: LinePaint::default(),
        }
    }
}

/// A visible failure banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Failure class, for styling.
    pub class: ErrorClass,
    /// Human-readable message.
    pub message: String,
}

/// Operations the planner needs from the map rendering service.
///
/// All calls happen on the UI event loop.
pub trait MapSurface {
    /// Create the map view.
    fn open(&self, options: &MapOptions);
    /// Place a marker.
    fn add_marker(&self, marker: Marker);
    /// Whether a layer with `id` is present.
    fn has_layer(&self, id: &str) -> bool;
    /// Add a line layer.
    fn add_layer(&self, layer: RouteLayer);
    /// Remove the layer with `id` and its source.
    fn remove_layer(&self, id: &str);
    /// Show a failure banner, replacing any current one.
    fn show_notice(&self, notice: Notice);
    /// Hide the failure banner.
    fn clear_notice(&self);
    /// Tear down the map view.
    fn remove(&self);
    /// User input emitted by this surface.
    fn events(&self) -> &MapEvents;
}
