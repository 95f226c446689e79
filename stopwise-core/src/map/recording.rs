//! In-memory [`MapSurface`] that records every call.
//!
//! Used by the headless replay tool and by tests to observe what the planner
//! would have drawn.

use std::cell::RefCell;

use super::{MapEvents, MapOptions, MapSurface, Marker, Notice, RouteLayer};

/// A call made against a [`RecordingMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    /// [`MapSurface::open`].
    Open(MapOptions),
    /// [`MapSurface::add_marker`].
    AddMarker(Marker),
    /// [`MapSurface::add_layer`].
    AddLayer(RouteLayer),
    /// [`MapSurface::remove_layer`].
    RemoveLayer(String),
    /// [`MapSurface::show_notice`].
    ShowNotice(Notice),
    /// [`MapSurface::clear_notice`].
    ClearNotice,
    /// [`MapSurface::remove`].
    Remove,
}

#[derive(Debug, Default)]
struct SurfaceState {
    commands: Vec<SurfaceCommand>,
    markers: Vec<Marker>,
    layers: Vec<RouteLayer>,
    notice: Option<Notice>,
    removed: bool,
}

/// Headless map surface keeping the current scene and a command log.
#[derive(Debug, Default)]
pub struct RecordingMap {
    state: RefCell<SurfaceState>,
    events: MapEvents,
}

impl RecordingMap {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.state.borrow().commands.clone()
    }

    /// Markers currently placed.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        self.state.borrow().markers.clone()
    }

    /// The layer with `id`, if present.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<RouteLayer> {
        self.state
            .borrow()
            .layers
            .iter()
            .find(|layer| layer.id == id)
            .cloned()
    }

    /// The banner currently shown.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.state.borrow().notice.clone()
    }

    /// Whether [`MapSurface::remove`] has been called.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.state.borrow().removed
    }

    fn record(&self, command: SurfaceCommand) {
        self.state.borrow_mut().commands.push(command);
    }
}

impl MapSurface for RecordingMap {
    fn open(&self, options: &MapOptions) {
        self.record(SurfaceCommand::Open(options.clone()));
    }

    fn add_marker(&self, marker: Marker) {
        self.record(SurfaceCommand::AddMarker(marker.clone()));
        self.state.borrow_mut().markers.push(marker);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.borrow().layers.iter().any(|layer| layer.id == id)
    }

    fn add_layer(&self, layer: RouteLayer) {
        self.record(SurfaceCommand::AddLayer(layer.clone()));
        self.state.borrow_mut().layers.push(layer);
    }

    fn remove_layer(&self, id: &str) {
        self.record(SurfaceCommand::RemoveLayer(id.to_owned()));
        self.state.borrow_mut().layers.retain(|layer| layer.id != id);
    }

    fn show_notice(&self, notice: Notice) {
        self.record(SurfaceCommand::ShowNotice(notice.clone()));
        self.state.borrow_mut().notice = Some(notice);
    }

    fn clear_notice(&self) {
        self.record(SurfaceCommand::ClearNotice);
        self.state.borrow_mut().notice = None;
    }

    fn remove(&self) {
        self.record(SurfaceCommand::Remove);
        let mut state = self.state.borrow_mut();
        state.removed = true;
        state.markers.clear();
        state.layers.clear();
        state.notice = None;
    }

    fn events(&self) -> &MapEvents {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MarkerKind, ROUTE_LAYER_ID};
    use crate::{Coordinate, RouteGeometry};

    fn spot() -> Coordinate {
        Coordinate::new(41.0, 29.0).expect("valid coordinate")
    }

    #[test]
    fn tracks_layers_by_id() {
        let map = RecordingMap::new();
        map.add_layer(RouteLayer::route(RouteGeometry::straight_line(&[spot(), spot()])));
        assert!(map.has_layer(ROUTE_LAYER_ID));

        map.remove_layer(ROUTE_LAYER_ID);

        assert!(!map.has_layer(ROUTE_LAYER_ID));
        assert_eq!(map.commands().len(), 2);
    }

    #[test]
    fn remove_clears_the_scene() {
        let map = RecordingMap::new();
        map.add_marker(Marker {
            position: spot(),
            kind: MarkerKind::Delivery { label: 1 },
        });

        map.remove();

        assert!(map.is_removed());
        assert!(map.markers().is_empty());
        assert_eq!(map.commands().last(), Some(&SurfaceCommand::Remove));
    }
}
