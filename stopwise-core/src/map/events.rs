//! Click and drag-end subscriptions.
//!
//! Handlers live in a shared registry so a [`Subscription`] can remove its
//! handler later. Emission snapshots the handler list first, which lets a
//! handler subscribe or unsubscribe while an event is being delivered.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::Coordinate;

type Handler = Rc<RefCell<dyn FnMut(Coordinate)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

#[derive(Clone, Default)]
struct HandlerSet(Rc<RefCell<Registry>>);

impl HandlerSet {
    fn subscribe(&self, handler: impl FnMut(Coordinate) + 'static) -> Subscription {
        let mut registry = self.0.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .handlers
            .push((id, Rc::new(RefCell::new(handler)) as Handler));
        Subscription {
            id,
            registry: Rc::downgrade(&self.0),
        }
    }

    fn emit(&self, position: Coordinate) {
        let snapshot: Vec<Handler> = self
            .0
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            // A handler re-entering itself through a nested emit is skipped.
            if let Ok(mut callback) = handler.try_borrow_mut() {
                (*callback)(position);
            }
        }
    }

    fn len(&self) -> usize {
        self.0.borrow().handlers.len()
    }
}

/// Registry of map input handlers.
///
/// # Examples
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stopwise_core::{Coordinate, map::MapEvents};
///
/// let events = MapEvents::default();
/// let clicks = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&clicks);
/// let subscription = events.on_click(move |_| counter.set(counter.get() + 1));
///
/// let spot = Coordinate::new(41.0, 29.0)?;
/// events.emit_click(spot);
/// subscription.unsubscribe();
/// events.emit_click(spot);
/// assert_eq!(clicks.get(), 1);
/// # Ok::<(), stopwise_core::CoordinateError>(())
/// ```
#[derive(Clone, Default)]
pub struct MapEvents {
    click: HandlerSet,
    drag_end: HandlerSet,
}

impl fmt::Debug for MapEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapEvents")
            .field("click_handlers", &self.click.len())
            .field("drag_end_handlers", &self.drag_end.len())
            .finish()
    }
}

impl MapEvents {
    /// Call `handler` with the position of every map click.
    pub fn on_click(&self, handler: impl FnMut(Coordinate) + 'static) -> Subscription {
        self.click.subscribe(handler)
    }

    /// Call `handler` with the final position whenever the origin marker is
    /// dropped after a drag.
    pub fn on_drag_end(&self, handler: impl FnMut(Coordinate) + 'static) -> Subscription {
        self.drag_end.subscribe(handler)
    }

    /// Deliver a click to every subscribed handler.
    pub fn emit_click(&self, position: Coordinate) {
        self.click.emit(position);
    }

    /// Deliver an origin drag-end to every subscribed handler.
    pub fn emit_drag_end(&self, position: Coordinate) {
        self.drag_end.emit(position);
    }

    /// Number of live click handlers.
    #[must_use]
    pub fn click_handlers(&self) -> usize {
        self.click.len()
    }

    /// Number of live drag-end handlers.
    #[must_use]
    pub fn drag_end_handlers(&self) -> usize {
        self.drag_end.len()
    }
}

/// Handle that removes its handler when unsubscribed.
///
/// Dropping the handle without calling [`Subscription::unsubscribe`] leaves
/// the handler registered.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Remove the handler. Does nothing if the registry is gone.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .handlers
                .retain(|(id, _)| *id != self.id);
        }
    }
}
