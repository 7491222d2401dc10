//! Events.

use crossbeam::channel::{self, Receiver, Sender};
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

/// Fired when the range of materialized body rows changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowVisibilityChangeEvent {
    /// The first visible logical row, or 0 if there are none.
    pub first_visible_row: usize,

    /// The number of visible rows.
    pub visible_row_count: usize,
}

impl RowVisibilityChangeEvent {
    pub fn new(first_visible_row: usize, visible_row_count: usize) -> Self {
        RowVisibilityChangeEvent {
            first_visible_row,
            visible_row_count,
        }
    }

    /// The visible rows as a range.
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        self.first_visible_row..self.first_visible_row + self.visible_row_count
    }
}

/// A row visibility change handler.
pub struct EventHandler(Arc<Mutex<dyn FnMut(RowVisibilityChangeEvent) + Send>>);

impl Clone for EventHandler {
    fn clone(&self) -> Self {
        EventHandler(Arc::clone(&self.0))
    }
}

impl EventHandler {
    pub fn new<F: 'static + FnMut(RowVisibilityChangeEvent) + Send>(handler: F) -> Self {
        EventHandler(Arc::new(Mutex::new(handler)))
    }

    fn call(&self, event: RowVisibilityChangeEvent) {
        let mut handler = self.0.lock();
        (&mut *handler)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler<RowVisibilityChangeEvent>")
    }
}

/// Returned when a handler is added; used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerRegistration(Uuid);

impl HandlerRegistration {
    fn new() -> HandlerRegistration {
        HandlerRegistration(Uuid::new_v4())
    }
}

/// Delivers visibility changes to handlers and channel subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    handlers: Vec<(HandlerRegistration, EventHandler)>,
    subscribers: Vec<Sender<RowVisibilityChangeEvent>>,
    last: Option<RowVisibilityChangeEvent>,
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus::default()
    }

    pub fn add_handler(&mut self, handler: EventHandler) -> HandlerRegistration {
        let registration = HandlerRegistration::new();
        self.handlers.push((registration, handler));
        registration
    }

    /// Removes a handler. Returns false if it was not registered.
    pub fn remove_handler(&mut self, registration: HandlerRegistration) -> bool {
        let len = self.handlers.len();
        self.handlers.retain(|(r, _)| *r != registration);
        self.handlers.len() != len
    }

    /// Returns a channel that receives every event fired from now on.
    pub fn subscribe(&mut self) -> Receiver<RowVisibilityChangeEvent> {
        let (sender, receiver) = channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// The most recently fired event.
    pub fn last(&self) -> Option<RowVisibilityChangeEvent> {
        self.last
    }

    /// Fires the event unless it equals the previous one.
    pub fn fire_if_changed(&mut self, event: RowVisibilityChangeEvent) -> bool {
        if self.last == Some(event) {
            return false;
        }
        self.last = Some(event);
        trace!(
            target: "escalator::events",
            first = event.first_visible_row,
            count = event.visible_row_count,
            "row visibility changed"
        );

        for (_, handler) in &self.handlers {
            handler.call(event);
        }
        // receivers that have been dropped unsubscribe themselves
        self.subscribers.retain(|s| s.send(event).is_ok());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::TryRecvError;

    #[test]
    fn test_fire_if_changed() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let registration = bus.add_handler(EventHandler::new(move |e| seen2.lock().push(e)));
        let recv = bus.subscribe();

        assert!(bus.fire_if_changed(RowVisibilityChangeEvent::new(0, 5)));
        assert!(!bus.fire_if_changed(RowVisibilityChangeEvent::new(0, 5)));
        assert!(bus.fire_if_changed(RowVisibilityChangeEvent::new(1, 5)));
        assert_eq!(
            *seen.lock(),
            vec![RowVisibilityChangeEvent::new(0, 5), RowVisibilityChangeEvent::new(1, 5)]
        );
        assert_eq!(recv.try_recv(), Ok(RowVisibilityChangeEvent::new(0, 5)));
        assert_eq!(recv.try_recv(), Ok(RowVisibilityChangeEvent::new(1, 5)));
        assert_eq!(recv.try_recv(), Err(TryRecvError::Empty));

        assert!(bus.remove_handler(registration));
        assert!(!bus.remove_handler(registration));
        bus.fire_if_changed(RowVisibilityChangeEvent::new(0, 0));
        assert_eq!(seen.lock().len(), 2);

        drop(recv);
        bus.fire_if_changed(RowVisibilityChangeEvent::new(3, 1));
        assert!(bus.subscribers.is_empty());
    }
}
