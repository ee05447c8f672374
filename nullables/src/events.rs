//! Nullable notification listener: records events instead of reacting.

use std::sync::{Arc, Mutex};

/// Collects every event delivered to its listener.
///
/// Clones share the same buffer, so a test keeps one handle and subscribes
/// the listener returned by [`EventRecorder::listener`].
pub struct EventRecorder<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone + Send + 'static> EventRecorder<E> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A listener that appends each event to this recorder.
    pub fn listener(&self) -> Box<dyn Fn(&E) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &E| events.lock().unwrap().push(event.clone()))
    }

    /// All events recorded so far (for assertions).
    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<E> {
        self.events.lock().unwrap().last().cloned()
    }

    /// Clear all recorded events.
    pub fn reset(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E: Clone + Send + 'static> Default for EventRecorder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let recorder = EventRecorder::<u32>::new();
        let listener = recorder.listener();
        listener(&1);
        listener(&2);
        assert_eq!(recorder.events(), vec![1, 2]);
        assert_eq!(recorder.last(), Some(2));
        recorder.reset();
        assert!(recorder.is_empty());
    }

    #[test]
    fn clones_share_the_buffer() {
        let recorder = EventRecorder::<&'static str>::new();
        let other = recorder.clone();
        (other.listener())(&"deposited");
        assert_eq!(recorder.len(), 1);
    }
}
