use crate::types::{Event, EventVec};
use serde::Serialize;

/// Ordered, append-only buffer of events awaiting delivery.
///
/// Insertion order is report order. Outside the crate the queue can only be
/// appended to and inspected; draining is reserved for the flush path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorQueue {
    events: EventVec,
}

impl ErrorQueue {
    /// Creates a new empty queue.
    #[inline]
    pub fn new() -> Self {
        Self {
            events: EventVec::new(),
        }
    }

    /// Appends an event behind everything already queued.
    #[inline]
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Returns `true` when nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns an iterator over the queued events in report order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Takes every queued event, leaving the queue empty.
    #[inline]
    pub(crate) fn take(&mut self) -> EventVec {
        core::mem::take(&mut self.events)
    }
}

impl<'a> IntoIterator for &'a ErrorQueue {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
