//! Session-scoped change notifications
//!
//! Subscribers register callbacks directly with the session's dispatcher;
//! delivery order is subscription order and subscriber lifetime is bounded
//! by the session. There is no process-global event bus.

use crate::transport::PlaybackState;

/// Notification emitted by a camera path session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEvent {
    /// The keyframe store changed (insert, remove, edit, seam toggle,
    /// normalize, clear, load)
    KeyframesChanged,
    /// The playback cursor moved
    FrameChanged { frame: u64 },
    /// The transport changed state
    PlaybackStateChanged { state: PlaybackState },
}

/// Handle for removing a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&PathEvent)>;

/// Dispatches [`PathEvent`]s to registered callbacks
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; returns a handle for [`unsubscribe`](Self::unsubscribe)
    pub fn subscribe(&mut self, callback: impl FnMut(&PathEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber, in subscription order
    pub fn dispatch(&mut self, event: &PathEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of live subscriptions
    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_dispatch_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let sink = Rc::clone(&seen);
        let id = dispatcher.subscribe(move |e| sink.borrow_mut().push(*e));

        dispatcher.dispatch(&PathEvent::KeyframesChanged);
        dispatcher.dispatch(&PathEvent::FrameChanged { frame: 3 });
        assert_eq!(
            *seen.borrow(),
            vec![
                PathEvent::KeyframesChanged,
                PathEvent::FrameChanged { frame: 3 }
            ]
        );

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.dispatch(&PathEvent::KeyframesChanged);
        assert_eq!(seen.borrow().len(), 2);
    }
}
