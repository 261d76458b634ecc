//! Player Events
//!
//! Every state change produces exactly one event. Events reach the UI two
//! ways:
//! - pushed synchronously to subscribed listeners
//! - buffered for components that prefer to poll (`drain_events`)

use crate::state::PlayerState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Events emitted by the player store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerEvent {
    /// Queue was replaced by `play` or `play_list` (playback also started)
    QueueReplaced {
        /// New queue length
        length: usize,
        /// Index of the episode now active
        current_index: usize,
    },

    /// Queue was emptied by `clear_player_state`
    QueueCleared,

    /// Active episode moved inside the same queue
    CurrentIndexChanged {
        /// New index
        index: usize,
        /// Index before the move
        previous: usize,
    },

    /// Playing flag changed
    PlayingChanged { is_playing: bool },

    /// Loop flag changed
    LoopingChanged { is_looping: bool },

    /// Shuffle flag changed
    ShufflingChanged { is_shuffling: bool },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Callback invoked after each state change
pub type Listener = Box<dyn FnMut(&PlayerEvent, &PlayerState)>;

/// Observer registry
///
/// Listeners run in subscription order. During a detached dispatch (see
/// [`PlayerListeners::detach`]) new subscriptions are collected and
/// re-attached afterwards, and removals are deferred until then.
#[derive(Default)]
pub struct PlayerListeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
    // Ids currently out for delivery; `None` when nothing is detached
    detached_ids: Option<Vec<SubscriptionId>>,
    removed_while_detached: Vec<SubscriptionId>,
}

impl fmt::Debug for PlayerListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerListeners")
            .field("next_id", &self.next_id)
            .field("listeners", &self.entries.len())
            .field("detached", &self.detached_ids.is_some())
            .finish()
    }
}

impl PlayerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener
    ///
    /// Returns false if the id is not registered. While detached, ids of
    /// detached listeners are accepted and removed on re-attach.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(pos) = self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            self.entries.remove(pos);
            return true;
        }

        let Some(detached_ids) = self.detached_ids.as_mut() else {
            return false;
        };
        let Some(pos) = detached_ids.iter().position(|detached| *detached == id) else {
            return false;
        };
        detached_ids.swap_remove(pos);
        self.removed_while_detached.push(id);
        true
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every listener in place
    pub fn notify(&mut self, event: &PlayerEvent, state: &PlayerState) {
        trace!(listeners = self.entries.len(), ?event, "Dispatching player event");
        for (_, listener) in &mut self.entries {
            listener(event, state);
        }
    }

    /// Take the listeners out so they can run without this registry borrowed
    pub(crate) fn detach(&mut self) -> Vec<(SubscriptionId, Listener)> {
        let entries = std::mem::take(&mut self.entries);
        self.detached_ids = Some(entries.iter().map(|(id, _)| *id).collect());
        entries
    }

    /// Put detached listeners back ahead of any added meanwhile
    pub(crate) fn reattach(&mut self, mut detached: Vec<(SubscriptionId, Listener)>) {
        let removed = std::mem::take(&mut self.removed_while_detached);
        detached.retain(|(id, _)| !removed.contains(id));
        detached.append(&mut self.entries);
        self.entries = detached;
        self.detached_ids = None;
    }
}

/// Bounded buffer of undrained events (oldest dropped first)
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<PlayerEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: PlayerEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_listener(seen: &Rc<RefCell<Vec<PlayerEvent>>>) -> Listener {
        let seen = Rc::clone(seen);
        Box::new(move |event, _| seen.borrow_mut().push(event.clone()))
    }

    #[test]
    fn notify_reaches_listeners_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = PlayerListeners::new();

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            listeners.subscribe(Box::new(move |_, _| order.borrow_mut().push(tag)));
        }

        listeners.notify(&PlayerEvent::QueueCleared, &PlayerState::new());
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = PlayerListeners::new();
        let id = listeners.subscribe(recording_listener(&seen));

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));

        listeners.notify(&PlayerEvent::QueueCleared, &PlayerState::new());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn removal_while_detached_applies_on_reattach() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = PlayerListeners::new();
        let keep = listeners.subscribe(recording_listener(&seen));
        let drop_me = listeners.subscribe(recording_listener(&seen));

        let detached = listeners.detach();
        assert!(listeners.unsubscribe(drop_me));
        let added = listeners.subscribe(recording_listener(&seen));
        listeners.reattach(detached);

        assert_eq!(listeners.len(), 2);
        assert!(listeners.unsubscribe(keep));
        assert!(listeners.unsubscribe(added));
        assert!(listeners.is_empty());
    }

    #[test]
    fn stale_id_is_rejected_while_detached() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = PlayerListeners::new();
        let stale = listeners.subscribe(recording_listener(&seen));
        assert!(listeners.unsubscribe(stale));
        let live = listeners.subscribe(recording_listener(&seen));

        let detached = listeners.detach();
        assert!(!listeners.unsubscribe(stale));
        assert!(listeners.unsubscribe(live));
        assert!(!listeners.unsubscribe(live));
        listeners.reattach(detached);

        assert!(listeners.is_empty());
        assert!(!listeners.unsubscribe(stale));
    }

    #[test]
    fn event_log_drops_oldest_when_full() {
        let mut log = EventLog::new(2);
        log.push(PlayerEvent::PlayingChanged { is_playing: true });
        log.push(PlayerEvent::LoopingChanged { is_looping: true });
        log.push(PlayerEvent::ShufflingChanged { is_shuffling: true });

        assert_eq!(
            log.drain(),
            vec![
                PlayerEvent::LoopingChanged { is_looping: true },
                PlayerEvent::ShufflingChanged { is_shuffling: true },
            ]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(PlayerEvent::CurrentIndexChanged {
            index: 2,
            previous: 1,
        })
        .unwrap();
        assert_eq!(json["type"], "currentIndexChanged");
        assert_eq!(json["index"], 2);
    }
}
