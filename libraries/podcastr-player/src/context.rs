//! Shared handle for UI components
//!
//! `PlayerContext` is what gets passed down the component tree: clones share
//! one [`PlayerStore`]. Listeners run with the store released, so they may
//! read it, subscribe, or dispatch further actions through their own clone.
//! Actions dispatched from inside a listener are applied immediately and
//! delivered once the current event has reached every listener.

use crate::{
    error::Result,
    events::{Listener, PlayerEvent, SubscriptionId},
    state::PlayerState,
    store::{check_list_index, PlayerAction, PlayerStore},
    types::{Episode, PlayerConfig},
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{trace, warn};

struct Shared {
    store: RefCell<PlayerStore>,
    pending: RefCell<VecDeque<(PlayerEvent, PlayerState)>>,
    delivering: Cell<bool>,
}

/// Clears the delivering flag, also when a listener panics
struct DeliveringGuard<'a>(&'a Cell<bool>);

impl Drop for DeliveringGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Listeners detached for one event, reattached on drop
struct Delivery<'a> {
    shared: &'a Shared,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl<'a> Delivery<'a> {
    fn start(shared: &'a Shared) -> Self {
        let listeners = shared.store.borrow_mut().listeners_mut().detach();
        Self { shared, listeners }
    }
}

impl Drop for Delivery<'_> {
    fn drop(&mut self) {
        let listeners = std::mem::take(&mut self.listeners);
        match self.shared.store.try_borrow_mut() {
            Ok(mut store) => store.listeners_mut().reattach(listeners),
            Err(_) => warn!(
                dropped = listeners.len(),
                "Player store busy while reattaching listeners"
            ),
        }
    }
}

/// Cloneable, single-threaded handle to one player store
#[derive(Clone)]
pub struct PlayerContext {
    shared: Rc<Shared>,
}

impl std::fmt::Debug for PlayerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerContext")
            .field("handles", &Rc::strong_count(&self.shared))
            .field("delivering", &self.shared.delivering.get())
            .finish_non_exhaustive()
    }
}

impl PlayerContext {
    pub fn new(config: PlayerConfig) -> Self {
        Self::from_store(PlayerStore::new(config))
    }

    /// Wrap an existing store (e.g. one built with a custom picker)
    pub fn from_store(store: PlayerStore) -> Self {
        Self {
            shared: Rc::new(Shared {
                store: RefCell::new(store),
                pending: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
            }),
        }
    }

    /// Apply an action and deliver the resulting event
    ///
    /// Returns true if state changed.
    pub fn dispatch(&self, action: PlayerAction) -> bool {
        {
            let mut store = self.shared.store.borrow_mut();
            let Some(event) = store.apply(action) else {
                return false;
            };
            store.record(event.clone());
            let snapshot = store.state().clone();
            self.shared.pending.borrow_mut().push_back((event, snapshot));
        }

        if self.shared.delivering.replace(true) {
            trace!("Nested dispatch, event queued behind current delivery");
            return true;
        }

        let _delivering = DeliveringGuard(&self.shared.delivering);
        self.deliver_pending();
        true
    }

    fn deliver_pending(&self) {
        loop {
            let next = self.shared.pending.borrow_mut().pop_front();
            let Some((event, snapshot)) = next else {
                break;
            };

            let mut delivery = Delivery::start(&self.shared);
            for (_, listener) in &mut delivery.listeners {
                listener(&event, &snapshot);
            }
        }
    }

    // ===== Operations =====

    pub fn play(&self, episode: Episode) {
        self.dispatch(PlayerAction::Play { episode });
    }

    pub fn play_list(&self, episodes: Vec<Episode>, index: usize) {
        self.dispatch(PlayerAction::PlayList { episodes, index });
    }

    pub fn try_play_list(&self, episodes: Vec<Episode>, index: usize) -> Result<()> {
        check_list_index(episodes.len(), index)?;
        self.dispatch(PlayerAction::PlayList { episodes, index });
        Ok(())
    }

    pub fn toggle_play(&self) {
        self.dispatch(PlayerAction::TogglePlay);
    }

    pub fn toggle_loop(&self) {
        self.dispatch(PlayerAction::ToggleLoop);
    }

    pub fn toggle_shuffle(&self) {
        self.dispatch(PlayerAction::ToggleShuffle);
    }

    pub fn set_playing_state(&self, is_playing: bool) {
        self.dispatch(PlayerAction::SetPlayingState { is_playing });
    }

    pub fn clear_player_state(&self) {
        self.dispatch(PlayerAction::ClearPlayerState);
    }

    pub fn play_next(&self) {
        self.dispatch(PlayerAction::PlayNext);
    }

    pub fn play_previous(&self) {
        self.dispatch(PlayerAction::PlayPrevious);
    }

    // ===== Subscription =====

    pub fn subscribe(
        &self,
        listener: impl FnMut(&PlayerEvent, &PlayerState) + 'static,
    ) -> SubscriptionId {
        self.shared.store.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.store.borrow_mut().unsubscribe(id)
    }

    pub fn drain_events(&self) -> Vec<PlayerEvent> {
        self.shared.store.borrow_mut().drain_events()
    }

    // ===== State Queries =====

    /// Run `f` against the current state without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&PlayerState) -> R) -> R {
        f(self.shared.store.borrow().state())
    }

    /// Owned copy of the current state
    pub fn state(&self) -> PlayerState {
        self.with_state(PlayerState::clone)
    }

    /// Owned copy of the queue
    pub fn queue(&self) -> Vec<Episode> {
        self.with_state(|state| state.queue().to_vec())
    }

    pub fn current_index(&self) -> usize {
        self.with_state(PlayerState::current_index)
    }

    pub fn current_episode(&self) -> Option<Episode> {
        self.with_state(|state| state.current_episode().cloned())
    }

    pub fn is_playing(&self) -> bool {
        self.with_state(PlayerState::is_playing)
    }

    pub fn is_looping(&self) -> bool {
        self.with_state(PlayerState::is_looping)
    }

    pub fn is_shuffling(&self) -> bool {
        self.with_state(PlayerState::is_shuffling)
    }

    pub fn has_previous(&self) -> bool {
        self.with_state(PlayerState::has_previous)
    }

    pub fn has_next(&self) -> bool {
        self.with_state(PlayerState::has_next)
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_episode(name: &str) -> Episode {
        Episode::new(
            name,
            "Host",
            "https://cdn.example/thumb.jpg",
            Duration::from_secs(900),
            format!("https://cdn.example/{}.mp3", name),
        )
    }

    #[test]
    fn clones_share_state() {
        let root = PlayerContext::default();
        let now_playing_bar = root.clone();

        root.play(create_test_episode("A"));

        assert!(now_playing_bar.is_playing());
        assert_eq!(now_playing_bar.current_episode().unwrap().title, "A");
    }

    #[test]
    fn listener_can_read_context() {
        let ctx = PlayerContext::default();
        let seen = Rc::new(Cell::new(false));

        let reader = ctx.clone();
        let flag = Rc::clone(&seen);
        ctx.subscribe(move |_, _| flag.set(reader.is_playing()));

        ctx.play(create_test_episode("A"));
        assert!(seen.get());
    }

    #[test]
    fn listener_dispatch_is_delivered_after_current_event() {
        let ctx = PlayerContext::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        // Mimics the audio element reporting "paused" whenever a queue loads
        let engine = ctx.clone();
        ctx.subscribe(move |event, _| {
            if matches!(event, PlayerEvent::QueueReplaced { .. }) {
                engine.set_playing_state(false);
            }
        });

        let sink = Rc::clone(&log);
        ctx.subscribe(move |event, state| {
            sink.borrow_mut().push((event.clone(), state.is_playing()));
        });

        ctx.play(create_test_episode("A"));

        assert_eq!(
            *log.borrow(),
            vec![
                (
                    PlayerEvent::QueueReplaced {
                        length: 1,
                        current_index: 0
                    },
                    true
                ),
                (PlayerEvent::PlayingChanged { is_playing: false }, false),
            ]
        );
        assert!(!ctx.is_playing());
    }

    #[test]
    fn listener_can_unsubscribe_itself() {
        let ctx = PlayerContext::default();
        let calls = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let handle = ctx.clone();
        let counter = Rc::clone(&calls);
        let slot = Rc::clone(&id_slot);
        let id = ctx.subscribe(move |_, _| {
            counter.set(counter.get() + 1);
            if let Some(id) = slot.get() {
                handle.unsubscribe(id);
            }
        });
        id_slot.set(Some(id));

        ctx.toggle_loop();
        ctx.toggle_loop();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listeners_survive_a_panicking_listener() {
        let ctx = PlayerContext::default();
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        ctx.subscribe(move |_, _| counter.set(counter.get() + 1));
        let panicked = Cell::new(false);
        ctx.subscribe(move |_, _| {
            if !panicked.replace(true) {
                panic!("listener failure");
            }
        });

        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| ctx.toggle_loop()));
        assert!(result.is_err());
        assert!(ctx.is_looping());

        ctx.toggle_loop();

        assert_eq!(calls.get(), 2);
        assert!(!ctx.is_looping());
        assert!(!format!("{:?}", ctx).contains("delivering: true"));
    }

    #[test]
    fn stale_unsubscribe_during_delivery_returns_false() {
        let ctx = PlayerContext::default();
        let stale = ctx.subscribe(|_, _| {});
        assert!(ctx.unsubscribe(stale));

        let result = Rc::new(Cell::new(None));
        let handle = ctx.clone();
        let slot = Rc::clone(&result);
        ctx.subscribe(move |_, _| slot.set(Some(handle.unsubscribe(stale))));

        ctx.toggle_loop();

        assert_eq!(result.get(), Some(false));
    }

    #[test]
    fn queue_returns_owned_copy() {
        let ctx = PlayerContext::default();
        assert!(ctx.queue().is_empty());

        ctx.play_list(vec![create_test_episode("A"), create_test_episode("B")], 1);

        let titles: Vec<String> = ctx.queue().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn try_play_list_rejects_bad_index() {
        let ctx = PlayerContext::default();
        assert!(ctx.try_play_list(vec![create_test_episode("A")], 1).is_err());
        assert!(ctx.drain_events().is_empty());
    }
}
