//! Player store - the single writer of player state
//!
//! Every operation is total: it either changes state and emits one event,
//! or leaves state untouched and emits nothing.

use crate::{
    error::{PlayerError, Result},
    events::{EventLog, Listener, PlayerEvent, PlayerListeners, SubscriptionId},
    random::{IndexPicker, ThreadRngPicker},
    state::PlayerState,
    types::{Episode, ListIndexPolicy, PlayerConfig, ShuffleAdvance},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// A single mutation request
///
/// The named methods on [`PlayerStore`] are shorthands for dispatching one
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerAction {
    /// Replace the queue with one episode and start it
    Play { episode: Episode },

    /// Replace the queue with a list and start at `index`
    PlayList { episodes: Vec<Episode>, index: usize },

    TogglePlay,
    ToggleLoop,
    ToggleShuffle,

    /// Report what the audio element is actually doing
    SetPlayingState { is_playing: bool },

    /// Empty the queue, keeping the flags
    ClearPlayerState,

    PlayNext,
    PlayPrevious,
}

/// Shared player state with observer notification
///
/// Construct one per session at the UI root and hand it (or a
/// [`crate::PlayerContext`]) to the components that need it.
pub struct PlayerStore {
    state: PlayerState,
    config: PlayerConfig,
    picker: Box<dyn IndexPicker>,
    listeners: PlayerListeners,
    events: EventLog,
}

impl fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerStore")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("listeners", &self.listeners)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl PlayerStore {
    /// Create a store with the thread-local RNG for shuffle picks
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_picker(config, Box::new(ThreadRngPicker))
    }

    /// Create a store with a custom source of random indices
    pub fn with_picker(config: PlayerConfig, picker: Box<dyn IndexPicker>) -> Self {
        let state = PlayerState {
            is_looping: config.start_looping,
            is_shuffling: config.start_shuffling,
            ..PlayerState::new()
        };

        Self {
            state,
            events: EventLog::new(config.event_buffer),
            config,
            picker,
            listeners: PlayerListeners::new(),
        }
    }

    // ===== Operations =====

    /// Play a single episode, discarding the current queue
    pub fn play(&mut self, episode: Episode) {
        self.dispatch(PlayerAction::Play { episode });
    }

    /// Play `episodes` starting at `index`
    ///
    /// An out-of-range index is handled per [`ListIndexPolicy`].
    pub fn play_list(&mut self, episodes: Vec<Episode>, index: usize) {
        self.dispatch(PlayerAction::PlayList { episodes, index });
    }

    /// Play `episodes` starting at `index`, rejecting an out-of-range index
    pub fn try_play_list(&mut self, episodes: Vec<Episode>, index: usize) -> Result<()> {
        check_list_index(episodes.len(), index)?;
        self.dispatch(PlayerAction::PlayList { episodes, index });
        Ok(())
    }

    pub fn toggle_play(&mut self) {
        self.dispatch(PlayerAction::TogglePlay);
    }

    pub fn toggle_loop(&mut self) {
        self.dispatch(PlayerAction::ToggleLoop);
    }

    pub fn toggle_shuffle(&mut self) {
        self.dispatch(PlayerAction::ToggleShuffle);
    }

    /// Sync the playing flag with the audio element (ended, paused, played)
    pub fn set_playing_state(&mut self, is_playing: bool) {
        self.dispatch(PlayerAction::SetPlayingState { is_playing });
    }

    /// Empty the queue and reset the index; flags are left as they are
    pub fn clear_player_state(&mut self) {
        self.dispatch(PlayerAction::ClearPlayerState);
    }

    /// Advance to the next episode if there is one
    ///
    /// While shuffling this follows [`ShuffleAdvance`].
    pub fn play_next(&mut self) {
        self.dispatch(PlayerAction::PlayNext);
    }

    /// Go back one episode, or to a random one while shuffling
    pub fn play_previous(&mut self) {
        self.dispatch(PlayerAction::PlayPrevious);
    }

    /// Apply an action and notify subscribers
    ///
    /// Returns true if state changed.
    pub fn dispatch(&mut self, action: PlayerAction) -> bool {
        let Some(event) = self.apply(action) else {
            return false;
        };

        self.events.push(event.clone());
        self.listeners.notify(&event, &self.state);
        true
    }

    /// Apply an action without notifying; returns the change, if any
    pub(crate) fn apply(&mut self, action: PlayerAction) -> Option<PlayerEvent> {
        let event = match action {
            PlayerAction::Play { episode } => {
                if self.is_active(std::slice::from_ref(&episode), 0) {
                    return None;
                }
                self.state.queue = vec![episode];
                self.state.current_index = 0;
                self.state.is_playing = true;
                PlayerEvent::QueueReplaced {
                    length: 1,
                    current_index: 0,
                }
            }
            PlayerAction::PlayList { episodes, index } => {
                let index = self.resolve_list_index(episodes.len(), index)?;
                if self.is_active(&episodes, index) {
                    return None;
                }
                let length = episodes.len();
                self.state.queue = episodes;
                self.state.current_index = index;
                self.state.is_playing = true;
                PlayerEvent::QueueReplaced {
                    length,
                    current_index: index,
                }
            }
            PlayerAction::TogglePlay => self.set_playing(!self.state.is_playing)?,
            PlayerAction::SetPlayingState { is_playing } => self.set_playing(is_playing)?,
            PlayerAction::ToggleLoop => {
                self.state.is_looping = !self.state.is_looping;
                PlayerEvent::LoopingChanged {
                    is_looping: self.state.is_looping,
                }
            }
            PlayerAction::ToggleShuffle => {
                self.state.is_shuffling = !self.state.is_shuffling;
                PlayerEvent::ShufflingChanged {
                    is_shuffling: self.state.is_shuffling,
                }
            }
            PlayerAction::ClearPlayerState => {
                if self.state.queue.is_empty() {
                    return None;
                }
                self.state.queue.clear();
                self.state.current_index = 0;
                PlayerEvent::QueueCleared
            }
            PlayerAction::PlayNext => {
                let target = self.next_index()?;
                self.move_to(target)?
            }
            PlayerAction::PlayPrevious => {
                let target = self.previous_index()?;
                self.move_to(target)?
            }
        };

        debug!(?event, "Player state changed");
        Some(event)
    }

    /// Whether `episodes` at `index` is already queued and playing
    fn is_active(&self, episodes: &[Episode], index: usize) -> bool {
        self.state.is_playing
            && self.state.current_index == index
            && self.state.queue == episodes
    }

    fn set_playing(&mut self, is_playing: bool) -> Option<PlayerEvent> {
        if self.state.is_playing == is_playing {
            return None;
        }
        self.state.is_playing = is_playing;
        Some(PlayerEvent::PlayingChanged { is_playing })
    }

    fn move_to(&mut self, index: usize) -> Option<PlayerEvent> {
        let previous = self.state.current_index;
        if index == previous {
            return None;
        }
        self.state.current_index = index;
        Some(PlayerEvent::CurrentIndexChanged { index, previous })
    }

    fn next_index(&mut self) -> Option<usize> {
        if !self.state.has_next() {
            return None;
        }

        let len = self.state.queue.len();
        if !self.state.is_shuffling {
            return Some(self.state.current_index + 1);
        }

        // Shuffling reports has_next even for an empty queue
        if len == 0 {
            return None;
        }

        match self.config.shuffle_advance {
            ShuffleAdvance::Sequential => Some((self.state.current_index + 1) % len),
            ShuffleAdvance::Random => Some(self.picker.pick(len)),
        }
    }

    fn previous_index(&mut self) -> Option<usize> {
        if self.state.is_shuffling {
            let len = self.state.queue.len();
            return (len > 0).then(|| self.picker.pick(len));
        }

        self.state
            .has_previous()
            .then(|| self.state.current_index - 1)
    }

    fn resolve_list_index(&self, len: usize, index: usize) -> Option<usize> {
        if check_list_index(len, index).is_ok() {
            return Some(index);
        }

        match self.config.list_index_policy {
            ListIndexPolicy::Clamp => {
                let clamped = len.saturating_sub(1);
                warn!(index, len, clamped, "play_list index out of range, clamping");
                Some(clamped)
            }
            ListIndexPolicy::Reject => {
                warn!(index, len, "play_list index out of range, ignoring call");
                None
            }
        }
    }

    // ===== Subscription =====

    /// Register a listener called synchronously after every state change
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PlayerEvent, &PlayerState) + 'static,
    ) -> SubscriptionId {
        let id = self.listeners.subscribe(Box::new(listener) as Listener);
        debug!(%id, "Player listener subscribed");
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.listeners.unsubscribe(id);
        debug!(%id, removed, "Player listener unsubscribed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut PlayerListeners {
        &mut self.listeners
    }

    pub(crate) fn record(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }

    // ===== Events =====

    /// Drain all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain()
    }

    /// Check if there are undrained events
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // ===== State Queries =====

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn queue(&self) -> &[Episode] {
        self.state.queue()
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.state.current_episode()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn is_looping(&self) -> bool {
        self.state.is_looping()
    }

    pub fn is_shuffling(&self) -> bool {
        self.state.is_shuffling()
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

pub(crate) fn check_list_index(len: usize, index: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(PlayerError::IndexOutOfBounds { index, len })
    }
}
