//! Player state record
//!
//! Plain data plus the derived navigation flags. Only [`crate::PlayerStore`]
//! mutates it; everyone else gets a shared reference.

use crate::types::Episode;
use serde::Serialize;

/// Snapshot of the player state
///
/// Invariant: when `queue` is non-empty, `current_index < queue.len()`.
/// When it is empty, `current_index` is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub(crate) queue: Vec<Episode>,
    pub(crate) current_index: usize,
    pub(crate) is_playing: bool,
    pub(crate) is_looping: bool,
    pub(crate) is_shuffling: bool,
}

impl PlayerState {
    /// Empty queue, index 0, every flag off
    pub fn new() -> Self {
        Self::default()
    }

    /// Episodes in playback order
    pub fn queue(&self) -> &[Episode] {
        &self.queue
    }

    /// Position of the active episode in the queue
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Active episode, if the queue has one
    pub fn current_episode(&self) -> Option<&Episode> {
        self.queue.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    /// Check if there is a previous episode
    ///
    /// Ignores shuffle: at index 0 this is false even though a shuffled
    /// `play_previous` would still move.
    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Check if there is a next episode
    ///
    /// Always true while shuffling.
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_index + 1 < self.queue.len()
    }
}
