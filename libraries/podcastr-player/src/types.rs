//! Core types for player state

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Episode information for the play queue
///
/// Carries everything the "now playing" surface needs to display and hand
/// to the audio element. Episodes have no identity of their own: the
/// player addresses them by position in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Episode title
    pub title: String,

    /// Hosts/guests credited on the episode
    pub members: String,

    /// Thumbnail image URL
    pub thumbnail: String,

    /// Episode length, exchanged as whole seconds
    #[serde(with = "duration_secs")]
    pub duration: Duration,

    /// Audio file URL
    pub url: String,
}

impl Episode {
    pub fn new(
        title: impl Into<String>,
        members: impl Into<String>,
        thumbnail: impl Into<String>,
        duration: Duration,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            members: members.into(),
            thumbnail: thumbnail.into(),
            duration,
            url: url.into(),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// How `play_next` moves while shuffle is on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleAdvance {
    /// Step to the following episode, wrapping to the start after the last
    #[default]
    Sequential,

    /// Jump to a uniformly random episode, same as `play_previous`
    Random,
}

/// What `play_list` does with a start index outside the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListIndexPolicy {
    /// Clamp the index to the last episode
    #[default]
    Clamp,

    /// Ignore the call and keep the current state
    Reject,
}

/// Configuration for the player store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// `play_next` behavior while shuffling (default: Sequential)
    pub shuffle_advance: ShuffleAdvance,

    /// Out-of-range `play_list` handling (default: Clamp)
    pub list_index_policy: ListIndexPolicy,

    /// Maximum number of undrained events kept (default: 64)
    pub event_buffer: usize,

    /// Initial loop flag (default: false)
    pub start_looping: bool,

    /// Initial shuffle flag (default: false)
    pub start_shuffling: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            shuffle_advance: ShuffleAdvance::Sequential,
            list_index_policy: ListIndexPolicy::Clamp,
            event_buffer: 64,
            start_looping: false,
            start_shuffling: false,
        }
    }
}
