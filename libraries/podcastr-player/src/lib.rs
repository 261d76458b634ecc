//! Podcastr - Player State
//!
//! Shared playback state for the Podcastr UI.
//!
//! This crate provides:
//! - The episode queue and the index of the active episode
//! - Playing / looping / shuffling flags
//! - Derived navigation flags (`has_previous`, `has_next`)
//! - Synchronous change notification for UI components
//! - A cloneable context handle to pass down the component tree
//!
//! # Architecture
//!
//! `podcastr-player` only holds state. It does not render anything and does
//! not play audio: the UI wires `is_playing`/`is_looping` to its audio element
//! and reports pauses and ends back through `set_playing_state`.
//!
//! All operations run to completion on the UI thread. There is no locking;
//! [`PlayerContext`] is deliberately `!Send`.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use podcastr_player::{Episode, PlayerStore};
//! use std::time::Duration;
//!
//! let mut player = PlayerStore::default();
//!
//! let episodes = vec![
//!     Episode::new("Ep. 1", "Host", "https://cdn/1.jpg", Duration::from_secs(1200), "https://cdn/1.mp3"),
//!     Episode::new("Ep. 2", "Host", "https://cdn/2.jpg", Duration::from_secs(1500), "https://cdn/2.mp3"),
//! ];
//!
//! player.play_list(episodes, 0);
//! assert!(player.is_playing());
//! assert!(player.has_next());
//!
//! player.play_next();
//! assert_eq!(player.current_index(), 1);
//! assert!(!player.has_next());
//! ```
//!
//! # Example: Sharing Between Components
//!
//! ```rust
//! use podcastr_player::{Episode, PlayerContext, PlayerEvent};
//! use std::time::Duration;
//!
//! let root = PlayerContext::default();
//!
//! // "Now playing" bar re-renders on every change
//! let bar = root.clone();
//! bar.subscribe(|event, state| {
//!     if let PlayerEvent::QueueReplaced { .. } = event {
//!         assert!(state.is_playing());
//!     }
//! });
//!
//! // Play button inside an episode list
//! let list_item = root.clone();
//! list_item.play(Episode::new("Ep. 9", "Host", "https://cdn/9.jpg", Duration::from_secs(60), "https://cdn/9.mp3"));
//!
//! assert_eq!(bar.current_episode().unwrap().title, "Ep. 9");
//! ```

mod config;
mod context;
mod error;
mod events;
mod random;
mod state;
mod store;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use config::ENV_PREFIX;
pub use context::PlayerContext;
pub use error::{PlayerError, Result};
pub use events::{EventLog, Listener, PlayerEvent, PlayerListeners, SubscriptionId};
pub use random::{IndexPicker, SeededPicker, ThreadRngPicker};
pub use state::PlayerState;
pub use store::{PlayerAction, PlayerStore};
pub use types::{Episode, ListIndexPolicy, PlayerConfig, ShuffleAdvance};
