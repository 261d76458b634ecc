//! WASM-compatible type definitions

use crate::{Episode, PlayerState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// WASM-compatible episode
///
/// Same fields as [`Episode`], with the duration as fractional seconds.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[wasm_bindgen]
pub struct WasmEpisode {
    title: String,
    members: String,
    thumbnail: String,
    #[serde(alias = "duration")]
    duration_secs: f64,
    url: String,
}

#[wasm_bindgen]
impl WasmEpisode {
    /// Create a new episode
    #[wasm_bindgen(constructor)]
    pub fn new(
        title: String,
        members: String,
        thumbnail: String,
        duration_secs: f64,
        url: String,
    ) -> Self {
        Self {
            title,
            members,
            thumbnail,
            duration_secs,
            url,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn members(&self) -> String {
        self.members.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn thumbnail(&self) -> String {
        self.thumbnail.clone()
    }

    #[wasm_bindgen(getter, js_name = durationSecs)]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.url.clone()
    }
}

impl From<&Episode> for WasmEpisode {
    fn from(episode: &Episode) -> Self {
        Self {
            title: episode.title.clone(),
            members: episode.members.clone(),
            thumbnail: episode.thumbnail.clone(),
            duration_secs: episode.duration.as_secs_f64(),
            url: episode.url.clone(),
        }
    }
}

impl From<WasmEpisode> for Episode {
    fn from(episode: WasmEpisode) -> Self {
        Self {
            title: episode.title,
            members: episode.members,
            thumbnail: episode.thumbnail,
            // Negative or NaN durations from JS become zero
            duration: Duration::try_from_secs_f64(episode.duration_secs).unwrap_or_default(),
            url: episode.url,
        }
    }
}

/// State as handed to JS, including the derived navigation flags
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasmPlayerState {
    pub queue: Vec<WasmEpisode>,
    pub current_index: usize,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_previous: bool,
    pub has_next: bool,
}

impl From<&PlayerState> for WasmPlayerState {
    fn from(state: &PlayerState) -> Self {
        Self {
            queue: state.queue().iter().map(WasmEpisode::from).collect(),
            current_index: state.current_index(),
            is_playing: state.is_playing(),
            is_looping: state.is_looping(),
            is_shuffling: state.is_shuffling(),
            has_previous: state.has_previous(),
            has_next: state.has_next(),
        }
    }
}
