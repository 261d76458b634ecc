//! WASM-compatible PlayerStore wrapper

use super::types::{WasmEpisode, WasmPlayerState};
use crate::{Episode, PlayerConfig, PlayerContext, PlayerError, PlayerState};
use js_sys::Function;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js_error(error: PlayerError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// WASM-compatible player store
///
/// This wraps a [`PlayerContext`] with a JavaScript-friendly API. Methods
/// take `&self`, so the `onChange` callback may call back into the store;
/// actions it dispatches are delivered after the current event.
#[wasm_bindgen]
pub struct WasmPlayerStore {
    inner: PlayerContext,

    // Called as `callback(event, state)` after every change
    on_change: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl WasmPlayerStore {
    /// Create a new player store
    ///
    /// `config` is an optional plain object with the `PlayerConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmPlayerStore, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        config.validate().map_err(to_js_error)?;

        let inner = PlayerContext::new(config);
        let on_change: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));

        let callback = Rc::clone(&on_change);
        inner.subscribe(move |event, state: &PlayerState| {
            let Some(cb) = callback.borrow().clone() else {
                return;
            };
            let payload = to_js(event).and_then(|js_event| {
                to_js(&WasmPlayerState::from(state)).map(|js_state| (js_event, js_state))
            });
            let result = payload
                .and_then(|(js_event, js_state)| cb.call2(&JsValue::NULL, &js_event, &js_state));
            if let Err(err) = result {
                warn!(?err, ?event, "onChange callback failed");
            }
        });

        Ok(Self { inner, on_change })
    }

    // ===== Operations =====

    /// Play a single episode
    pub fn play(&self, episode: WasmEpisode) {
        self.inner.play(episode.into());
    }

    /// Play a list of episodes (array of plain objects) starting at `index`
    #[wasm_bindgen(js_name = playList)]
    pub fn play_list(&self, episodes: JsValue, index: usize) -> Result<(), JsValue> {
        let episodes: Vec<WasmEpisode> = serde_wasm_bindgen::from_value(episodes)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse episodes: {}", e)))?;
        let episodes: Vec<Episode> = episodes.into_iter().map(Episode::from).collect();

        self.inner.play_list(episodes, index);
        Ok(())
    }

    /// Like `playList`, but throws on an out-of-range index
    #[wasm_bindgen(js_name = tryPlayList)]
    pub fn try_play_list(&self, episodes: JsValue, index: usize) -> Result<(), JsValue> {
        let episodes: Vec<WasmEpisode> = serde_wasm_bindgen::from_value(episodes)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse episodes: {}", e)))?;
        let episodes: Vec<Episode> = episodes.into_iter().map(Episode::from).collect();

        self.inner.try_play_list(episodes, index).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        self.inner.toggle_play();
    }

    #[wasm_bindgen(js_name = toggleLoop)]
    pub fn toggle_loop(&self) {
        self.inner.toggle_loop();
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) {
        self.inner.toggle_shuffle();
    }

    /// Report the audio element's actual state (onplay / onpause / onended)
    #[wasm_bindgen(js_name = setPlayingState)]
    pub fn set_playing_state(&self, is_playing: bool) {
        self.inner.set_playing_state(is_playing);
    }

    #[wasm_bindgen(js_name = clearPlayerState)]
    pub fn clear_player_state(&self) {
        self.inner.clear_player_state();
    }

    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&self) {
        self.inner.play_next();
    }

    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&self) {
        self.inner.play_previous();
    }

    // ===== State Queries =====

    /// Full state snapshot as a plain object
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        self.inner.with_state(|state| to_js(&WasmPlayerState::from(state)))
    }

    #[wasm_bindgen(js_name = currentEpisode)]
    pub fn current_episode(&self) -> Option<WasmEpisode> {
        self.inner.current_episode().as_ref().map(WasmEpisode::from)
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.inner.current_index()
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    #[wasm_bindgen(getter, js_name = isLooping)]
    pub fn is_looping(&self) -> bool {
        self.inner.is_looping()
    }

    #[wasm_bindgen(getter, js_name = isShuffling)]
    pub fn is_shuffling(&self) -> bool {
        self.inner.is_shuffling()
    }

    #[wasm_bindgen(getter, js_name = hasPrevious)]
    pub fn has_previous(&self) -> bool {
        self.inner.has_previous()
    }

    #[wasm_bindgen(getter, js_name = hasNext)]
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    // ===== Event Listeners =====

    /// Register the change callback, replacing any previous one
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Option<Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    /// Drain buffered events as an array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.drain_events())
    }
}
