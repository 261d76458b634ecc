//! WASM bindings for podcastr-player
//!
//! Lets the web UI hold its player state in Rust: components call into
//! `WasmPlayerStore` and re-render from the `onChange` callback.

pub mod store;
pub mod types;

pub use store::WasmPlayerStore;
pub use types::WasmEpisode;
