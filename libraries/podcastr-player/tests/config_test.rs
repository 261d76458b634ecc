//! Configuration loading tests
//!
//! Each test reads environment variables under its own prefix so tests can
//! run in parallel.

use podcastr_player::{ListIndexPolicy, PlayerConfig, PlayerError, PlayerStore, ShuffleAdvance};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("podcastr-player")
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_defaults_without_file_or_env() {
    let config = PlayerConfig::load_with_prefix(None, "PODCASTR_PLAYER_TEST_DEFAULTS").unwrap();

    assert_eq!(config, PlayerConfig::default());
    assert_eq!(config.shuffle_advance, ShuffleAdvance::Sequential);
    assert_eq!(config.list_index_policy, ListIndexPolicy::Clamp);
    assert_eq!(config.event_buffer, 64);
}

#[test]
fn test_file_overrides_defaults() {
    let file = write_config(
        r#"
shuffle_advance = "random"
list_index_policy = "reject"
event_buffer = 16
start_looping = true
"#,
    );

    let config =
        PlayerConfig::load_with_prefix(Some(file.path()), "PODCASTR_PLAYER_TEST_FILE").unwrap();

    assert_eq!(config.shuffle_advance, ShuffleAdvance::Random);
    assert_eq!(config.list_index_policy, ListIndexPolicy::Reject);
    assert_eq!(config.event_buffer, 16);
    assert!(config.start_looping);
    assert!(!config.start_shuffling);
}

#[test]
fn test_env_overrides_file() {
    let file = write_config("event_buffer = 16\n");
    std::env::set_var("PODCASTR_PLAYER_TEST_ENV_EVENT_BUFFER", "128");
    std::env::set_var("PODCASTR_PLAYER_TEST_ENV_START_SHUFFLING", "true");

    let config =
        PlayerConfig::load_with_prefix(Some(file.path()), "PODCASTR_PLAYER_TEST_ENV").unwrap();

    assert_eq!(config.event_buffer, 128);
    assert!(config.start_shuffling);
}

#[test]
fn test_zero_event_buffer_is_rejected() {
    let file = write_config("event_buffer = 0\n");

    let result = PlayerConfig::load_with_prefix(Some(file.path()), "PODCASTR_PLAYER_TEST_ZERO");

    assert!(matches!(result, Err(PlayerError::InvalidConfig(_))));
}

#[test]
fn test_unknown_policy_is_a_config_error() {
    let file = write_config("list_index_policy = \"wrap\"\n");

    let result = PlayerConfig::load_with_prefix(Some(file.path()), "PODCASTR_PLAYER_TEST_BAD");

    assert!(matches!(result, Err(PlayerError::Config(_))));
}

#[test]
fn test_loaded_config_seeds_store_flags() {
    let file = write_config("start_looping = true\nstart_shuffling = true\n");
    let config =
        PlayerConfig::load_with_prefix(Some(file.path()), "PODCASTR_PLAYER_TEST_SEED").unwrap();

    let store = PlayerStore::new(config);

    assert!(store.is_looping());
    assert!(store.is_shuffling());
    assert!(!store.is_playing());
    assert!(store.has_next());
}
