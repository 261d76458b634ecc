//! Layered player configuration
//!
//! Defaults, then an optional TOML file, then `PODCASTR_PLAYER_*`
//! environment variables.

use crate::error::{PlayerError, Result};
use crate::types::PlayerConfig;
use std::path::Path;
use tracing::debug;

/// Environment variable prefix used by [`PlayerConfig::load`]
pub const ENV_PREFIX: &str = "PODCASTR_PLAYER";

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// A missing file is not an error; the defaults and environment still apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration, reading environment variables under `prefix`
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                debug!("Loading player config from {}", path.display());
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
        }

        // PREFIX_EVENT_BUFFER -> event_buffer
        settings = settings.add_source(config::Environment::with_prefix(prefix).try_parsing(true));

        let config: PlayerConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer == 0 {
            return Err(PlayerError::InvalidConfig(
                "event_buffer must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
