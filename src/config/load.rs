//! Loading [`StubleConfig`] from its sources.

use std::path::Path;

use super::{CONFIG_FILE, ConfigError, StubleConfig};

const ENV_PREFIX: &str = "STUBLE";

impl StubleConfig {
    /// Load the config for the current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CwdFailure)?;
        Self::load_from_dir(&cwd, None)
    }

    /// Load the config for `dir`. `env` replaces the process environment when
    /// given.
    pub(crate) fn load_from_dir(
        dir: &Path,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = dir.join(CONFIG_FILE);
        let file_str = file
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(file.clone()))?;

        let mut config = config::Config::builder()
            .add_source(config::File::new(file_str, config::FileFormat::Yaml).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize::<StubleConfig>()?;

        config.working_dir = dir.to_path_buf();
        tracing::debug!(?config, "loaded config");
        Ok(config)
    }
}
