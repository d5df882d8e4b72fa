//! Configuration for stuble.
//!
//! Settings come from built-in defaults, an optional `stuble.yaml` in the
//! working directory and `STUBLE_*` environment variables, in that order.

mod load;
mod lookup;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use lookup::StubRoot;

/// Name of the optional config file in the working directory.
pub const CONFIG_FILE: &str = "stuble.yaml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StubleConfig {
    /// Global stuble directory. Global stubs live in `<home>/<stubs_dir>`.
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Stub directory name, relative to the working directory or `home`.
    #[serde(default = "default_stubs_dir")]
    pub stubs_dir: PathBuf,

    /// File extension of stub files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(skip)]
    working_dir: PathBuf,
}

fn default_stubs_dir() -> PathBuf {
    PathBuf::from("stubs")
}

fn default_extension() -> String {
    "stub".to_string()
}

impl StubleConfig {
    /// Directory relative paths are resolved against.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// `./stubs` under the working directory.
    pub fn local_root(&self) -> PathBuf {
        self.working_dir.join(&self.stubs_dir)
    }

    /// `<home>/stubs`, when a home directory is configured.
    pub fn global_root(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| {
            let home = if home.is_relative() {
                self.working_dir.join(home)
            } else {
                home.clone()
            };
            home.join(&self.stubs_dir)
        })
    }
}
