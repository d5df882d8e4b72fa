pub mod info;
pub mod make;

use std::path::{Path, PathBuf};

use stuble::config::StubleConfig;

/// Find the stub file for a command line query.
///
/// Named stubs are looked up in the stub directories; anything else is tried
/// as a path relative to the working directory.
pub(crate) fn resolve_stub(config: &StubleConfig, query: &str) -> Result<PathBuf, anyhow::Error> {
    if let Some(path) = config.find_stub(query) {
        return Ok(path);
    }

    let direct = config.working_dir().join(query);
    if Path::new(query).extension().is_some() && direct.is_file() {
        return Ok(direct);
    }

    Err(anyhow::anyhow!(
        "Stub '{query}' not found in {local}{global}",
        local = config.local_root().display(),
        global = config
            .global_root()
            .map(|root| format!(" or {}", root.display()))
            .unwrap_or_default()
    ))
}
