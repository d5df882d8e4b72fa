//! Finding stub files in the local and global stub directories.

use std::path::{Path, PathBuf};

use super::StubleConfig;

/// Which stub directory a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubRoot {
    Local,
    Global,
}

impl StubRoot {
    /// Split a `local:` or `global:` prefix off `query`.
    pub fn parse_query(query: &str) -> (Option<Self>, &str) {
        if let Some(name) = query.strip_prefix("local:") {
            (Some(StubRoot::Local), name)
        } else if let Some(name) = query.strip_prefix("global:") {
            (Some(StubRoot::Global), name)
        } else {
            (None, query)
        }
    }
}

impl StubleConfig {
    /// Resolve a stub name such as `model`, `local:crud/controller` or
    /// `global:readme.stub` to an existing file.
    ///
    /// Unprefixed names are looked up in the local directory first.
    pub fn find_stub(&self, query: &str) -> Option<PathBuf> {
        let (root, name) = StubRoot::parse_query(query);
        let name = self.with_extension(name.trim_start_matches('/'));

        let roots = match root {
            Some(StubRoot::Local) => vec![Some(self.local_root())],
            Some(StubRoot::Global) => vec![self.global_root()],
            None => vec![Some(self.local_root()), self.global_root()],
        };

        let found = roots
            .into_iter()
            .flatten()
            .map(|dir| dir.join(&name))
            .find(|path| path.is_file());
        tracing::debug!(query, found = ?found, "stub lookup");
        found
    }

    fn with_extension(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.extension().is_some_and(|ext| ext == self.extension.as_str()) {
            path.to_path_buf()
        } else {
            PathBuf::from(format!("{name}.{}", self.extension))
        }
    }
}
