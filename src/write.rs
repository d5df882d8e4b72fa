//! Writing rendered stubs to disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stuble::stub::AppendDirective;

/// What to do when the save path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingPolicy {
    #[default]
    Refuse,
    Overwrite,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    Skipped,
    Appended,
}

impl WriteOutcome {
    pub fn label(self) -> &'static str {
        match self {
            WriteOutcome::Created => "create",
            WriteOutcome::Overwritten => "overwrite",
            WriteOutcome::Skipped => "skip",
            WriteOutcome::Appended => "append",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("file '{0}' already exists (pass --overwrite or --skip-exists)")]
    Exists(PathBuf),

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Join a save path from front matter onto the output directory.
pub fn destination(output_dir: &Path, save_path: &str) -> PathBuf {
    output_dir.join(save_path.trim_start_matches('/'))
}

async fn ensure_parent(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(io_error(parent))?;
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
pub async fn save(
    path: &Path,
    content: &str,
    policy: ExistingPolicy,
) -> Result<WriteOutcome, WriteError> {
    let exists = tokio::fs::try_exists(path).await.map_err(io_error(path))?;
    let outcome = match (exists, policy) {
        (false, _) => WriteOutcome::Created,
        (true, ExistingPolicy::Skip) => return Ok(WriteOutcome::Skipped),
        (true, ExistingPolicy::Refuse) => return Err(WriteError::Exists(path.to_path_buf())),
        (true, ExistingPolicy::Overwrite) => WriteOutcome::Overwritten,
    };

    ensure_parent(path).await?;
    tokio::fs::write(path, content)
        .await
        .map_err(io_error(path))?;
    tracing::debug!(path = %path.display(), ?outcome, "wrote file");
    Ok(outcome)
}

/// Insert `content` into `path` as `directive` describes.
pub async fn append(
    path: &Path,
    directive: &AppendDirective,
    content: &str,
) -> Result<WriteOutcome, WriteError> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(existing) => Some(existing),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(io_error(path)(e)),
    };

    let updated = directive.apply(existing.as_deref(), content);
    ensure_parent(path).await?;
    tokio::fs::write(path, updated)
        .await
        .map_err(io_error(path))?;
    tracing::debug!(path = %path.display(), position = ?directive.position, "appended");
    Ok(WriteOutcome::Appended)
}

#[cfg(test)]
mod tests {
    use stuble::stub::AppendPosition;

    use super::*;

    #[test]
    fn test_destination() {
        let out = Path::new("/work");
        assert_eq!(destination(out, "app/a.txt"), PathBuf::from("/work/app/a.txt"));
        assert_eq!(destination(out, "/app/a.txt"), PathBuf::from("/work/app/a.txt"));
    }

    #[tokio::test]
    async fn test_save_policies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/out.txt");

        let outcome = save(&path, "one", ExistingPolicy::Refuse).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Created);

        let err = save(&path, "two", ExistingPolicy::Refuse).await.unwrap_err();
        assert!(matches!(err, WriteError::Exists(_)));

        let outcome = save(&path, "two", ExistingPolicy::Skip).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");

        let outcome = save(&path, "three", ExistingPolicy::Overwrite).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Overwritten);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three");
    }

    #[tokio::test]
    async fn test_append_to_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.txt");
        std::fs::write(&path, "a\nMARK\nb").unwrap();

        let directive = AppendDirective {
            file: Some("routes.txt".into()),
            position: AppendPosition::Before("MARK".into()),
        };
        append(&path, &directive, "X").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nX\nMARK\nb");

        let missing = dir.path().join("new/list.txt");
        let directive = AppendDirective {
            file: None,
            position: AppendPosition::After("MARK".into()),
        };
        let outcome = append(&missing, &directive, "X").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Appended);
        assert_eq!(std::fs::read_to_string(&missing).unwrap(), "MARK\nX");
    }
}
