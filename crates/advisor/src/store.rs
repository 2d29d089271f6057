//! Result persistence — write the final advisory text to disk.

use std::path::{Path, PathBuf};

/// Persists the disclaimed advisory result as a plain-text document.
/// Each successful run overwrites the prior result.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `text` to the result path, creating parent directories as
    /// needed and replacing any prior result.
    pub async fn persist(&self, text: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await
    }
}
