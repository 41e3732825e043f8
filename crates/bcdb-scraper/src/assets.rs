//! Logo image cache keyed by file name.

use std::path::{Path, PathBuf};

use crate::client::SourceClient;
use crate::error::ScraperError;

/// Downloads images into a local directory at most once per file name and
/// hands back the path the app should reference.
///
/// Two brands pointing at different URLs with the same final file name
/// share one file.
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
    public_prefix: String,
}

impl AssetCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_owned(),
        }
    }

    /// Local file name for `url`: the last path segment without query,
    /// keeping only `[A-Za-z0-9_.-]`. `None` when nothing usable is left.
    #[must_use]
    pub fn file_name_for(url: &str) -> Option<String> {
        let last = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default();
        let name: String = last
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            .collect();
        (!name.is_empty() && name.chars().any(|c| c != '.')).then_some(name)
    }

    /// Returns the public path of the image at `url`, downloading it first
    /// when no file of that name exists yet.
    ///
    /// Downloads land in a `.part` file that is renamed into place, so an
    /// interrupted write never leaves a truncated image under the final name.
    ///
    /// Returns `Ok(None)` when `url` has no usable file name.
    ///
    /// # Errors
    ///
    /// Propagates [`ScraperError`] from the download and
    /// [`ScraperError::Io`] when the file cannot be written.
    pub async fn fetch_or_reuse(
        &self,
        client: &SourceClient,
        url: &str,
    ) -> Result<Option<String>, ScraperError> {
        let Some(file_name) = Self::file_name_for(url) else {
            return Ok(None);
        };
        let local_path = self.dir.join(&file_name);
        let public_path = format!("{}/{}", self.public_prefix, file_name);

        if tokio::fs::try_exists(&local_path).await.unwrap_or(false) {
            tracing::debug!(file = %file_name, "asset already cached");
            return Ok(Some(public_path));
        }

        let bytes = client.get_bytes(url).await?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(&self.dir, source))?;
        let temp_path = self.dir.join(format!("{file_name}.part"));
        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|source| io_error(&temp_path, source))?;
        tokio::fs::rename(&temp_path, &local_path)
            .await
            .map_err(|source| io_error(&local_path, source))?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "asset downloaded");
        Ok(Some(public_path))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ScraperError {
    ScraperError::Io {
        path: path.display().to_string(),
        source,
    }
}
