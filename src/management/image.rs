use std::path::{Path, PathBuf};

use crate::Res;

/// Cover images keyed by the uri of the item they belong to. Images never
/// change once fetched, so an existing file is always reused.
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            dir: cache_dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, uri: &str) -> PathBuf {
        self.dir.join(format!("{uri}-image"))
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.path_for(uri).is_file()
    }

    pub async fn store(&self, uri: &str, bytes: &[u8]) -> Res<PathBuf> {
        async_fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(uri);
        async_fs::write(&path, bytes).await?;
        tracing::debug!("cached image {}", path.display());
        Ok(path)
    }
}
