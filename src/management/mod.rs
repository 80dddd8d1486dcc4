mod auth;
mod image;
mod status;

pub use auth::AuthManager;
pub use image::ImageCache;
pub use status::StatusManager;

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::Res;

/// Reads a JSON cache file. A missing file is not an error.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Res<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = async_fs::read_to_string(path).await?;
    let value = serde_json::from_str(&content)?;
    tracing::debug!("read cache file {}", path.display());
    Ok(Some(value))
}

/// Overwrites a JSON cache file, creating the cache directory on demand.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Res<()> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string(value)?;
    async_fs::write(path, json).await?;
    tracing::debug!("wrote cache file {}", path.display());
    Ok(())
}
