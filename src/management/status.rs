use std::path::{Path, PathBuf};

use crate::{Res, types::Status};

const FILE_NAME: &str = "status";

/// The `status` cache file holding the last playback state seen by the
/// spotifyd hook. Last writer wins.
pub struct StatusManager {
    path: PathBuf,
}

impl StatusManager {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(FILE_NAME),
        }
    }

    pub async fn load(&self) -> Res<Option<Status>> {
        super::read_json(&self.path).await
    }

    pub async fn persist(&self, status: &Status) -> Res<()> {
        super::write_json(&self.path, status).await
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
