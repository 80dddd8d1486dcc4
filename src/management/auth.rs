use std::path::{Path, PathBuf};

use crate::{Res, types::Authentication};

const FILE_NAME: &str = "authentication";

/// The `authentication` cache file.
pub struct AuthManager {
    path: PathBuf,
}

impl AuthManager {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(FILE_NAME),
        }
    }

    pub async fn load(&self) -> Res<Option<Authentication>> {
        super::read_json(&self.path).await
    }

    pub async fn persist(&self, authentication: &Authentication) -> Res<()> {
        super::write_json(&self.path, authentication).await
    }
}
