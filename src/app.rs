use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MaintError;
use crate::index::RepoIndex;
use crate::mirror::MirrorClient;
use crate::store::RepoStore;

#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub items: Vec<RestoreItemResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreItemResult {
    pub apk_name: String,
    pub action: String,
    pub path: Option<String>,
}

#[derive(Clone)]
pub struct App<M: MirrorClient> {
    store: RepoStore,
    mirror: M,
}

impl<M: MirrorClient> App<M> {
    pub fn new(store: RepoStore, mirror: M) -> Self {
        Self { store, mirror }
    }

    /// Best-effort restore of every package the index references. Packages
    /// already present are left untouched; each download failure is recorded
    /// and the loop moves on. Only store setup can fail here, so an
    /// unreachable mirror still produces a successful, possibly empty run.
    pub fn restore(&self, index: &RepoIndex) -> Result<RestoreResult, MaintError> {
        let names = index.apk_names();
        self.store.ensure_root()?;

        let mut items = Vec::new();
        for name in &names {
            if !is_safe_name(name) {
                warn!(apk_name = %name, "refusing package filename with path separators");
                items.push(RestoreItemResult {
                    apk_name: name.clone(),
                    action: "failed".to_string(),
                    path: None,
                });
                continue;
            }

            if self.store.package_exists(name) {
                debug!(apk_name = %name, "already present, skipping");
                items.push(RestoreItemResult {
                    apk_name: name.clone(),
                    action: "present".to_string(),
                    path: Some(self.store.package_path(name).to_string()),
                });
                continue;
            }

            match self.fetch_package(name) {
                Ok(path) => {
                    debug!(apk_name = %name, "downloaded");
                    items.push(RestoreItemResult {
                        apk_name: name.clone(),
                        action: "download".to_string(),
                        path: Some(path.to_string()),
                    });
                }
                Err(err) => {
                    warn!(apk_name = %name, error = %err, "package download failed");
                    items.push(RestoreItemResult {
                        apk_name: name.clone(),
                        action: "failed".to_string(),
                        path: None,
                    });
                }
            }
        }

        Ok(RestoreResult { items })
    }

    fn fetch_package(&self, apk_name: &str) -> Result<Utf8PathBuf, MaintError> {
        let staged = self.store.stage_download()?;
        self.mirror.download_package(apk_name, staged.path())?;
        self.store.persist_package(staged, apk_name)
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_name_rejects_separators() {
        assert!(is_safe_name("org.example_1.apk"));
        assert!(!is_safe_name("../escape.apk"));
        assert!(!is_safe_name("nested/dir.apk"));
        assert!(!is_safe_name(".."));
    }
}
