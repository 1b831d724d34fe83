use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;

use crate::error::MaintError;

/// The local repository directory. Downloads accumulate here, one file per
/// package filename; existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct RepoStore {
    root: Utf8PathBuf,
}

impl RepoStore {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn ensure_root(&self) -> Result<(), MaintError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| MaintError::Filesystem(err.to_string()))
    }

    pub fn package_path(&self, apk_name: &str) -> Utf8PathBuf {
        self.root.join(apk_name)
    }

    pub fn package_exists(&self, apk_name: &str) -> bool {
        self.package_path(apk_name).as_std_path().exists()
    }

    /// Temp file in the store root for an in-flight download. Staying on the
    /// same filesystem keeps the final persist a rename.
    pub fn stage_download(&self) -> Result<NamedTempFile, MaintError> {
        tempfile::Builder::new()
            .prefix(".fdroid-maint")
            .tempfile_in(self.root.as_std_path())
            .map_err(|err| MaintError::Filesystem(err.to_string()))
    }

    pub fn persist_package(
        &self,
        staged: NamedTempFile,
        apk_name: &str,
    ) -> Result<Utf8PathBuf, MaintError> {
        let dest = self.package_path(apk_name);
        staged
            .persist(dest.as_std_path())
            .map_err(|err| MaintError::Filesystem(err.to_string()))?;
        Ok(dest)
    }
}
