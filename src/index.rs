use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::MaintError;

/// The parts of an index-v1 document this tool cares about. Real indexes
/// carry many more fields per record; everything unknown is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RepoIndex {
    #[serde(default)]
    pub apps: Vec<AppRecord>,
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<PackageRecord>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppRecord {
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PackageRecord {
    #[serde(default, rename = "apkName")]
    pub apk_name: Option<String>,
}

impl RepoIndex {
    /// Union of non-empty `apkName` values across both index locations,
    /// deduplicated and in sorted order.
    pub fn apk_names(&self) -> BTreeSet<String> {
        let app_packages = self.apps.iter().flat_map(|app| app.packages.iter());
        let keyed_packages = self.packages.values().flatten();
        app_packages
            .chain(keyed_packages)
            .filter_map(|package| package.apk_name.as_deref())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .collect()
    }
}

pub struct IndexLoader;

impl IndexLoader {
    pub fn load(path: &Path) -> Result<RepoIndex, MaintError> {
        let content =
            fs::read_to_string(path).map_err(|_| MaintError::IndexRead(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| MaintError::IndexParse(err.to_string()))
    }
}
