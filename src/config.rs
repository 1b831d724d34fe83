use std::env;

use crate::error::MaintError;

pub const REPO_URL_ENV: &str = "FDROID_REPO_URL";

/// Remote mirror settings for the restore operation. The base URL is the
/// only required input and comes from the environment.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    base_url: String,
}

impl MirrorConfig {
    pub fn from_env() -> Result<Self, MaintError> {
        Self::resolve(env::var(REPO_URL_ENV).ok())
    }

    pub fn resolve(value: Option<String>) -> Result<Self, MaintError> {
        let raw = value.ok_or_else(|| MaintError::MissingRepoUrl(REPO_URL_ENV.to_string()))?;
        Ok(Self {
            base_url: raw.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
