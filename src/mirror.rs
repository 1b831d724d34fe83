use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::MirrorConfig;
use crate::error::MaintError;

pub trait MirrorClient: Send + Sync {
    fn download_package(&self, apk_name: &str, destination: &Path) -> Result<(), MaintError>;
}

#[derive(Clone)]
pub struct MirrorHttpClient {
    client: Client,
    base_url: String,
}

impl MirrorHttpClient {
    pub fn new(config: &MirrorConfig) -> Result<Self, MaintError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("fdroid-maint/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| MaintError::MirrorHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| MaintError::MirrorHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn package_url(&self, apk_name: &str) -> String {
        format!("{}/{}", self.base_url, apk_name)
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, MaintError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "mirror request failed".to_string());
        Err(MaintError::MirrorStatus { status, message })
    }
}

impl MirrorClient for MirrorHttpClient {
    fn download_package(&self, apk_name: &str, destination: &Path) -> Result<(), MaintError> {
        let url = self.package_url(apk_name);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| MaintError::MirrorHttp(err.to_string()))?;
        let mut response = Self::handle_status(response)?;
        let mut file =
            File::create(destination).map_err(|err| MaintError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| MaintError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_url_joins_base_and_name() {
        let config =
            MirrorConfig::resolve(Some("https://mirror.example.org/fdroid/repo/".to_string()))
                .unwrap();
        let client = MirrorHttpClient::new(&config).unwrap();
        assert_eq!(
            client.package_url("org.example_1.apk"),
            "https://mirror.example.org/fdroid/repo/org.example_1.apk"
        );
    }
}
