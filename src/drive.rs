//! Google Drive gateway over plain HTTP.
//!
//! Fetches public drive objects with an API key via
//! `GET /drive/v3/files/{id}?alt=media`. The client is built per fetch and
//! every call is blocking, so this type must only be used from blocking
//! contexts (the download handler wraps it in `spawn_blocking`).

use std::fs;
use std::path::Path;
use std::time::Duration;

use filevault_core::{DriveGateway, FetchError};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// [`DriveGateway`] implementation against the Google Drive v3 API.
pub struct GoogleDriveGateway {
    api_key: String,
}

impl GoogleDriveGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl DriveGateway for GoogleDriveGateway {
    fn fetch(&self, remote_id: &str, destination: &Path) -> Result<(), FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let url = format!("{DRIVE_FILES_URL}/{remote_id}?alt=media&key={}", self.api_key);
        let response = client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Request(format!(
                "drive returned status {status} for {remote_id}"
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(destination, &bytes)?;
        Ok(())
    }
}
