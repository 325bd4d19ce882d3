use std::time::Duration;

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use super::types::{DetectionResult, UploadResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User-facing message for a submission without a selected image.
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image!";

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("{MISSING_IMAGE_MESSAGE}")]
    MissingImage,
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("detection request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thin HTTP client for the external detection backend.
///
/// The backend is treated as opaque: 4xx/5xx bodies are parsed like any
/// other response, so a backend error simply yields a result with no boxes
/// and no caption. Only transport and JSON failures surface as errors.
pub struct DetectClient {
    http: reqwest::Client,
    base_url: String,
}

impl DetectClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one live frame (already JPEG-encoded) for detection.
    pub async fn detect_frame(&self, jpeg: Vec<u8>) -> Result<DetectionResult, DetectError> {
        let part = Part::bytes(jpeg)
            .file_name("frame.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("frame", part);

        let result = self
            .http
            .post(self.endpoint("/api/realtime-detect"))
            .multipart(form)
            .send()
            .await?
            .json::<DetectionResult>()
            .await?;

        Ok(result)
    }

    /// Send a user-selected image file for detection.
    pub async fn detect_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResult, DetectError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("image", part);

        let result = self
            .http
            .post(self.endpoint("/api/detect"))
            .multipart(form)
            .send()
            .await?
            .json::<UploadResult>()
            .await?;

        Ok(result)
    }

    /// Probe the backend health endpoint. Used once at startup to log
    /// whether the backend is reachable; failures are not fatal.
    pub async fn check_status(&self) -> Result<(), DetectError> {
        self.http
            .get(self.endpoint("/api/realtime-status"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = DetectClient::new("http://127.0.0.1:5000/");
        assert_eq!(
            client.endpoint("/api/detect"),
            "http://127.0.0.1:5000/api/detect"
        );
    }
}
