pub mod commands;

use std::path::Path;

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::detect::{DetectClient, DetectError};

/// Payload of the `upload-preview` event: the selected image as a data URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreviewEvent {
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub caption: String,
}

/// Reject a submission with no usable file before any network activity.
pub fn validate_selection(image_path: &str) -> Result<(), DetectError> {
    if image_path.is_empty() || !Path::new(image_path).is_file() {
        return Err(DetectError::MissingImage);
    }
    Ok(())
}

/// MIME type for the preview data URL, guessed from the file extension.
pub fn preview_mime(image_path: &str) -> &'static str {
    let ext = Path::new(image_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Submit one image to the backend and return its caption.
///
/// The preview encoding and the detection request are two independent
/// operations run concurrently: the `upload-preview` event fires as soon as
/// the encoding is ready, regardless of where the request stands. Transport
/// failures propagate to the caller unhandled.
pub async fn submit(
    client: &DetectClient,
    app_handle: &AppHandle,
    image_path: &str,
) -> Result<UploadOutcome, DetectError> {
    validate_selection(image_path)?;

    let path = Path::new(image_path);
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    let mime = preview_mime(image_path);
    let preview_bytes = bytes.clone();
    let preview = async {
        match tokio::task::spawn_blocking(move || BASE64_STANDARD.encode(&preview_bytes)).await {
            Ok(encoded) => {
                let event = UploadPreviewEvent {
                    image: format!("data:{};base64,{}", mime, encoded),
                };
                let _ = app_handle.emit("upload-preview", event);
            }
            Err(err) => log::warn!("preview encode worker join failed: {err}"),
        }
    };

    let request = client.detect_image(&file_name, bytes);
    let (_, response) = tokio::join!(preview, request);
    let response = response?;

    Ok(UploadOutcome {
        caption: response.caption_or_default(),
    })
}
