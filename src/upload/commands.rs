use tauri::{AppHandle, State};

use crate::detect::DetectClient;
use crate::upload::{submit, UploadOutcome};
use crate::AppState;

#[tauri::command]
pub async fn submit_image(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    image_path: String,
) -> Result<UploadOutcome, String> {
    let detector = state.settings.detector();
    let client = DetectClient::new(&detector.backend_url);

    submit(&client, &app_handle, &image_path)
        .await
        .map_err(|e| e.to_string())
}
