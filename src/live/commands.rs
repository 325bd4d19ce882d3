use tauri::State;

use crate::live::{LiveController, LiveState};
use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> LiveController {
    state.live.clone()
}

#[tauri::command]
pub async fn get_live_state(state: State<'_, AppState>) -> Result<LiveState, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_state().await)
}

#[tauri::command]
pub async fn start_capture(state: State<'_, AppState>) -> Result<LiveState, String> {
    let controller = controller_from_state(&state);
    controller.start_capture().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_capture(state: State<'_, AppState>) -> Result<(), String> {
    let controller = controller_from_state(&state);
    controller.stop_capture().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn speak_caption(state: State<'_, AppState>) -> Result<(), String> {
    let caption = state.live.current_caption().await;
    if caption.is_empty() {
        // Nothing received yet; the trigger is a no-op rather than an error.
        return Ok(());
    }
    state.speech.speak(&caption)
}
