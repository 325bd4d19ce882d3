pub mod camera;
pub mod detect;
pub mod live;
pub mod overlay;
pub mod settings;
pub mod speech;
pub mod upload;

use std::sync::Arc;

use detect::DetectClient;
use live::commands::{get_live_state, speak_caption, start_capture, stop_capture};
use live::LiveController;
use settings::{DetectorSettings, SettingsStore};
use speech::SpeechHandle;
use tauri::{Emitter, Manager, State};
use upload::commands::submit_image;

pub struct AppState {
    pub(crate) live: LiveController,
    pub(crate) speech: SpeechHandle,
    pub(crate) settings: Arc<SettingsStore>,
}

#[tauri::command]
fn get_settings(state: State<AppState>) -> Result<DetectorSettings, String> {
    Ok(state.settings.detector())
}

#[tauri::command]
fn set_settings(
    settings: DetectorSettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Lookout starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings = Arc::new(SettingsStore::new(settings_path)?);

                // Probe the backend once so a dead backend shows up in the
                // logs right away; both flows still work if it comes up later.
                let backend_url = settings.detector().backend_url;
                tauri::async_runtime::spawn(async move {
                    let client = DetectClient::new(&backend_url);
                    match client.check_status().await {
                        Ok(()) => log::info!("detection backend reachable at {}", backend_url),
                        Err(err) => log::warn!(
                            "detection backend not reachable at {}: {}",
                            backend_url,
                            err
                        ),
                    }
                });

                let live = LiveController::new(app.handle().clone(), settings.clone());
                let speech = SpeechHandle::new(settings.detector().speech);

                app.manage(AppState {
                    live,
                    speech,
                    settings,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_live_state,
            start_capture,
            stop_capture,
            speak_caption,
            submit_image,
            get_settings,
            set_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
