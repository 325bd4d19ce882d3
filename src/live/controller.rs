use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::camera::CameraHandle;
use crate::detect::DetectClient;
use crate::settings::SettingsStore;

use super::loop_worker::detection_loop;
use super::state::LiveState;

#[derive(Serialize, Clone)]
struct LiveStateChangedEvent {
    state: LiveState,
}

struct LiveWorker {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Lifecycle owner of the live detection flow. All session-scoped resources
/// (camera handle, sampler task, cancellation token) are created in
/// `start_capture` and torn down in `stop_capture`, so nothing leaks across
/// sessions.
#[derive(Clone)]
pub struct LiveController {
    state: Arc<Mutex<LiveState>>,
    worker: Arc<Mutex<Option<LiveWorker>>>,
    app_handle: AppHandle,
    settings: Arc<SettingsStore>,
}

impl LiveController {
    pub fn new(app_handle: AppHandle, settings: Arc<SettingsStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LiveState::new())),
            worker: Arc::new(Mutex::new(None)),
            app_handle,
            settings,
        }
    }

    pub async fn get_state(&self) -> LiveState {
        self.state.lock().await.clone()
    }

    pub async fn current_caption(&self) -> String {
        self.state.lock().await.caption.clone()
    }

    /// Open the camera and arm the sampler. Camera failures (no device,
    /// permission denied) propagate to the caller; nothing is retried.
    /// Rejects while already running, so repeated starts can never arm a
    /// second sampler.
    pub async fn start_capture(&self) -> Result<LiveState> {
        // Hold the worker slot for the whole start so two concurrent starts
        // cannot both pass the guard.
        let mut worker_guard = self.worker.lock().await;
        if worker_guard.is_some() {
            bail!("capture already active");
        }

        let detector = self.settings.detector();
        let camera = CameraHandle::open(detector.camera).await?;
        let client = DetectClient::new(&detector.backend_url);

        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        log::info!("starting live capture session {}", session_id);

        {
            let mut state = self.state.lock().await;
            state.begin_session(session_id.clone(), started_at);
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(detection_loop(
            session_id,
            camera,
            client,
            self.state.clone(),
            self.app_handle.clone(),
            cancel_token.clone(),
        ));

        *worker_guard = Some(LiveWorker {
            cancel_token,
            handle,
        });
        drop(worker_guard);

        self.emit_state_changed().await;
        Ok(self.get_state().await)
    }

    /// Cancel the sampler and release the camera. The cancellation token
    /// also aborts an in-flight detection request, so no stale response is
    /// rendered after this returns. Stopping while idle is a no-op.
    pub async fn stop_capture(&self) -> Result<()> {
        let worker = self.worker.lock().await.take();
        let Some(worker) = worker else {
            return Ok(());
        };

        worker.cancel_token.cancel();
        worker
            .handle
            .await
            .context("detection loop task failed to join")?;

        {
            let mut state = self.state.lock().await;
            state.stop();
        }

        self.emit_state_changed().await;
        Ok(())
    }

    async fn emit_state_changed(&self) {
        let state = self.state.lock().await.clone();
        let _ = self
            .app_handle
            .emit("live-state-changed", LiveStateChangedEvent { state });
    }
}
