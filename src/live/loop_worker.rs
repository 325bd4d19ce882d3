use std::sync::Arc;

use anyhow::{Context, Result};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::camera::{CameraHandle, CapturedFrame};
use crate::detect::{DetectClient, DetectionResult};
use crate::overlay::{self, OverlayBox};

use super::state::LiveState;

const SAMPLE_INTERVAL_MS: u64 = 500;
const SAMPLE_TIMEOUT_SECS: u64 = 10;
const FRAME_JPEG_QUALITY: u8 = 80;

/// Payload of the `live-frame` event: the annotated frame as a JPEG data
/// URL, the rendered boxes with display labels, and the caption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFrameEvent {
    pub frame: String,
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<OverlayBox>,
    pub caption: String,
}

/// Sampler driving the live flow: every tick grabs one frame, posts it to
/// the backend, and emits the rendered result. Grab → post → render is
/// awaited sequentially, so frames are posted and rendered in firing order.
/// Cancellation also aborts a sample that is still in flight.
pub async fn detection_loop(
    session_id: String,
    camera: CameraHandle,
    client: DetectClient,
    state: Arc<Mutex<LiveState>>,
    app_handle: AppHandle,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(SAMPLE_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log::info!("detection loop shutting down for session {}", session_id);
                break;
            }
            _ = ticker.tick() => {
                let fut = sample_and_detect(&session_id, &camera, &client, &state, &app_handle);

                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        log::info!("detection loop cancelled mid-sample for session {}", session_id);
                        break;
                    }
                    outcome = tokio::time::timeout(Duration::from_secs(SAMPLE_TIMEOUT_SECS), fut) => {
                        match outcome {
                            Ok(Ok(())) => {}
                            // Errors skip the tick; the previous frame and caption stay up.
                            Ok(Err(err)) => log::error!(
                                "detection sample failed for session {}: {err:?}",
                                session_id
                            ),
                            Err(_) => log::warn!(
                                "detection sample timeout (> {}s) session {}",
                                SAMPLE_TIMEOUT_SECS,
                                session_id
                            ),
                        }
                    }
                }
            }
        }
    }
}

async fn sample_and_detect(
    session_id: &str,
    camera: &CameraHandle,
    client: &DetectClient,
    state: &Arc<Mutex<LiveState>>,
    app_handle: &AppHandle,
) -> Result<()> {
    let sample_start = Instant::now();

    let frame = camera.grab().await.context("frame grab failed")?;
    let grab_ms = sample_start.elapsed().as_millis();

    let post_start = Instant::now();
    let result = client
        .detect_frame(frame.jpeg.clone())
        .await
        .context("realtime detect request failed")?;
    let post_ms = post_start.elapsed().as_millis();

    let render_start = Instant::now();
    let event = tokio::task::spawn_blocking(move || render_frame(frame, &result))
        .await
        .context("render worker join failed")??;
    let render_ms = render_start.elapsed().as_millis();

    {
        let mut guard = state.lock().await;
        guard.set_caption(event.caption.clone());
    }

    let _ = app_handle.emit("live-frame", &event);

    log::info!(
        "sample completed in {}ms for session {} ({} boxes, grab: {}ms, post: {}ms, render: {}ms)",
        sample_start.elapsed().as_millis(),
        session_id,
        event.boxes.len(),
        grab_ms,
        post_ms,
        render_ms
    );

    Ok(())
}

/// Redraw the sampled frame with the response's boxes burned in. A response
/// without boxes still yields a fresh frame, which is what clears stale
/// overlays on the front-end.
fn render_frame(frame: CapturedFrame, result: &DetectionResult) -> Result<LiveFrameEvent> {
    let CapturedFrame {
        mut rgb,
        width,
        height,
        ..
    } = frame;

    let boxes = overlay::annotate(&mut rgb, result.boxes());

    let mut jpeg = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, FRAME_JPEG_QUALITY);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .context("failed to encode annotated frame")?;

    Ok(LiveFrameEvent {
        frame: format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(&jpeg)),
        width,
        height,
        boxes,
        caption: result.caption().to_string(),
    })
}
