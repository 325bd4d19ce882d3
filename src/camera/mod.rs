use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbImage};
use tokio::sync::oneshot;
use v4l::format::FourCC;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::Device;

use crate::settings::CameraSettings;

const CAPTURE_BUFFERS: u32 = 4;
const JPEG_QUALITY: u8 = 80;

/// One frame sampled from the camera: decoded RGB pixels for overlay
/// drawing plus the JPEG bytes sent to the backend.
pub struct CapturedFrame {
    pub rgb: RgbImage,
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

enum CameraCommand {
    Grab(oneshot::Sender<Result<CapturedFrame>>),
}

/// Handle to a dedicated capture thread owning the V4L2 device and its
/// memory-mapped stream (neither is `Send`). Dropping the handle closes the
/// command channel; the thread then exits and releases the device.
pub struct CameraHandle {
    tx: Sender<CameraCommand>,
}

impl CameraHandle {
    /// Spawn the capture thread and wait for it to open the device. Open
    /// failures (missing device, permissions, unsupported format) are
    /// reported here, before any sampling starts.
    pub async fn open(settings: CameraSettings) -> Result<Self> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || camera_thread(settings, ready_tx, rx))
            .context("failed to spawn camera capture thread")?;

        ready_rx
            .await
            .context("camera worker exited before reporting status")??;

        Ok(Self { tx })
    }

    /// Grab the next frame. Serialized on the capture thread; one frame is
    /// served at a time.
    pub async fn grab(&self) -> Result<CapturedFrame> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(CameraCommand::Grab(reply_tx))
            .map_err(|_| anyhow!("camera worker is gone"))?;
        reply_rx
            .await
            .context("camera worker dropped the grab reply")?
    }
}

fn camera_thread(
    settings: CameraSettings,
    ready_tx: oneshot::Sender<Result<()>>,
    rx: Receiver<CameraCommand>,
) {
    let opened = open_device(&settings);
    let (dev, fourcc, width, height) = match opened {
        Ok(parts) => parts,
        Err(err) => {
            let _ = ready_tx.send(Err(err));
            return;
        }
    };

    let mut stream = match Stream::with_buffers(&dev, v4l::buffer::Type::VideoCapture, CAPTURE_BUFFERS)
    {
        Ok(stream) => stream,
        Err(err) => {
            let _ = ready_tx.send(Err(anyhow!("failed to start capture stream: {err}")));
            return;
        }
    };

    let _ = ready_tx.send(Ok(()));
    log::info!(
        "camera opened: {} {}x{} [{}] at {} fps",
        settings.device_path,
        width,
        height,
        fourcc,
        settings.fps
    );

    while let Ok(CameraCommand::Grab(reply)) = rx.recv() {
        let _ = reply.send(next_frame(&mut stream, fourcc, width, height));
    }

    log::info!("camera worker shutting down, releasing {}", settings.device_path);
}

fn open_device(settings: &CameraSettings) -> Result<(Device, FourCC, u32, u32)> {
    let dev = Device::with_path(&settings.device_path)
        .with_context(|| format!("failed to open camera {}", settings.device_path))?;

    let fourcc_bytes = settings.fourcc.as_bytes();
    if fourcc_bytes.len() != 4 {
        return Err(anyhow!("fourcc must be exactly 4 characters"));
    }

    let mut fmt = dev.format()?;
    fmt.fourcc = FourCC::new(&[
        fourcc_bytes[0],
        fourcc_bytes[1],
        fourcc_bytes[2],
        fourcc_bytes[3],
    ]);
    fmt.width = settings.width;
    fmt.height = settings.height;

    // The driver may adjust to the nearest supported mode.
    let actual = dev.set_format(&fmt)?;

    let mut params = dev.params()?;
    params.interval.numerator = 1;
    params.interval.denominator = settings.fps;
    let _ = dev.set_params(&params);

    Ok((dev, actual.fourcc, actual.width, actual.height))
}

fn next_frame(
    stream: &mut Stream<'_>,
    fourcc: FourCC,
    width: u32,
    height: u32,
) -> Result<CapturedFrame> {
    let (data, _meta) = stream.next().context("camera read failed")?;
    let fourcc_str = fourcc.str().map_err(|_| anyhow!("invalid fourcc"))?;

    match fourcc_str {
        // MJPG frames are already JPEG; decode a copy for overlay drawing.
        "MJPG" => {
            let rgb = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
                .context("failed to decode MJPG frame")?
                .to_rgb8();
            Ok(CapturedFrame {
                jpeg: data.to_vec(),
                width: rgb.width(),
                height: rgb.height(),
                rgb,
            })
        }
        "YUYV" => {
            let rgb = yuyv_to_rgb(data, width, height);
            let mut jpeg = Vec::new();
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
            encoder
                .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
                .context("failed to encode frame as JPEG")?;
            Ok(CapturedFrame {
                rgb,
                jpeg,
                width,
                height,
            })
        }
        other => Err(anyhow!("camera format {other} is not supported")),
    }
}

/// Convert a packed YUYV (YUV 4:2:2) buffer to RGB using BT.601 weights.
/// Every 4-byte group carries two pixels sharing one chroma pair.
fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> RgbImage {
    let mut out = RgbImage::new(width, height);

    for (i, group) in yuyv.chunks_exact(4).enumerate() {
        let u = group[1] as f32 - 128.0;
        let v = group[3] as f32 - 128.0;

        let first = i as u32 * 2;
        let x = first % width;
        let y = first / width;
        if y >= height {
            break;
        }

        for (offset, &luma) in [group[0], group[2]].iter().enumerate() {
            let px = x + offset as u32;
            if px >= width {
                continue;
            }
            let luma = luma as f32;
            let r = (luma + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (luma - 0.344_136 * u - 0.714_136 * v).clamp(0.0, 255.0) as u8;
            let b = (luma + 1.772 * u).clamp(0.0, 255.0) as u8;
            out.put_pixel(px, y, image::Rgb([r, g, b]));
        }
    }

    out
}
