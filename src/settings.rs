use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub device_path: String,
    pub fourcc: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_path: "/dev/video0".into(),
            fourcc: "MJPG".into(),
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub piper_bin: String,
    pub voice_model: String,
    pub sample_rate: u32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            piper_bin: "piper".into(),
            voice_model: "voices/en_US-lessac-medium.onnx".into(),
            sample_rate: 22050,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub backend_url: String,
    pub camera: CameraSettings,
    pub speech: SpeechSettings,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".into(),
            camera: CameraSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<DetectorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            DetectorSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn detector(&self) -> DetectorSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: DetectorSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &DetectorSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
