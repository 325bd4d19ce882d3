use serde::{Deserialize, Serialize};

/// Caption shown when the backend returns no caption for an uploaded image.
pub const NO_OBJECTS_CAPTION: &str = "No objects detected.";

/// One detected object, as returned by the backend. Coordinates are
/// fractions of the frame dimensions in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub label: String,
    pub score: f32,
}

impl BoundingBox {
    /// Overlay text for this box: class name plus confidence as a
    /// round-to-nearest integer percentage, e.g. "person 95%".
    pub fn label_text(&self) -> String {
        format!("{} {}%", self.label, (self.score * 100.0).round() as i64)
    }
}

/// Response body of `/api/realtime-detect`. Both fields are optional; the
/// backend may also send extra fields (`labels`, `count`) which are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub boxes: Option<Vec<BoundingBox>>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl DetectionResult {
    pub fn boxes(&self) -> &[BoundingBox] {
        self.boxes.as_deref().unwrap_or_default()
    }

    pub fn caption(&self) -> &str {
        self.caption.as_deref().unwrap_or_default()
    }
}

/// Response body of `/api/detect`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub caption: Option<String>,
}

impl UploadResult {
    /// The caption to display, falling back to [`NO_OBJECTS_CAPTION`] when
    /// the backend returned none (or an empty one).
    pub fn caption_or_default(&self) -> String {
        match self.caption.as_deref() {
            Some(caption) if !caption.is_empty() => caption.to_string(),
            _ => NO_OBJECTS_CAPTION.to_string(),
        }
    }
}
