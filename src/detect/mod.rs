pub mod client;
pub mod types;

pub use client::{DetectClient, DetectError, MISSING_IMAGE_MESSAGE};
pub use types::{BoundingBox, DetectionResult, UploadResult, NO_OBJECTS_CAPTION};
