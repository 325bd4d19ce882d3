use image::{Rgb, RgbImage};
use serde::Serialize;

use crate::detect::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: u32 = 2;

/// A box in absolute pixel coordinates, guaranteed to lie within the frame
/// it was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// One rendered overlay entry: the pixel rectangle plus its display label.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayBox {
    pub rect: PixelRect,
    pub label: String,
}

/// Convert a normalized box into pixel coordinates against the given frame
/// dimensions, clamped to the frame bounds. Returns `None` for boxes that
/// end up with no visible area.
pub fn pixel_rect(bbox: &BoundingBox, width: u32, height: u32) -> Option<PixelRect> {
    if width == 0 || height == 0 {
        return None;
    }

    let clamp = |v: f32, max: u32| -> u32 { (v.max(0.0) as u32).min(max.saturating_sub(1)) };
    let x = clamp(bbox.x * width as f32, width);
    let y = clamp(bbox.y * height as f32, height);
    let w = ((bbox.w * width as f32).max(0.0) as u32).min(width - x);
    let h = ((bbox.h * height as f32).max(0.0) as u32).min(height - y);

    if w == 0 || h == 0 {
        return None;
    }
    Some(PixelRect { x, y, w, h })
}

/// Draw a rectangle border with the given thickness. Coordinates outside the
/// image are skipped rather than wrapped.
pub fn draw_rect(img: &mut RgbImage, rect: &PixelRect, color: Rgb<u8>, thickness: u32) {
    let (width, height) = img.dimensions();
    let x1 = rect.x.saturating_add(rect.w.saturating_sub(1));
    let y1 = rect.y.saturating_add(rect.h.saturating_sub(1));

    for t in 0..thickness {
        let left = rect.x.saturating_add(t);
        let top = rect.y.saturating_add(t);
        let right = x1.saturating_sub(t);
        let bottom = y1.saturating_sub(t);
        if left > right || top > bottom || left >= width || top >= height {
            continue;
        }

        for x in left..=right.min(width - 1) {
            img.put_pixel(x, top, color);
            if bottom < height {
                img.put_pixel(x, bottom, color);
            }
        }
        for y in top..=bottom.min(height - 1) {
            img.put_pixel(left, y, color);
            if right < width {
                img.put_pixel(right, y, color);
            }
        }
    }
}

/// Draw every valid box onto the frame and return the overlay entries with
/// their display labels. An empty (or entirely invalid) box list leaves the
/// frame untouched.
pub fn annotate(frame: &mut RgbImage, boxes: &[BoundingBox]) -> Vec<OverlayBox> {
    let (width, height) = frame.dimensions();
    let mut rendered = Vec::with_capacity(boxes.len());

    for bbox in boxes {
        let Some(rect) = pixel_rect(bbox, width, height) else {
            continue;
        };
        draw_rect(frame, &rect, BOX_COLOR, BOX_THICKNESS);
        rendered.push(OverlayBox {
            rect,
            label: bbox.label_text(),
        });
    }

    rendered
}
