use image::{Rgb, RgbImage};
use lookout_lib::detect::BoundingBox;
use lookout_lib::overlay::{annotate, draw_rect, pixel_rect, PixelRect};

fn bbox(x: f32, y: f32, w: f32, h: f32, label: &str, score: f32) -> BoundingBox {
    BoundingBox {
        x,
        y,
        w,
        h,
        label: label.to_string(),
        score,
    }
}

#[test]
fn normalized_box_maps_to_pixels() {
    let rect = pixel_rect(&bbox(0.1, 0.1, 0.2, 0.2, "person", 0.95), 640, 480).expect("rect");
    assert_eq!(
        rect,
        PixelRect {
            x: 64,
            y: 48,
            w: 128,
            h: 96
        }
    );
}

#[test]
fn rects_stay_within_frame_bounds() {
    // Box overhanging the right/bottom edge gets clipped, not wrapped.
    let rect = pixel_rect(&bbox(0.9, 0.85, 0.2, 0.3, "person", 0.5), 640, 480).expect("rect");
    assert!(rect.x + rect.w <= 640);
    assert!(rect.y + rect.h <= 480);
    assert_eq!(rect.x, 576);
    assert_eq!(rect.w, 64);
}

#[test]
fn degenerate_boxes_are_dropped() {
    assert!(pixel_rect(&bbox(0.5, 0.5, 0.0, 0.2, "cat", 0.5), 640, 480).is_none());
    assert!(pixel_rect(&bbox(0.5, 0.5, 0.2, 0.2, "cat", 0.5), 0, 0).is_none());
}

#[test]
fn label_text_rounds_confidence_to_nearest_percent() {
    assert_eq!(
        bbox(0.0, 0.0, 1.0, 1.0, "person", 0.876).label_text(),
        "person 88%"
    );
    assert_eq!(
        bbox(0.0, 0.0, 1.0, 1.0, "person", 0.95).label_text(),
        "person 95%"
    );
}

#[test]
fn annotate_without_boxes_leaves_frame_untouched() {
    let mut frame = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
    let reference = frame.clone();

    let rendered = annotate(&mut frame, &[]);

    assert!(rendered.is_empty());
    assert_eq!(frame.as_raw(), reference.as_raw());
}

#[test]
fn annotate_draws_box_and_returns_label() {
    let mut frame = RgbImage::new(40, 40);
    let rendered = annotate(&mut frame, &[bbox(0.125, 0.125, 0.25, 0.25, "person", 0.95)]);

    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].label, "person 95%");
    assert_eq!(
        rendered[0].rect,
        PixelRect {
            x: 5,
            y: 5,
            w: 10,
            h: 10
        }
    );

    // Expect the four corners of the border to be colored.
    let red = Rgb([255, 0, 0]);
    assert_eq!(frame.get_pixel(5, 5), &red);
    assert_eq!(frame.get_pixel(14, 5), &red);
    assert_eq!(frame.get_pixel(5, 14), &red);
    assert_eq!(frame.get_pixel(14, 14), &red);
}

#[test]
fn draw_rect_clips_at_image_edge() {
    let mut img = RgbImage::new(20, 20);
    draw_rect(
        &mut img,
        &PixelRect {
            x: 15,
            y: 15,
            w: 5,
            h: 5,
        },
        Rgb([255, 0, 0]),
        2,
    );
    assert_eq!(img.get_pixel(15, 15), &Rgb([255, 0, 0]));
    assert_eq!(img.get_pixel(19, 19), &Rgb([255, 0, 0]));
}
