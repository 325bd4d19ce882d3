use lookout_lib::detect::{DetectError, MISSING_IMAGE_MESSAGE};
use lookout_lib::upload::{preview_mime, validate_selection};

#[test]
fn empty_selection_is_rejected_with_the_alert_message() {
    let err = validate_selection("").expect_err("must reject");
    assert!(matches!(err, DetectError::MissingImage));
    assert_eq!(err.to_string(), MISSING_IMAGE_MESSAGE);
}

#[test]
fn missing_file_is_rejected_before_any_request() {
    let err = validate_selection("/nonexistent/cat.jpg").expect_err("must reject");
    assert!(matches!(err, DetectError::MissingImage));
}

#[test]
fn existing_file_passes_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cat.png");
    std::fs::write(&path, b"not really a png").expect("write");

    validate_selection(path.to_str().unwrap()).expect("must accept");
}

#[test]
fn preview_mime_follows_extension() {
    assert_eq!(preview_mime("photo.png"), "image/png");
    assert_eq!(preview_mime("photo.JPG"), "image/jpeg");
    assert_eq!(preview_mime("photo.webp"), "image/webp");
    assert_eq!(preview_mime("photo"), "image/jpeg");
}
