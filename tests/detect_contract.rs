use lookout_lib::detect::{DetectionResult, UploadResult, NO_OBJECTS_CAPTION};

#[test]
fn parses_full_realtime_response() {
    let body = r#"{
        "boxes": [
            {"x": 0.1, "y": 0.1, "w": 0.2, "h": 0.2, "label": "person", "score": 0.95}
        ],
        "caption": "The frame contains person.",
        "labels": ["person"],
        "count": 1
    }"#;

    let result: DetectionResult = serde_json::from_str(body).expect("parse");
    assert_eq!(result.boxes().len(), 1);
    assert_eq!(result.boxes()[0].label, "person");
    assert_eq!(result.caption(), "The frame contains person.");
}

#[test]
fn empty_response_yields_no_boxes_and_no_caption() {
    let result: DetectionResult = serde_json::from_str("{}").expect("parse");
    assert!(result.boxes().is_empty());
    assert_eq!(result.caption(), "");
}

#[test]
fn error_body_from_backend_still_parses() {
    // The backend answers 4xx with {"error": ...}; the client treats it as
    // a response with nothing detected.
    let result: DetectionResult =
        serde_json::from_str(r#"{"error": "Failed to decode image"}"#).expect("parse");
    assert!(result.boxes().is_empty());
    assert_eq!(result.caption(), "");
}

#[test]
fn upload_caption_is_displayed_when_present() {
    let result: UploadResult = serde_json::from_str(r#"{"caption": "a cat"}"#).expect("parse");
    assert_eq!(result.caption_or_default(), "a cat");
}

#[test]
fn upload_without_caption_falls_back() {
    let empty: UploadResult = serde_json::from_str("{}").expect("parse");
    assert_eq!(empty.caption_or_default(), NO_OBJECTS_CAPTION);

    let blank: UploadResult = serde_json::from_str(r#"{"caption": ""}"#).expect("parse");
    assert_eq!(blank.caption_or_default(), NO_OBJECTS_CAPTION);
}
