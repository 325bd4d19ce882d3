use lookout_lib::settings::{DetectorSettings, SettingsStore};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SettingsStore::new(dir.path().join("settings.json")).expect("store");

    let settings = store.detector();
    assert_eq!(settings.backend_url, "http://127.0.0.1:5000");
    assert_eq!(settings.camera.device_path, "/dev/video0");
    assert_eq!(settings.speech.sample_rate, 22050);
}

#[test]
fn updates_persist_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");

    {
        let store = SettingsStore::new(path.clone()).expect("store");
        let mut settings = store.detector();
        settings.backend_url = "http://10.0.0.2:8080".to_string();
        settings.camera.fourcc = "YUYV".to_string();
        store.update(settings).expect("update");
    }

    let reopened = SettingsStore::new(path).expect("store");
    let settings = reopened.detector();
    assert_eq!(settings.backend_url, "http://10.0.0.2:8080");
    assert_eq!(settings.camera.fourcc, "YUYV");
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").expect("write");

    let store = SettingsStore::new(path).expect("store");
    assert_eq!(store.detector(), DetectorSettings::default());
}

#[test]
fn partial_file_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"backend_url": "http://192.168.1.4:5000"}"#).expect("write");

    let store = SettingsStore::new(path).expect("store");
    let settings = store.detector();
    assert_eq!(settings.backend_url, "http://192.168.1.4:5000");
    assert_eq!(settings.camera.width, 640);
}
