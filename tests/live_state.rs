use lookout_lib::live::{LiveState, LiveStatus};

#[test]
fn fresh_state_is_idle_without_caption() {
    let state = LiveState::new();
    assert_eq!(state.status, LiveStatus::Idle);
    assert!(state.session_id.is_none());
    assert!(!state.can_speak());
}

#[test]
fn begin_session_resets_previous_caption() {
    let mut state = LiveState::new();
    state.set_caption("The frame contains person.".to_string());

    state.begin_session("session-1".to_string(), chrono::Utc::now());

    assert_eq!(state.status, LiveStatus::Running);
    assert_eq!(state.session_id.as_deref(), Some("session-1"));
    assert!(!state.can_speak());
}

#[test]
fn caption_gates_speech_readiness() {
    let mut state = LiveState::new();
    state.begin_session("session-1".to_string(), chrono::Utc::now());

    state.set_caption("a person".to_string());
    assert!(state.can_speak());

    state.set_caption(String::new());
    assert!(!state.can_speak());
}

#[test]
fn stop_returns_to_idle_but_keeps_last_caption() {
    let mut state = LiveState::new();
    state.begin_session("session-1".to_string(), chrono::Utc::now());
    state.set_caption("a person".to_string());

    state.stop();

    assert_eq!(state.status, LiveStatus::Idle);
    assert!(state.session_id.is_none());
    assert!(state.started_at.is_none());
    assert_eq!(state.caption, "a person");
}

#[test]
fn stopping_an_idle_state_is_harmless() {
    let mut state = LiveState::new();
    state.stop();
    assert_eq!(state.status, LiveStatus::Idle);
}
