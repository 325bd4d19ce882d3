use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LiveStatus {
    Idle,
    Running,
}

impl Default for LiveStatus {
    fn default() -> Self {
        LiveStatus::Idle
    }
}

/// Observable state of the live detection flow. The caption survives a stop
/// so the last narration stays available until the next session overwrites
/// it; everything session-scoped is reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    pub status: LiveStatus,
    pub session_id: Option<String>,
    pub caption: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            status: LiveStatus::Idle,
            session_id: None,
            caption: String::new(),
            started_at: None,
        }
    }
}

impl LiveState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_session(&mut self, session_id: String, started_at: DateTime<Utc>) {
        *self = Self {
            status: LiveStatus::Running,
            session_id: Some(session_id),
            caption: String::new(),
            started_at: Some(started_at),
        };
    }

    pub fn set_caption(&mut self, caption: String) {
        self.caption = caption;
    }

    /// Speech is only possible once a non-empty caption has been received.
    pub fn can_speak(&self) -> bool {
        !self.caption.is_empty()
    }

    pub fn stop(&mut self) {
        self.status = LiveStatus::Idle;
        self.session_id = None;
        self.started_at = None;
    }
}
