use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleStatus {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: LifecycleStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub active_since: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the controller for a start attempt.
    pub fn begin(&mut self) {
        *self = Self {
            status: LifecycleStatus::Starting,
            ..Self::default()
        };
    }

    pub fn activate(&mut self, session_id: String, started_at: DateTime<Utc>, now: Instant) {
        *self = Self {
            status: LifecycleStatus::Active,
            session_id: Some(session_id),
            started_at: Some(started_at),
            active_since: Some(now),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Time spent `Active`; zero in any other state.
    pub fn elapsed(&self) -> Duration {
        match (self.status, self.active_since) {
            (LifecycleStatus::Active, Some(since)) => since.elapsed(),
            _ => Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub elapsed_ms: u64,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            elapsed_ms: duration_millis(state.elapsed()),
            state: state.clone(),
        }
    }
}

pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        let mut state = SessionState::new();
        assert_eq!(state.status, LifecycleStatus::Idle);

        state.begin();
        assert_eq!(state.status, LifecycleStatus::Starting);
        assert!(state.session_id.is_none());
        assert_eq!(state.elapsed(), Duration::ZERO);

        state.activate("abc".into(), Utc::now(), Instant::now());
        assert_eq!(state.status, LifecycleStatus::Active);
        assert_eq!(state.session_id.as_deref(), Some("abc"));

        state.reset();
        assert_eq!(state.status, LifecycleStatus::Idle);
        assert!(state.started_at.is_none());
    }

    #[test]
    fn snapshot_serializes_without_instant() {
        let mut state = SessionState::new();
        state.activate("abc".into(), Utc::now(), Instant::now());
        let json = serde_json::to_value(SessionSnapshot::from(&state)).unwrap();
        assert_eq!(json["state"]["status"], "active");
        assert_eq!(json["state"]["sessionId"], "abc");
        assert!(json["state"].get("activeSince").is_none());
    }

    #[test]
    fn millis_saturate_instead_of_wrapping() {
        assert_eq!(duration_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }
}
