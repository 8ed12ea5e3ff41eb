//! Session and capture records as the session store reports them.

use serde::{Deserialize, Serialize};

use super::Emotion;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Stopped,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Stopped => "stopped",
        }
    }
}

/// One row of the session list. Every field except `session_id` is computed
/// by the store and read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    pub date: String,
    pub duration_seconds: u64,
    pub images_captured: u64,
    /// An emotion label, or `"N/A"` while the session has no captures.
    pub dominant_emotion: String,
    pub status: SessionStatus,
}

/// A capture as it appears in a stored timeline.
///
/// The label stays a string here: the store owns persistence and the reports
/// view decides how to chart a label it does not recognise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub elapsed_seconds: u64,
    pub emotion: String,
    pub confidence: f64,
    pub image_path: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDetail {
    pub session: Option<SessionSummary>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

/// A capture tagged with its owning session, after label resolution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Capture {
    pub session_id: String,
    pub elapsed_seconds: u64,
    pub emotion: Emotion,
    pub confidence: f64,
    pub image_path: String,
}

/// Result of a single classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub emotion: Emotion,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_store_payload() {
        let payload = serde_json::json!({
            "session_id": "sess_20240101120000000000",
            "date": "2024-01-01 12:00:00 UTC",
            "duration_seconds": 75,
            "images_captured": 12,
            "dominant_emotion": "Happy",
            "status": "stopped"
        });

        let summary: SessionSummary = serde_json::from_value(payload).unwrap();
        assert_eq!(summary.status, SessionStatus::Stopped);
        assert_eq!(summary.images_captured, 12);
        assert_eq!(summary.status.as_str(), "stopped");
    }

    #[test]
    fn detail_tolerates_missing_timeline() {
        let detail: SessionDetail = serde_json::from_str(r#"{"session": null}"#).unwrap();
        assert!(detail.timeline.is_empty());
        assert!(detail.session.is_none());
    }
}
