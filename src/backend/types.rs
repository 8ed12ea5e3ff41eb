use serde::{Deserialize, Serialize};

use crate::models::SessionSummary;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionResponse {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CaptureRequest<'a> {
    pub image_data: &'a str,
}

/// The store echoes the full capture record; only the label and score are
/// consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct CaptureResponse {
    pub emotion: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelStatus {
    #[serde(rename = "yolo_ready", default)]
    pub ready: bool,
    #[serde(rename = "yolo_status", default)]
    pub status: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub emotions_supported: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BackendStatus {
    Online,
    Limited,
    Offline,
}

impl BackendStatus {
    pub fn from_probe<E>(probe: &Result<ModelStatus, E>) -> Self {
        match probe {
            Ok(status) if status.ready || status.status == "available" => BackendStatus::Online,
            Ok(_) => BackendStatus::Limited,
            Err(_) => BackendStatus::Offline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendStatus::Online => "Online",
            BackendStatus::Limited => "Limited",
            BackendStatus::Offline => "Offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_probe() {
        let ready = ModelStatus {
            ready: true,
            status: "available".into(),
            model_name: None,
            emotions_supported: Vec::new(),
        };
        let fallback = ModelStatus {
            ready: false,
            status: "unavailable (import failed)".into(),
            ..ready.clone()
        };

        assert_eq!(BackendStatus::from_probe::<()>(&Ok(ready)), BackendStatus::Online);
        assert_eq!(BackendStatus::from_probe::<()>(&Ok(fallback)), BackendStatus::Limited);
        assert_eq!(BackendStatus::from_probe::<()>(&Err(())), BackendStatus::Offline);
    }
}
