use std::time::Duration;

use thiserror::Error;

use crate::session::LifecycleStatus;

/// The camera could not be acquired. Fatal to `start()`; no remote session
/// is created.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera available")]
    NotFound,
    #[error("camera could not be started: {0}")]
    Unavailable(String),
}

/// Transport or protocol failure talking to the session store / classifier.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session is already in progress (controller is {0:?})")]
    NotIdle(LifecycleStatus),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("failed to create session: {0}")]
    SessionCreate(#[source] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A single capture cycle failed. Logged and skipped; never fatal.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("classification failed: {0}")]
    Classify(#[from] StoreError),
    #[error("classification timed out after {0:?}")]
    Timeout(Duration),
}

/// The best-effort stop call failed. Local cleanup has already completed.
#[derive(Debug, Error)]
#[error("failed to notify store that session {session_id} stopped: {source}")]
pub struct StopNotificationError {
    pub session_id: String,
    #[source]
    pub source: StoreError,
}
