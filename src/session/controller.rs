use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;

use crate::backend::{BackendStatus, EmotionClassifier, SessionStore};
use crate::devices::{CameraProvider, FaceTracker, VideoSource};
use crate::error::{SessionError, StopNotificationError};
use crate::sensing::{CaptureLoopConfig, LoopContext, SensingController};
use crate::settings::PipelineSettings;
use crate::signals::{CaptureStats, LiveSignals, SignalReaders};

use super::state::duration_millis;
use super::{LifecycleStatus, SessionSnapshot, SessionState};

/// External services a session is driven by.
#[derive(Clone)]
pub struct Collaborators {
    pub camera: Arc<dyn CameraProvider>,
    pub tracker: Arc<dyn FaceTracker>,
    pub store: Arc<dyn SessionStore>,
    pub classifier: Arc<dyn EmotionClassifier>,
}

/// What `stop()` did locally. The device is always released by the time
/// this is returned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopOutcome {
    pub session_id: String,
    pub store_notified: bool,
    pub duration_ms: u64,
    pub stats: CaptureStats,
}

#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    sensing: Arc<tokio::sync::Mutex<SensingController>>,
    signals: Arc<LiveSignals>,
    collaborators: Collaborators,
    settings: PipelineSettings,
}

impl SessionController {
    pub fn new(collaborators: Collaborators, settings: PipelineSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            sensing: Arc::new(tokio::sync::Mutex::new(SensingController::new())),
            signals: Arc::new(LiveSignals::new()),
            collaborators,
            settings,
        }
    }

    /// Read-only handles to the live signals.
    pub fn signals(&self) -> SignalReaders {
        self.signals.subscribe()
    }

    pub async fn get_state(&self) -> SessionState {
        lock_state(&self.state).clone()
    }

    pub async fn get_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*lock_state(&self.state))
    }

    pub async fn backend_status(&self) -> BackendStatus {
        BackendStatus::from_probe(&self.collaborators.store.model_status().await)
    }

    /// Acquires the camera, creates the remote session and starts both loops.
    ///
    /// Only valid from `Idle`. Any failure leaves the controller `Idle` with
    /// the device released, and so does dropping the returned future before
    /// it completes.
    pub async fn start(&self) -> Result<SessionState, SessionError> {
        self.settings.validate()?;

        {
            let mut state = lock_state(&self.state);
            if state.status != LifecycleStatus::Idle {
                return Err(SessionError::NotIdle(state.status));
            }
            state.begin();
        }
        let mut attempt = StartAttempt::new(Arc::clone(&self.state));

        let source = match self.collaborators.camera.open().await {
            Ok(source) => source,
            Err(err) => {
                warn!("camera unavailable, session not started: {}", err);
                return Err(err.into());
            }
        };
        attempt.hold(Arc::clone(&source));

        let session_id = match self.collaborators.store.create_session().await {
            Ok(id) => id,
            Err(err) => {
                error!("failed to create session: {}", err);
                return Err(SessionError::SessionCreate(err));
            }
        };

        self.signals.reset_stats();

        let ctx = LoopContext {
            session_id: session_id.clone(),
            source,
            tracker: Arc::clone(&self.collaborators.tracker),
            classifier: Arc::clone(&self.collaborators.classifier),
            capture: CaptureLoopConfig {
                interval: self.settings.capture_interval(),
                timeout: self.settings.capture_timeout(),
                jpeg_quality: self.settings.jpeg_quality,
            },
            overlay: self.settings.overlay_style(),
        };

        // Loops run before the state flips to Active so a stop() that sees
        // Active always finds them.
        self.sensing.lock().await.start_sensing(ctx, &self.signals)?;

        let mut state = lock_state(&self.state);
        state.activate(session_id.clone(), Utc::now(), Instant::now());
        attempt.complete();
        info!("session {} active", session_id);
        Ok(state.clone())
    }

    /// Ends the active session. Returns `None` when nothing was active.
    ///
    /// Local teardown always completes before the store is told; a failed
    /// notification is logged and reported through `store_notified`.
    pub async fn stop(&self) -> Option<StopOutcome> {
        let (session_id, duration) = {
            let mut state = lock_state(&self.state);
            if state.status != LifecycleStatus::Active {
                info!("stop ignored while {:?}", state.status);
                return None;
            }
            let session_id = state.session_id.clone()?;
            let duration = state.elapsed();
            state.status = LifecycleStatus::Stopping;
            (session_id, duration)
        };

        if let Err(err) = self.sensing.lock().await.stop_sensing().await {
            error!("sensing did not shut down cleanly: {:#}", err);
        }

        let stats = self.signals.subscribe().stats();
        self.signals.reset();
        lock_state(&self.state).reset();

        info!(
            "session {} stopped after {}s ({} captured, {} failed)",
            session_id,
            duration.as_secs(),
            stats.succeeded,
            stats.failed
        );

        let store_notified = match self.collaborators.store.stop_session(&session_id).await {
            Ok(()) => true,
            Err(source) => {
                let err = StopNotificationError {
                    session_id: session_id.clone(),
                    source,
                };
                warn!("{}", err);
                false
            }
        };

        Some(StopOutcome {
            session_id,
            store_notified,
            duration_ms: duration_millis(duration),
            stats,
        })
    }
}

/// Rolls back a start that never reached `Active`: releases the device and
/// returns the controller to `Idle`. Runs on early return and when the start
/// future is dropped.
struct StartAttempt {
    state: Arc<Mutex<SessionState>>,
    source: Option<Arc<dyn VideoSource>>,
    armed: bool,
}

impl StartAttempt {
    fn new(state: Arc<Mutex<SessionState>>) -> Self {
        Self {
            state,
            source: None,
            armed: true,
        }
    }

    fn hold(&mut self, source: Arc<dyn VideoSource>) {
        self.source = Some(source);
    }

    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for StartAttempt {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(source) = self.source.take() {
            source.release();
        }
        let mut state = lock_state(&self.state);
        if state.status == LifecycleStatus::Starting {
            state.reset();
        }
        info!("start abandoned, controller back to idle");
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
