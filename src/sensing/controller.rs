use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backend::EmotionClassifier;
use crate::devices::{FaceTracker, VideoSource};
use crate::overlay::OverlayStyle;
use crate::signals::LiveSignals;

use super::capture_loop::{capture_loop, CaptureLoopConfig};
use super::tracking_loop::tracking_loop;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Everything the two loops need for one session.
pub struct LoopContext {
    pub session_id: String,
    pub source: Arc<dyn VideoSource>,
    pub tracker: Arc<dyn FaceTracker>,
    pub classifier: Arc<dyn EmotionClassifier>,
    pub capture: CaptureLoopConfig,
    pub overlay: OverlayStyle,
}

/// Owns the tracking and capture tasks of the running session and the video
/// source they read from.
pub struct SensingController {
    tracking: Option<JoinHandle<()>>,
    capture: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    source: Option<Arc<dyn VideoSource>>,
}

impl SensingController {
    pub fn new() -> Self {
        Self {
            tracking: None,
            capture: None,
            cancel_token: None,
            source: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }

    /// Spawns both loops under one cancellation token.
    pub fn start_sensing(&mut self, ctx: LoopContext, signals: &LiveSignals) -> Result<()> {
        if self.is_running() {
            bail!("sensing already active");
        }

        let cancel_token = CancellationToken::new();

        let tracking = tokio::spawn(tracking_loop(
            Arc::clone(&ctx.source),
            ctx.tracker,
            signals.tracking_writers(),
            ctx.overlay,
            cancel_token.clone(),
        ));

        let capture = tokio::spawn(capture_loop(
            ctx.session_id.clone(),
            Arc::clone(&ctx.source),
            ctx.classifier,
            signals.capture_writers(),
            ctx.capture,
            cancel_token.clone(),
        ));

        log_info!("sensing started for session {}", ctx.session_id);

        self.tracking = Some(tracking);
        self.capture = Some(capture);
        self.cancel_token = Some(cancel_token);
        self.source = Some(ctx.source);
        Ok(())
    }

    /// Cancels and joins both loops, then releases the video source. The
    /// source is released even when a loop panicked.
    pub async fn stop_sensing(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        let mut failures = Vec::new();
        for (name, handle) in [("tracking", self.tracking.take()), ("capture", self.capture.take())]
        {
            let Some(handle) = handle else { continue };
            if let Err(err) = handle.await {
                log_error!("{name} loop task failed to join: {err}");
                failures.push(name);
            }
        }

        if let Some(source) = self.source.take() {
            source.release();
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("loops failed to join: {}", failures.join(", ")))
        }
    }
}

impl Default for SensingController {
    fn default() -> Self {
        Self::new()
    }
}
