use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::devices::{FaceTracker, Frame, VideoSource};
use crate::models::{TrackingFrame, TrackingStatus};
use crate::overlay::{face_overlay, OverlayStyle, SurfaceSize};
use crate::signals::TrackingWriters;

// Per-frame logging stays at debug level
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Runs the tracker against every frame the source delivers.
///
/// Frames arriving while the tracker is busy collapse into the latest one.
/// A failed or dropped result leaves the previous overlay in place.
pub async fn tracking_loop(
    source: Arc<dyn VideoSource>,
    tracker: Arc<dyn FaceTracker>,
    writers: TrackingWriters,
    style: OverlayStyle,
    cancel_token: CancellationToken,
) {
    let mut frames = source.subscribe();
    frames.mark_changed();
    writers.status.set(TrackingStatus::Scanning);
    log_info!("tracking loop started");

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            changed = frames.changed() => {
                if changed.is_err() {
                    log_info!("video source closed, tracking loop exiting");
                    break;
                }
            }
        }

        let latest = frames.borrow_and_update().clone();
        let Some(frame) = latest else {
            continue;
        };

        let result = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            result = tracker.track(&frame) => result,
        };

        match result {
            Ok(tracking) => apply_tracking(&tracking, &frame, &style, &writers),
            Err(err) => log_debug!("tracker dropped frame {}: {err:#}", frame.sequence),
        }
    }

    log_info!("tracking loop shutting down");
}

/// Publishes status and overlay for one tracker result. Only the first face
/// is rendered.
pub(crate) fn apply_tracking(
    tracking: &TrackingFrame,
    frame: &Frame,
    style: &OverlayStyle,
    writers: &TrackingWriters,
) {
    match tracking.primary_face() {
        None => {
            writers.status.set(TrackingStatus::Scanning);
            writers.overlay.set(Vec::new());
        }
        Some(face) => {
            let surface = SurfaceSize::new(frame.width(), frame.height());
            writers.status.set(TrackingStatus::TrackingActive);
            writers
                .overlay
                .set(face_overlay(face, surface, style).into_iter().collect());
        }
    }
}
