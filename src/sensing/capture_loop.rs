use std::sync::Arc;

use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::EmotionClassifier;
use crate::devices::{Frame, VideoSource};
use crate::error::CaptureError;
use crate::signals::{CaptureWriters, EmotionReading};

use super::snapshot::snapshot_data_url;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, Copy)]
pub struct CaptureLoopConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub jpeg_quality: u8,
}

/// Samples the current frame every `interval` and classifies it.
///
/// Each request is awaited inside its tick, so there is never more than one
/// in flight. Ticks that come due while a request is pending are dropped: a
/// request that outlasts the interval restarts the ticker, so the next one
/// goes out a full interval after it returns. Cancellation drops an in-flight
/// request and its response; only resolved requests are counted as attempted.
pub async fn capture_loop(
    session_id: String,
    source: Arc<dyn VideoSource>,
    classifier: Arc<dyn EmotionClassifier>,
    writers: CaptureWriters,
    config: CaptureLoopConfig,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    log_info!(
        "capture loop started for session {} (every {}ms)",
        session_id,
        config.interval.as_millis()
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(frame) = source.current_frame().filter(|frame| frame.has_dimensions()) else {
            log_debug!("no frame with valid dimensions yet, skipping capture");
            writers.stats.update(|stats| stats.skipped_no_frame += 1);
            continue;
        };

        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("discarding in-flight capture for session {}", session_id);
                break;
            }
            result = perform_capture(&session_id, frame, classifier.as_ref(), &config) => result,
        };

        if started.elapsed() > config.interval {
            ticker.reset();
        }

        match outcome {
            Ok(reading) => {
                log_debug!(
                    "capture classified as {} ({:.2}) in {}ms",
                    reading.emotion,
                    reading.confidence,
                    started.elapsed().as_millis()
                );
                writers.emotion.set(Some(reading));
                writers.stats.update(|stats| {
                    stats.attempted += 1;
                    stats.succeeded += 1;
                });
            }
            Err(err) => {
                log_warn!("capture failed for session {}: {}", session_id, err);
                writers.stats.update(|stats| {
                    stats.attempted += 1;
                    stats.failed += 1;
                });
            }
        }
    }

    log_info!("capture loop shutting down for session {}", session_id);
}

async fn perform_capture(
    session_id: &str,
    frame: Arc<Frame>,
    classifier: &dyn EmotionClassifier,
    config: &CaptureLoopConfig,
) -> Result<EmotionReading, CaptureError> {
    let quality = config.jpeg_quality;
    let data_url = tokio::task::spawn_blocking(move || snapshot_data_url(&frame, quality))
        .await
        .map_err(|err| CaptureError::Encode(format!("encoder worker join failed: {err}")))?
        .map_err(|err| CaptureError::Encode(format!("{err:#}")))?;

    let classification =
        tokio::time::timeout(config.timeout, classifier.classify(session_id, &data_url))
            .await
            .map_err(|_| CaptureError::Timeout(config.timeout))??;

    Ok(EmotionReading {
        emotion: classification.emotion,
        confidence: classification.confidence,
    })
}
