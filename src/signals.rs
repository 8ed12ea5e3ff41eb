//! Live values published by the loops for the presentation layer.
//!
//! Each cell has exactly one writer (the loop that owns it) and any number of
//! read-only subscribers. Writes are whole-value replacements.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::models::{Emotion, TrackingStatus};
use crate::overlay::FaceOverlay;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct EmotionReading {
    pub emotion: Emotion,
    pub confidence: f64,
}

/// Per-session capture counters. Failed cycles never count as captured.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CaptureStats {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped_no_frame: u64,
}

/// Write half of one signal cell. Deliberately not `Clone`.
pub struct SignalWriter<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> SignalWriter<T> {
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.tx.send_modify(modify);
    }
}

/// Writers owned by the capture loop.
pub struct CaptureWriters {
    pub emotion: SignalWriter<Option<EmotionReading>>,
    pub stats: SignalWriter<CaptureStats>,
}

/// Writers owned by the tracking loop.
pub struct TrackingWriters {
    pub status: SignalWriter<TrackingStatus>,
    pub overlay: SignalWriter<Vec<FaceOverlay>>,
}

pub struct LiveSignals {
    emotion: Arc<watch::Sender<Option<EmotionReading>>>,
    stats: Arc<watch::Sender<CaptureStats>>,
    tracking: Arc<watch::Sender<TrackingStatus>>,
    overlay: Arc<watch::Sender<Vec<FaceOverlay>>>,
}

impl LiveSignals {
    pub fn new() -> Self {
        Self {
            emotion: Arc::new(watch::channel(None).0),
            stats: Arc::new(watch::channel(CaptureStats::default()).0),
            tracking: Arc::new(watch::channel(TrackingStatus::Idle).0),
            overlay: Arc::new(watch::channel(Vec::new()).0),
        }
    }

    pub fn subscribe(&self) -> SignalReaders {
        SignalReaders {
            emotion: self.emotion.subscribe(),
            stats: self.stats.subscribe(),
            tracking: self.tracking.subscribe(),
            overlay: self.overlay.subscribe(),
        }
    }

    pub(crate) fn capture_writers(&self) -> CaptureWriters {
        CaptureWriters {
            emotion: SignalWriter {
                tx: Arc::clone(&self.emotion),
            },
            stats: SignalWriter {
                tx: Arc::clone(&self.stats),
            },
        }
    }

    pub(crate) fn tracking_writers(&self) -> TrackingWriters {
        TrackingWriters {
            status: SignalWriter {
                tx: Arc::clone(&self.tracking),
            },
            overlay: SignalWriter {
                tx: Arc::clone(&self.overlay),
            },
        }
    }

    /// Back to idle values. Only called once both loops have been joined.
    pub(crate) fn reset(&self) {
        self.emotion.send_replace(None);
        self.tracking.send_replace(TrackingStatus::Idle);
        self.overlay.send_replace(Vec::new());
    }

    /// Fresh counters for a new session.
    pub(crate) fn reset_stats(&self) {
        self.stats.send_replace(CaptureStats::default());
    }
}

impl Default for LiveSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Clone)]
pub struct SignalReaders {
    emotion: watch::Receiver<Option<EmotionReading>>,
    stats: watch::Receiver<CaptureStats>,
    tracking: watch::Receiver<TrackingStatus>,
    overlay: watch::Receiver<Vec<FaceOverlay>>,
}

impl SignalReaders {
    pub fn emotion(&self) -> Option<EmotionReading> {
        *self.emotion.borrow()
    }

    pub fn stats(&self) -> CaptureStats {
        *self.stats.borrow()
    }

    pub fn tracking_status(&self) -> TrackingStatus {
        *self.tracking.borrow()
    }

    pub fn overlay(&self) -> Vec<FaceOverlay> {
        self.overlay.borrow().clone()
    }

    /// Change notifications for the emotion cell.
    pub fn emotion_changes(&self) -> watch::Receiver<Option<EmotionReading>> {
        self.emotion.clone()
    }

    pub fn stats_changes(&self) -> watch::Receiver<CaptureStats> {
        self.stats.clone()
    }

    pub fn tracking_changes(&self) -> watch::Receiver<TrackingStatus> {
        self.tracking.clone()
    }

    pub fn overlay_changes(&self) -> watch::Receiver<Vec<FaceOverlay>> {
        self.overlay.clone()
    }
}
