//! Seams to the camera and the face-landmark tracker.
//!
//! Real drivers live outside this crate; they push frames into a
//! [`FrameFeed`] and implement [`FaceTracker`] over whatever landmark model
//! they wrap.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;
use log::info;
use tokio::sync::watch;

use crate::error::DeviceError;
use crate::models::TrackingFrame;

/// One decoded video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub image: RgbImage,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn has_dimensions(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Latest-frame slot shared by the tracking and capture loops.
pub type FrameReceiver = watch::Receiver<Option<Arc<Frame>>>;

/// An acquired video stream. Held for the lifetime of one session.
pub trait VideoSource: Send + Sync {
    /// Latest-frame subscription. Intermediate frames are dropped when a
    /// reader falls behind.
    fn subscribe(&self) -> FrameReceiver;

    fn current_frame(&self) -> Option<Arc<Frame>> {
        let frames = self.subscribe();
        let latest = frames.borrow().clone();
        latest
    }

    /// Stops the underlying device. Idempotent.
    fn release(&self);

    fn is_released(&self) -> bool;
}

/// Acquires the camera, e.g. after a permission prompt.
#[async_trait]
pub trait CameraProvider: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn VideoSource>, DeviceError>;
}

#[async_trait]
pub trait FaceTracker: Send + Sync {
    /// Landmark sets for every face found in `frame`, possibly none.
    async fn track(&self, frame: &Frame) -> anyhow::Result<TrackingFrame>;
}

/// A [`VideoSource`] fed by an external capture driver.
pub struct FrameFeed {
    tx: watch::Sender<Option<Arc<Frame>>>,
    sequence: AtomicU64,
    released: AtomicBool,
}

impl FrameFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            sequence: AtomicU64::new(0),
            released: AtomicBool::new(false),
        }
    }

    /// Publishes a new frame. Frames pushed after release are ignored.
    pub fn push(&self, image: RgbImage) -> bool {
        if self.is_released() {
            return false;
        }
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_replace(Some(Arc::new(Frame { sequence, image })));
        true
    }

    pub fn frames_pushed(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Default for FrameFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSource for FrameFeed {
    fn subscribe(&self) -> FrameReceiver {
        self.tx.subscribe()
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.tx.send_replace(None);
            info!("video source released after {} frames", self.frames_pushed());
        }
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}
