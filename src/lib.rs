pub mod backend;
pub mod devices;
pub mod error;
pub mod models;
pub mod overlay;
pub mod reports;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod signals;
pub mod utils;

pub use backend::{BackendStatus, EmotionClassifier, HttpBackend, ModelStatus, SessionStore};
pub use devices::{CameraProvider, FaceTracker, Frame, FrameFeed, VideoSource};
pub use error::{CaptureError, DeviceError, SessionError, StopNotificationError, StoreError};
pub use models::{Emotion, SessionSummary, TrackingFrame, TrackingStatus};
pub use reports::{format_duration, load_timeline, SessionReports, SessionTimeline};
pub use session::{Collaborators, LifecycleStatus, SessionController, StopOutcome};
pub use settings::{PipelineSettings, SettingsStore};
pub use signals::{CaptureStats, EmotionReading, SignalReaders};

/// Initializes logging (reads the RUST_LOG env var, defaulting to info).
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
