mod emotion;
mod session;
mod tracking;

pub use emotion::Emotion;
pub use session::{
    Capture, Classification, SessionDetail, SessionStatus, SessionSummary, TimelineEntry,
};
pub use tracking::{LandmarkPoint, LandmarkSet, TrackingFrame, TrackingStatus};
