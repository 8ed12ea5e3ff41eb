use std::fmt;

use serde::{Deserialize, Serialize};

/// A facial keypoint in normalized frame coordinates, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Keypoints for one detected face.
pub type LandmarkSet = Vec<LandmarkPoint>;

/// Tracker output for a single video frame. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingFrame {
    pub faces: Vec<LandmarkSet>,
}

impl TrackingFrame {
    pub fn new(faces: Vec<LandmarkSet>) -> Self {
        Self { faces }
    }

    pub fn primary_face(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrackingStatus {
    #[default]
    Idle,
    Scanning,
    TrackingActive,
}

impl TrackingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::Idle => "Idle",
            TrackingStatus::Scanning => "Scanning...",
            TrackingStatus::TrackingActive => "Tracking Active",
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
