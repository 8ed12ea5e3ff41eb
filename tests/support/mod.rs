#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::RgbImage;

use facepulse::backend::ModelStatus;
use facepulse::models::{
    Classification, LandmarkPoint, SessionDetail, SessionStatus, SessionSummary, TimelineEntry,
};
use facepulse::{
    CameraProvider, Collaborators, DeviceError, Emotion, EmotionClassifier, FaceTracker, Frame,
    FrameFeed, PipelineSettings, SessionController, SessionStore, StoreError, TrackingFrame,
    VideoSource,
};

/// Hands out a fresh feed with one frame on every open.
pub struct FakeCamera {
    deny: bool,
    opens: AtomicUsize,
    last: Mutex<Option<Arc<FrameFeed>>>,
}

impl FakeCamera {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            deny: false,
            opens: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn denied() -> Arc<Self> {
        Arc::new(Self {
            deny: true,
            opens: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn last_feed(&self) -> Arc<FrameFeed> {
        self.last.lock().unwrap().clone().expect("camera never opened")
    }
}

#[async_trait]
impl CameraProvider for FakeCamera {
    async fn open(&self) -> Result<Arc<dyn VideoSource>, DeviceError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(DeviceError::PermissionDenied);
        }
        let feed = Arc::new(FrameFeed::new());
        feed.push(RgbImage::new(64, 48));
        *self.last.lock().unwrap() = Some(feed.clone());
        Ok(feed)
    }
}

/// Always sees one face in the middle of the frame.
pub struct FakeTracker;

#[async_trait]
impl FaceTracker for FakeTracker {
    async fn track(&self, _frame: &Frame) -> anyhow::Result<TrackingFrame> {
        Ok(TrackingFrame::new(vec![vec![
            LandmarkPoint::new(0.3, 0.3),
            LandmarkPoint::new(0.7, 0.7),
        ]]))
    }
}

/// In-memory store and classifier. Successful classifications are appended
/// to the session's timeline, one second apart.
#[derive(Default)]
pub struct FakeBackend {
    pub fail_create: AtomicBool,
    pub fail_stop: AtomicBool,
    /// Calls park forever while set.
    pub hang_create: AtomicBool,
    pub hang_stop: AtomicBool,
    script: Mutex<VecDeque<Result<Classification, String>>>,
    timeline: Mutex<Vec<TimelineEntry>>,
    created: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub classify_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, results: Vec<Result<Classification, String>>) {
        self.script.lock().unwrap().extend(results);
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn reading(emotion: Emotion, confidence: f64) -> Result<Classification, String> {
    Ok(Classification {
        emotion,
        confidence,
    })
}

#[async_trait]
impl SessionStore for FakeBackend {
    async fn create_session(&self) -> Result<String, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_create.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("create refused".into()));
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("sess-{n}"))
    }

    async fn stop_session(&self, _session_id: &str) -> Result<(), StoreError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_stop.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("stop refused".into()));
        }
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        Ok(Vec::new())
    }

    async fn session_detail(&self, session_id: &str) -> Result<SessionDetail, StoreError> {
        let timeline = self.timeline.lock().unwrap().clone();
        Ok(SessionDetail {
            session: Some(SessionSummary {
                session_id: session_id.to_string(),
                date: "today".into(),
                duration_seconds: timeline.len() as u64,
                images_captured: timeline.len() as u64,
                dominant_emotion: "N/A".into(),
                status: SessionStatus::Stopped,
            }),
            timeline,
        })
    }

    async fn delete_session(&self, _session_id: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn model_status(&self) -> Result<ModelStatus, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }
}

#[async_trait]
impl EmotionClassifier for FakeBackend {
    async fn classify(
        &self,
        session_id: &str,
        image_data_url: &str,
    ) -> Result<Classification, StoreError> {
        assert!(image_data_url.starts_with("data:image/jpeg;base64,"));
        let call = self.classify_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(result)) => {
                self.timeline.lock().unwrap().push(TimelineEntry {
                    elapsed_seconds: call as u64,
                    emotion: result.emotion.to_string(),
                    confidence: result.confidence,
                    image_path: format!("{session_id}/{call}.jpg"),
                    timestamp: None,
                });
                Ok(result)
            }
            Some(Err(message)) => Err(StoreError::Unavailable(message)),
            None => Err(StoreError::Unavailable("script exhausted".into())),
        }
    }
}

pub fn controller(camera: Arc<FakeCamera>, backend: Arc<FakeBackend>) -> SessionController {
    let collaborators = Collaborators {
        camera,
        tracker: Arc::new(FakeTracker),
        store: backend.clone(),
        classifier: backend,
    };
    SessionController::new(collaborators, PipelineSettings::default())
}
