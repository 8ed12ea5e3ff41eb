//! Past-session reports: the session list and per-session timelines.

pub mod timeline;

use std::sync::Arc;

use log::info;

use crate::backend::SessionStore;
use crate::error::StoreError;
use crate::models::SessionSummary;

pub use timeline::{
    aggregate, load_timeline, resolve_captures, ChartPoint, ChartSeries, GalleryEntry,
    SessionTimeline,
};

/// `"{m}m {s}s"`, as the session list shows durations.
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Session list plus the currently opened timeline.
pub struct SessionReports {
    store: Arc<dyn SessionStore>,
    sessions: Vec<SessionSummary>,
    selected: Option<SessionTimeline>,
}

impl SessionReports {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            sessions: Vec::new(),
            selected: None,
        }
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn selected(&self) -> Option<&SessionTimeline> {
        self.selected.as_ref()
    }

    pub async fn refresh(&mut self) -> Result<&[SessionSummary], StoreError> {
        self.sessions = self.store.list_sessions().await?;
        Ok(&self.sessions)
    }

    /// Opens a session's timeline. Re-selecting the open session does not
    /// refetch it.
    pub async fn select(&mut self, session_id: &str) -> Result<&SessionTimeline, StoreError> {
        let cached = self
            .selected
            .as_ref()
            .is_some_and(|timeline| timeline.session_id == session_id);
        if !cached {
            let timeline = load_timeline(self.store.as_ref(), session_id).await?;
            self.selected = Some(timeline);
        }
        self.selected
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable(format!("timeline {session_id} not loaded")))
    }

    /// Deletes remotely, then drops the session from the local list and
    /// closes it if it was open.
    pub async fn delete(&mut self, session_id: &str) -> Result<(), StoreError> {
        self.store.delete_session(session_id).await?;
        self.sessions.retain(|s| s.session_id != session_id);
        if self
            .selected
            .as_ref()
            .is_some_and(|timeline| timeline.session_id == session_id)
        {
            self.selected = None;
        }
        info!("deleted session {}", session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::ModelStatus;
    use crate::models::{SessionDetail, SessionStatus, TimelineEntry};

    struct MemoryStore {
        sessions: Mutex<Vec<SessionSummary>>,
        detail_calls: AtomicUsize,
    }

    fn summary(id: &str) -> SessionSummary {
        SessionSummary {
            session_id: id.to_string(),
            date: "2024-01-01 10:00:00".into(),
            duration_seconds: 65,
            images_captured: 2,
            dominant_emotion: "Happy".into(),
            status: SessionStatus::Stopped,
        }
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn create_session(&self) -> Result<String, StoreError> {
            Err(StoreError::Unavailable("read only".into()))
        }

        async fn stop_session(&self, _: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
            Ok(self.sessions.lock().unwrap().clone())
        }

        async fn session_detail(&self, session_id: &str) -> Result<SessionDetail, StoreError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SessionDetail {
                session: Some(summary(session_id)),
                timeline: vec![TimelineEntry {
                    elapsed_seconds: 0,
                    emotion: "happy".into(),
                    confidence: 0.7,
                    image_path: format!("{session_id}/0.jpg"),
                    timestamp: None,
                }],
            })
        }

        async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
            self.sessions
                .lock()
                .unwrap()
                .retain(|s| s.session_id != session_id);
            Ok(())
        }

        async fn model_status(&self) -> Result<ModelStatus, StoreError> {
            Err(StoreError::Unavailable("no probe".into()))
        }
    }

    fn reports() -> (SessionReports, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore {
            sessions: Mutex::new(vec![summary("a"), summary("b")]),
            detail_calls: AtomicUsize::new(0),
        });
        (SessionReports::new(store.clone()), store)
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(65), "1m 5s");
        assert_eq!(format_duration(3600), "60m 0s");
    }

    #[tokio::test]
    async fn reselecting_does_not_refetch() {
        let (mut reports, store) = reports();
        assert_eq!(reports.refresh().await.unwrap().len(), 2);

        let timeline = reports.select("a").await.unwrap();
        assert_eq!(timeline.series.values(), vec![4]);
        reports.select("a").await.unwrap();
        assert_eq!(store.detail_calls.load(Ordering::SeqCst), 1);

        reports.select("b").await.unwrap();
        assert_eq!(store.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn deleting_selected_session_closes_it() {
        let (mut reports, _store) = reports();
        reports.refresh().await.unwrap();
        reports.select("a").await.unwrap();

        reports.delete("b").await.unwrap();
        assert!(reports.selected().is_some());

        reports.delete("a").await.unwrap();
        assert!(reports.selected().is_none());
        assert!(reports.sessions().is_empty());
        assert!(reports.refresh().await.unwrap().is_empty());
    }
}
