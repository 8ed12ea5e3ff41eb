use log::warn;
use serde::Serialize;

use crate::backend::SessionStore;
use crate::error::StoreError;
use crate::models::{Capture, Emotion, SessionSummary, TimelineEntry};

/// Labels the store reports that are not in the enumeration are charted here.
pub const FALLBACK_EMOTION: Emotion = Emotion::Neutral;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    /// `"{elapsed}s"`.
    pub label: String,
    pub elapsed_seconds: u64,
    pub value: u8,
}

/// Emotion over elapsed time, one point per capture.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub const Y_MIN: u8 = 0;
    pub const Y_MAX: u8 = Emotion::MAX_ORDINAL;

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<u8> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Axis tick text for an ordinal; ticks outside the mapping stay blank.
    pub fn tick_label(value: u8) -> &'static str {
        Emotion::from_ordinal(value).map_or("", |emotion| emotion.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GalleryEntry {
    pub image_path: String,
    pub emotion: Emotion,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionTimeline {
    pub session_id: String,
    pub summary: Option<SessionSummary>,
    pub captures: Vec<Capture>,
    pub series: ChartSeries,
    pub gallery: Vec<GalleryEntry>,
}

/// Orders entries by elapsed time and resolves their labels. Entries with
/// equal times keep the store's order.
pub fn resolve_captures(session_id: &str, mut entries: Vec<TimelineEntry>) -> Vec<Capture> {
    entries.sort_by_key(|entry| entry.elapsed_seconds);
    entries
        .into_iter()
        .map(|entry| {
            let emotion = entry.emotion.parse::<Emotion>().unwrap_or_else(|_| {
                warn!(
                    "unknown emotion label {:?} at {}s in session {}, charting as {}",
                    entry.emotion, entry.elapsed_seconds, session_id, FALLBACK_EMOTION
                );
                FALLBACK_EMOTION
            });
            Capture {
                session_id: session_id.to_string(),
                elapsed_seconds: entry.elapsed_seconds,
                emotion,
                confidence: entry.confidence,
                image_path: entry.image_path,
            }
        })
        .collect()
}

/// Chart series and gallery for an ordered capture list.
pub fn aggregate(captures: &[Capture]) -> (ChartSeries, Vec<GalleryEntry>) {
    let points = captures
        .iter()
        .map(|capture| ChartPoint {
            label: format!("{}s", capture.elapsed_seconds),
            elapsed_seconds: capture.elapsed_seconds,
            value: capture.emotion.ordinal(),
        })
        .collect();

    let gallery = captures
        .iter()
        .map(|capture| GalleryEntry {
            image_path: capture.image_path.clone(),
            emotion: capture.emotion,
            elapsed_seconds: capture.elapsed_seconds,
        })
        .collect();

    (ChartSeries { points }, gallery)
}

pub async fn load_timeline(
    store: &dyn SessionStore,
    session_id: &str,
) -> Result<SessionTimeline, StoreError> {
    let detail = store.session_detail(session_id).await?;
    let captures = resolve_captures(session_id, detail.timeline);
    let (series, gallery) = aggregate(&captures);

    Ok(SessionTimeline {
        session_id: session_id.to_string(),
        summary: detail.session,
        captures,
        series,
        gallery,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(elapsed_seconds: u64, emotion: &str, image_path: &str) -> TimelineEntry {
        TimelineEntry {
            elapsed_seconds,
            emotion: emotion.to_string(),
            confidence: 0.8,
            image_path: image_path.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn empty_timeline_gives_empty_outputs() {
        let captures = resolve_captures("s", Vec::new());
        let (series, gallery) = aggregate(&captures);
        assert!(series.is_empty());
        assert!(gallery.is_empty());
    }

    #[test]
    fn charts_ordinals_in_elapsed_order() {
        let captures = resolve_captures(
            "s",
            vec![
                entry(3, "Happy", "c.jpg"),
                entry(1, "Happy", "a.jpg"),
                entry(2, "Sad", "b.jpg"),
            ],
        );
        let (series, gallery) = aggregate(&captures);

        assert_eq!(series.values(), vec![4, 2, 4]);
        assert_eq!(series.labels(), vec!["1s", "2s", "3s"]);
        let paths: Vec<_> = gallery.iter().map(|g| g.image_path.as_str()).collect();
        assert_eq!(paths, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(gallery[1].emotion, Emotion::Sad);
    }

    #[test]
    fn equal_elapsed_keeps_store_order() {
        let captures = resolve_captures(
            "s",
            vec![entry(5, "Angry", "x.jpg"), entry(5, "Fearful", "y.jpg")],
        );
        assert_eq!(captures[0].image_path, "x.jpg");
        assert_eq!(captures[1].image_path, "y.jpg");
    }

    #[test]
    fn unknown_label_charts_as_neutral() {
        let captures = resolve_captures("s", vec![entry(0, "contempt", "x.jpg")]);
        assert_eq!(captures[0].emotion, Emotion::Neutral);
        assert_eq!(aggregate(&captures).0.values(), vec![3]);
    }

    #[test]
    fn ticks_follow_ordinal_mapping() {
        assert_eq!(ChartSeries::tick_label(0), "Disgusted");
        assert_eq!(ChartSeries::tick_label(6), "Angry");
        assert_eq!(ChartSeries::tick_label(7), "");
        assert_eq!((ChartSeries::Y_MIN, ChartSeries::Y_MAX), (0, 6));
    }
}
