mod types;

pub use types::{FrameSampleMetrics, MetricsSnapshot};

use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_RECENT_FRAMES: usize = 20;

/// Canonical `skipped_reason` values. The dark-skip counter matches on
/// [`skip_reason::TOO_DARK`], so skips must be recorded with these rather
/// than ad-hoc strings.
pub mod skip_reason {
    pub const NO_FRAME: &str = "no frame";
    pub const TOO_DARK: &str = "too dark";
    pub const EMPTY_BATCH: &str = "empty batch";
}

/// In-memory counters for the sampling pipeline: how many frames were
/// captured, how many were actually classified, how many were skipped for
/// darkness, plus a bounded window of per-frame timings.
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    recent_frames: Vec<FrameSampleMetrics>,
    frame_count: u64,
    classified_count: u64,
    dark_skip_count: u64,
    voice_sample_count: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                recent_frames: Vec::with_capacity(MAX_RECENT_FRAMES),
                frame_count: 0,
                classified_count: 0,
                dark_skip_count: 0,
                voice_sample_count: 0,
            })),
        }
    }

    pub async fn record_frame(&self, metrics: FrameSampleMetrics) {
        let mut state = self.inner.lock().await;

        state.frame_count += 1;

        if metrics.classify_ms.is_some() {
            state.classified_count += 1;
        } else if metrics.skipped_reason.as_deref() == Some(skip_reason::TOO_DARK) {
            state.dark_skip_count += 1;
        }

        state.recent_frames.push(metrics);

        if state.recent_frames.len() > MAX_RECENT_FRAMES {
            state.recent_frames.remove(0);
        }
    }

    pub async fn record_voice_sample(&self) {
        self.inner.lock().await.voice_sample_count += 1;
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().await;
        MetricsSnapshot {
            recent_frames: state.recent_frames.clone(),
            frame_count: state.frame_count,
            classified_count: state.classified_count,
            dark_skip_count: state.dark_skip_count,
            voice_sample_count: state.voice_sample_count,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.recent_frames.clear();
        state.frame_count = 0;
        state.classified_count = 0;
        state.dark_skip_count = 0;
        state.voice_sample_count = 0;
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn frame(classify_ms: Option<u64>, skipped_reason: Option<&str>) -> FrameSampleMetrics {
        FrameSampleMetrics {
            timestamp: Utc::now(),
            capture_ms: 3,
            classify_ms,
            skipped_reason: skipped_reason.map(str::to_string),
            total_ms: 5,
        }
    }

    #[tokio::test]
    async fn counts_classified_and_dark_frames_separately() {
        let collector = MetricsCollector::new();
        collector.record_frame(frame(Some(12), None)).await;
        collector
            .record_frame(frame(None, Some(skip_reason::TOO_DARK)))
            .await;
        collector
            .record_frame(frame(None, Some(skip_reason::EMPTY_BATCH)))
            .await;

        let snapshot = collector.get_snapshot().await;
        assert_eq!(snapshot.frame_count, 3);
        assert_eq!(snapshot.classified_count, 1);
        assert_eq!(snapshot.dark_skip_count, 1);
    }

    #[tokio::test]
    async fn recent_frames_window_is_bounded() {
        let collector = MetricsCollector::new();
        for _ in 0..(MAX_RECENT_FRAMES + 5) {
            collector.record_frame(frame(Some(1), None)).await;
        }
        let snapshot = collector.get_snapshot().await;
        assert_eq!(snapshot.recent_frames.len(), MAX_RECENT_FRAMES);
        assert_eq!(snapshot.frame_count, (MAX_RECENT_FRAMES + 5) as u64);
    }
}
