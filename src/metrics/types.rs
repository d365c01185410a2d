use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSampleMetrics {
    pub timestamp: DateTime<Utc>,
    pub capture_ms: u64,
    pub classify_ms: Option<u64>,
    pub skipped_reason: Option<String>,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsSnapshot {
    pub recent_frames: Vec<FrameSampleMetrics>,
    pub frame_count: u64,
    pub classified_count: u64,
    pub dark_skip_count: u64,
    pub voice_sample_count: u64,
}
