pub mod remote;
pub mod simulated;

pub use remote::RemoteEmotionClient;
pub use simulated::{SimulatedCamera, SimulatedFrameClassifier, SimulatedVoiceClassifier};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frames with mean luma below this are reported as too dark to classify.
pub const DEFAULT_DARKNESS_THRESHOLD: f64 = 40.0;

/// One `(label, confidence)` pair from an external classifier. A sampling
/// event yields an ordered sequence of these, highest confidence first,
/// typically 1-7 items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawClassification {
    pub label: String,
    pub confidence: f64,
}

impl RawClassification {
    /// Confidence is clamped to [0, 100] on entry; validating the producer's
    /// contract here keeps the fusion core total.
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 100.0),
        }
    }
}

/// A captured camera frame, reduced to a grayscale buffer.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub luma: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

impl CameraFrame {
    pub fn mean_luma(&self) -> f64 {
        if self.luma.is_empty() {
            return 0.0;
        }
        let total: u64 = self.luma.iter().map(|&b| b as u64).sum();
        total as f64 / self.luma.len() as f64
    }
}

/// Per-tick output of the facial pipeline. When `is_too_dark` is set the
/// results must be ignored entirely (no slot overwrite, no log entry).
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub results: Vec<RawClassification>,
    pub is_too_dark: bool,
}

/// Emotion classification over a transcribed utterance.
pub trait VoiceClassifier: Send + Sync {
    fn classify_transcript(&self, transcript: &str) -> Result<Vec<RawClassification>>;
}

/// Emotion classification over a single camera frame.
pub trait FrameClassifier: Send + Sync {
    fn classify_frame(&self, frame: &CameraFrame) -> Result<FrameAnalysis>;
}

/// Supplies frames to the sampling loop. `None` means the camera produced
/// nothing this tick, which the loop treats as a non-event.
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> Result<Option<CameraFrame>>;
}
