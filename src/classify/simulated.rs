//! Stand-in classifier implementations for demos and tests. The real
//! transformer pipelines live in an external inference service; these only
//! honor the `(label, confidence)` output contract.

use anyhow::Result;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::fusion::mapping::{FACIAL_VOCABULARY, VOICE_VOCABULARY};

use super::{
    CameraFrame, FrameAnalysis, FrameClassifier, FrameSource, RawClassification, VoiceClassifier,
};

const VOICE_TOP_K: usize = 5;

/// Emits a plausible top-k batch over the voice vocabulary, highest
/// confidence first.
pub struct SimulatedVoiceClassifier;

impl SimulatedVoiceClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedVoiceClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceClassifier for SimulatedVoiceClassifier {
    fn classify_transcript(&self, _transcript: &str) -> Result<Vec<RawClassification>> {
        let mut rng = rand::thread_rng();
        let k = rng.gen_range(3..=VOICE_TOP_K);

        let mut labels: Vec<&str> = VOICE_VOCABULARY.to_vec();
        labels.shuffle(&mut rng);

        let mut confidence: f64 = rng.gen_range(55.0..95.0);
        let mut results = Vec::with_capacity(k);
        for label in labels.into_iter().take(k) {
            results.push(RawClassification::new(label, confidence.round()));
            confidence *= rng.gen_range(0.5..0.9);
        }
        Ok(results)
    }
}

/// Produces small synthetic grayscale frames, with an occasional dark frame
/// to exercise the too-dark suppression path.
pub struct SimulatedCamera {
    dark_frame_chance: f64,
    width: u32,
    height: u32,
}

impl SimulatedCamera {
    pub fn new(dark_frame_chance: f64) -> Self {
        Self {
            dark_frame_chance: dark_frame_chance.clamp(0.0, 1.0),
            width: 64,
            height: 48,
        }
    }
}

impl FrameSource for SimulatedCamera {
    fn capture(&self) -> Result<Option<CameraFrame>> {
        let mut rng = rand::thread_rng();
        let base: f64 = if rng.gen_bool(self.dark_frame_chance) {
            rng.gen_range(5.0..25.0)
        } else {
            rng.gen_range(90.0..180.0)
        };

        let pixel_count = (self.width * self.height) as usize;
        let luma = (0..pixel_count)
            .map(|_| (base + rng.gen_range(-20.0..20.0)).clamp(0.0, 255.0) as u8)
            .collect();

        Ok(Some(CameraFrame {
            luma,
            width: self.width,
            height: self.height,
            captured_at: Utc::now(),
        }))
    }
}

/// Scores all seven facial labels per frame (a probability spread rescaled
/// to 0..100), flagging frames below the darkness threshold instead of
/// classifying them.
pub struct SimulatedFrameClassifier {
    darkness_threshold: f64,
}

impl SimulatedFrameClassifier {
    pub fn new(darkness_threshold: f64) -> Self {
        Self { darkness_threshold }
    }
}

impl FrameClassifier for SimulatedFrameClassifier {
    fn classify_frame(&self, frame: &CameraFrame) -> Result<FrameAnalysis> {
        if frame.mean_luma() < self.darkness_threshold {
            return Ok(FrameAnalysis {
                results: Vec::new(),
                is_too_dark: true,
            });
        }

        let mut rng = rand::thread_rng();
        let weights: Vec<f64> = FACIAL_VOCABULARY
            .iter()
            .map(|_| rng.gen_range(0.05..1.0))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut results: Vec<RawClassification> = FACIAL_VOCABULARY
            .iter()
            .zip(weights)
            .map(|(label, weight)| RawClassification::new(*label, (weight / total * 100.0).round()))
            .collect();
        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(FrameAnalysis {
            results,
            is_too_dark: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DEFAULT_DARKNESS_THRESHOLD;

    #[test]
    fn voice_batches_are_sorted_and_in_range() {
        let classifier = SimulatedVoiceClassifier::new();
        for _ in 0..20 {
            let results = classifier.classify_transcript("status nominal").unwrap();
            assert!(!results.is_empty() && results.len() <= VOICE_TOP_K);
            for pair in results.windows(2) {
                assert!(pair[0].confidence >= pair[1].confidence);
            }
            for result in &results {
                assert!((0.0..=100.0).contains(&result.confidence));
            }
        }
    }

    #[test]
    fn dark_frames_are_flagged_not_classified() {
        let classifier = SimulatedFrameClassifier::new(DEFAULT_DARKNESS_THRESHOLD);
        let frame = CameraFrame {
            luma: vec![0u8; 64],
            width: 8,
            height: 8,
            captured_at: Utc::now(),
        };
        let analysis = classifier.classify_frame(&frame).unwrap();
        assert!(analysis.is_too_dark);
        assert!(analysis.results.is_empty());
    }

    #[test]
    fn bright_frames_score_the_full_facial_vocabulary() {
        let classifier = SimulatedFrameClassifier::new(DEFAULT_DARKNESS_THRESHOLD);
        let frame = CameraFrame {
            luma: vec![150u8; 64],
            width: 8,
            height: 8,
            captured_at: Utc::now(),
        };
        let analysis = classifier.classify_frame(&frame).unwrap();
        assert!(!analysis.is_too_dark);
        assert_eq!(analysis.results.len(), FACIAL_VOCABULARY.len());
        for pair in analysis.results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}
