use serde::{Deserialize, Serialize};

/// Tunable constants for the fusion engine.
///
/// The staleness window and the decay step/floor are independently chosen
/// magic numbers inherited from the observed system behavior; they are kept
/// as separate named fields rather than derived from one another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionConfig {
    /// Blend weight for the voice modality. Must sum to 1.0 with `facial_weight`.
    pub voice_weight: f64,
    pub facial_weight: f64,

    /// Maximum age of a per-modality reading before it is excluded from the blend.
    pub staleness_window_secs: i64,

    /// Per-recompute decay applied to a category with no valid reading.
    pub decay_step: f64,
    pub decay_floor: f64,

    /// Analysis log retains at most this many entries.
    pub log_capacity: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            voice_weight: 0.6,
            facial_weight: 0.4,
            staleness_window_secs: 30,
            decay_step: 2.0,
            decay_floor: 10.0,
            log_capacity: 10,
        }
    }
}

impl FusionConfig {
    /// Weights are valid when both lie in [0, 1] and sum to 1.0.
    pub fn weights_are_valid(&self) -> bool {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        in_range(self.voice_weight)
            && in_range(self.facial_weight)
            && (self.voice_weight + self.facial_weight - 1.0).abs() < 1e-9
    }
}
