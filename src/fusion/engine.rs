use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fusion::aggregate::CategoryAverages;
use crate::fusion::config::FusionConfig;
use crate::fusion::mapping::{Category, Modality};

/// Latest aggregated score for one (modality, category) pair. Overwritten in
/// place on each new sampling event for that modality; never explicitly
/// deleted, readings simply age out of the blend.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReading {
    pub category: Category,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Blended per-category score. The contributions are diagnostic display
/// fields, not inputs to further computation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FusedScore {
    pub category: Category,
    pub combined: f64,
    pub voice_contribution: f64,
    pub facial_contribution: f64,
}

/// Freshness-weighted fusion over the 2x4 reading slots.
///
/// A modality that stops reporting must not instantly zero out its
/// contribution, but must not be trusted forever either: the staleness
/// window bounds how long a reading influences the blend, after which the
/// category decays gracefully from the engine's own last output.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    config: FusionConfig,
    slots: [[Option<CategoryReading>; Category::COUNT]; Modality::COUNT],
    /// Last computed combined score per category, the baseline the decay
    /// rule works from when neither modality has a valid reading.
    last_combined: [f64; Category::COUNT],
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            slots: [[None; Category::COUNT]; Modality::COUNT],
            last_combined: [0.0; Category::COUNT],
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Overwrite the slot for this (modality, category) pair.
    pub fn record_reading(
        &mut self,
        modality: Modality,
        category: Category,
        value: f64,
        now: DateTime<Utc>,
    ) {
        self.slots[modality.index()][category.index()] = Some(CategoryReading {
            category,
            value: value.clamp(0.0, 100.0),
            timestamp: now,
        });
    }

    /// Record every category present in an aggregated sampling event.
    /// Omitted categories keep their previous slot untouched.
    pub fn apply_averages(
        &mut self,
        modality: Modality,
        averages: &CategoryAverages,
        now: DateTime<Utc>,
    ) {
        for (category, value) in averages.iter() {
            self.record_reading(modality, category, value, now);
        }
    }

    pub fn reading(&self, modality: Modality, category: Category) -> Option<CategoryReading> {
        self.slots[modality.index()][category.index()]
    }

    /// Recompute all four fused scores at `now`.
    ///
    /// Takes `&mut self` because the decay rule is hysteretic: a category
    /// with no valid reading steps down from the engine's last output,
    /// which this call updates. Callers must not interleave this with
    /// `record_reading` from another thread (the monitor's mutex does that).
    pub fn compute_fused(&mut self, now: DateTime<Utc>) -> Vec<FusedScore> {
        Category::ALL
            .iter()
            .map(|&category| self.fuse_category(category, now))
            .collect()
    }

    fn fuse_category(&mut self, category: Category, now: DateTime<Utc>) -> FusedScore {
        let voice = self.valid_value(Modality::Voice, category, now);
        let facial = self.valid_value(Modality::Facial, category, now);

        // An invalid reading is excluded outright, not zero-weighted-in: the
        // surviving modality is used at full strength.
        let combined = match (voice, facial) {
            (Some(v), Some(f)) => {
                (v * self.config.voice_weight + f * self.config.facial_weight).round()
            }
            (Some(v), None) => v.round(),
            (None, Some(f)) => f.round(),
            (None, None) => {
                (self.last_combined[category.index()] - self.config.decay_step)
                    .max(self.config.decay_floor)
            }
        };
        let combined = combined.clamp(0.0, 100.0);
        self.last_combined[category.index()] = combined;

        FusedScore {
            category,
            combined,
            voice_contribution: voice.map(f64::round).unwrap_or(0.0),
            facial_contribution: facial.map(f64::round).unwrap_or(0.0),
        }
    }

    /// A slot's value, provided the reading is strictly younger than the
    /// staleness window. Age equal to the window is already stale.
    fn valid_value(&self, modality: Modality, category: Category, now: DateTime<Utc>) -> Option<f64> {
        self.slots[modality.index()][category.index()]
            .filter(|reading| {
                now.signed_duration_since(reading.timestamp).num_seconds()
                    < self.config.staleness_window_secs
            })
            .map(|reading| reading.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn engine() -> FusionEngine {
        FusionEngine::new(FusionConfig::default())
    }

    fn score_for(scores: &[FusedScore], category: Category) -> FusedScore {
        scores
            .iter()
            .find(|s| s.category == category)
            .copied()
            .expect("category missing from fused scores")
    }

    #[test]
    fn blends_both_modalities_with_fixed_weights() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Stress, 80.0, t0);
        engine.record_reading(Modality::Facial, Category::Stress, 40.0, t0);

        let scores = engine.compute_fused(t0);
        let stress = score_for(&scores, Category::Stress);
        assert_eq!(stress.combined, 64.0); // round(80*0.6 + 40*0.4)
        assert_eq!(stress.voice_contribution, 80.0);
        assert_eq!(stress.facial_contribution, 40.0);
    }

    #[test]
    fn single_valid_modality_is_used_at_full_strength() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Fatigue, 60.0, t0);

        let fatigue = score_for(&engine.compute_fused(t0), Category::Fatigue);
        assert_eq!(fatigue.combined, 60.0);
        assert_eq!(fatigue.voice_contribution, 60.0);
        assert_eq!(fatigue.facial_contribution, 0.0);
    }

    #[test]
    fn stale_readings_drop_out_of_the_blend() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Stress, 80.0, t0);
        engine.record_reading(Modality::Facial, Category::Stress, 40.0, t0 + Duration::seconds(20));

        // At t0+31s the voice reading (age 31) is stale, the facial one (age 11) is not.
        let scores = engine.compute_fused(t0 + Duration::seconds(31));
        let stress = score_for(&scores, Category::Stress);
        assert_eq!(stress.combined, 40.0);
        assert_eq!(stress.voice_contribution, 0.0);
    }

    #[test]
    fn age_equal_to_the_window_is_stale() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Calm, 90.0, t0);

        let calm = score_for(&engine.compute_fused(t0 + Duration::seconds(30)), Category::Calm);
        assert_eq!(calm.voice_contribution, 0.0);
    }

    #[test]
    fn decays_monotonically_to_the_floor_when_no_reading_is_valid() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Stress, 80.0, t0);
        assert_eq!(score_for(&engine.compute_fused(t0), Category::Stress).combined, 80.0);

        let later = t0 + Duration::seconds(31);
        let mut previous = 80.0;
        for _ in 0..50 {
            let stress = score_for(&engine.compute_fused(later), Category::Stress);
            assert!(stress.combined <= previous, "decay must never increase");
            assert!(stress.combined >= 10.0, "decay must floor at 10");
            previous = stress.combined;
        }
        assert_eq!(previous, 10.0);
    }

    #[test]
    fn first_decay_step_is_two_below_the_last_output() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Stress, 80.0, t0);
        engine.compute_fused(t0);

        let stress = score_for(&engine.compute_fused(t0 + Duration::seconds(31)), Category::Stress);
        assert_eq!(stress.combined, 78.0);
    }

    #[test]
    fn untouched_categories_sit_at_the_decay_floor() {
        let mut engine = engine();
        let focus = score_for(&engine.compute_fused(Utc::now()), Category::Focus);
        assert_eq!(focus.combined, 10.0);
    }

    #[test]
    fn combined_never_leaves_bounds_even_with_misconfigured_weights() {
        // Weights summing past 1.0 are a config bug, but the final clamp
        // still holds the output inside [0, 100].
        let config = FusionConfig {
            voice_weight: 0.7,
            facial_weight: 0.6,
            ..FusionConfig::default()
        };
        let mut engine = FusionEngine::new(config);
        let t0 = Utc::now();
        engine.record_reading(Modality::Voice, Category::Stress, 100.0, t0);
        engine.record_reading(Modality::Facial, Category::Stress, 100.0, t0);

        let stress = score_for(&engine.compute_fused(t0), Category::Stress);
        assert_eq!(stress.combined, 100.0);
    }

    #[test]
    fn new_readings_overwrite_the_slot() {
        let mut engine = engine();
        let t0 = Utc::now();
        engine.record_reading(Modality::Facial, Category::Calm, 50.0, t0);
        engine.record_reading(Modality::Facial, Category::Calm, 90.0, t0 + Duration::seconds(2));

        let calm = score_for(&engine.compute_fused(t0 + Duration::seconds(2)), Category::Calm);
        assert_eq!(calm.combined, 90.0);
    }
}
