use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::classify::{FrameAnalysis, RawClassification};
use crate::fusion::{
    aggregate, display_label, dominant, narrate, AnalysisLog, AnalysisSource, FusedScore,
    FusionConfig, FusionEngine, Modality,
};

use super::WellbeingSnapshot;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the fusion engine, the analysis log, and the last-seen dominant
/// emotion per modality behind a single mutex: a `record` + `compute` pair
/// never interleaves with another, which the decay hysteresis depends on.
///
/// Both classifier pipelines feed this from their own tasks; "now" is
/// always passed in by the caller, never read here.
#[derive(Clone)]
pub struct WellbeingMonitor {
    state: Arc<Mutex<MonitorState>>,
    config: FusionConfig,
}

struct MonitorState {
    engine: FusionEngine,
    log: AnalysisLog,
    last_voice_emotion: Option<String>,
    last_facial_emotion: Option<String>,
}

impl WellbeingMonitor {
    pub fn new(config: FusionConfig) -> Self {
        let state = MonitorState {
            engine: FusionEngine::new(config.clone()),
            log: AnalysisLog::new(config.log_capacity),
            last_voice_emotion: None,
            last_facial_emotion: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            config,
        }
    }

    /// Ingest one voice sampling event. Empty batches are a no-op: existing
    /// slots are left untouched and decay naturally.
    pub async fn handle_voice_results(&self, results: &[RawClassification], now: DateTime<Utc>) {
        if results.is_empty() {
            return;
        }

        let averages = aggregate(Modality::Voice, results);
        let mut state = self.state.lock().await;
        state.engine.apply_averages(Modality::Voice, &averages, now);

        if let Some(top) = dominant(results) {
            let label = display_label(&top.label);
            log_info!("voice dominant emotion: {} ({}%)", label, top.confidence);
            state.log.log_event(AnalysisSource::Voice, &label, top.confidence, now);
            state.last_voice_emotion = Some(label);
        }

        let fused = state.engine.compute_fused(now);
        Self::maybe_log_combined(&mut state, &fused, now);
    }

    /// Ingest one facial sampling event. A too-dark frame is treated
    /// identically to an empty batch: suppressed, no slot overwrite, no
    /// log entry.
    pub async fn handle_frame_analysis(&self, analysis: FrameAnalysis, now: DateTime<Utc>) {
        if analysis.is_too_dark || analysis.results.is_empty() {
            return;
        }

        let averages = aggregate(Modality::Facial, &analysis.results);
        let mut state = self.state.lock().await;
        state.engine.apply_averages(Modality::Facial, &averages, now);

        if let Some(top) = dominant(&analysis.results) {
            let label = display_label(&top.label);
            log_info!("facial dominant emotion: {} ({}%)", label, top.confidence);
            state.log.log_event(AnalysisSource::Facial, &label, top.confidence, now);
            state.last_facial_emotion = Some(label);
        }

        let fused = state.engine.compute_fused(now);
        Self::maybe_log_combined(&mut state, &fused, now);
    }

    /// Fused scores, recent analysis, and the assessment sentence at `now`.
    /// Computing applies the decay rule, so repeated reads with no new
    /// readings step stale categories toward the floor.
    pub async fn snapshot(&self, now: DateTime<Utc>) -> WellbeingSnapshot {
        let mut state = self.state.lock().await;
        let fused = state.engine.compute_fused(now);
        let assessment = narrate(
            &fused,
            state.last_voice_emotion.as_deref(),
            state.last_facial_emotion.as_deref(),
            &self.config,
        );

        WellbeingSnapshot {
            generated_at: now,
            fused,
            recent_analysis: state.log.entries(),
            assessment,
            last_voice_emotion: state.last_voice_emotion.clone(),
            last_facial_emotion: state.last_facial_emotion.clone(),
        }
    }

    /// Clear the facial display label when the camera stops. The facial
    /// reading slots are deliberately left in place to age out on their own.
    pub async fn clear_facial_display(&self) {
        self.state.lock().await.last_facial_emotion = None;
    }

    /// One Combined feed entry once both modalities have reported: label is
    /// the pair of last dominant emotions, confidence the mean of the four
    /// current combined scores. Subject to the same de-duplication rule.
    fn maybe_log_combined(state: &mut MonitorState, fused: &[FusedScore], now: DateTime<Utc>) {
        let (Some(voice), Some(facial)) = (
            state.last_voice_emotion.as_deref(),
            state.last_facial_emotion.as_deref(),
        ) else {
            return;
        };

        let label = format!("{voice} + {facial}");
        let mean_combined = if fused.is_empty() {
            0.0
        } else {
            fused.iter().map(|score| score.combined).sum::<f64>() / fused.len() as f64
        };
        state
            .log
            .log_event(AnalysisSource::Combined, &label, mean_combined, now);
    }
}
