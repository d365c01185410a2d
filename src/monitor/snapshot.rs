use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fusion::{AnalysisEntry, FusedScore};

/// Read model handed to the dashboard layer: everything one render needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WellbeingSnapshot {
    pub generated_at: DateTime<Utc>,
    pub fused: Vec<FusedScore>,
    pub recent_analysis: Vec<AnalysisEntry>,
    pub assessment: String,
    pub last_voice_emotion: Option<String>,
    pub last_facial_emotion: Option<String>,
}
