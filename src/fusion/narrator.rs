use crate::fusion::config::FusionConfig;
use crate::fusion::engine::FusedScore;

/// Derive the one-sentence assessment shown under the live state panel.
///
/// Pure over its inputs: picks one of four templates depending on which
/// modalities have reported, parameterized by the dominant category and
/// the modality weights expressed as percentages. Always returns a value.
pub fn narrate(
    scores: &[FusedScore],
    last_voice_emotion: Option<&str>,
    last_facial_emotion: Option<&str>,
    config: &FusionConfig,
) -> String {
    let dominant = dominant_score(scores);
    let (state, level) = match dominant {
        Some(score) => (score.category.as_str(), score.combined.round() as i64),
        None => ("Calm", 0),
    };
    let voice_pct = (config.voice_weight * 100.0).round() as i64;
    let facial_pct = (config.facial_weight * 100.0).round() as i64;

    match (last_voice_emotion, last_facial_emotion) {
        (Some(voice), Some(facial)) => format!(
            "Voice analysis indicates {voice} while facial expression reads {facial}. \
             Weighted blend ({voice_pct}% voice, {facial_pct}% facial) places the crew \
             member's dominant state at {state} ({level}%)."
        ),
        (Some(voice), None) => format!(
            "Voice analysis indicates {voice}; no recent facial reading, so the \
             assessment rests on the voice channel ({voice_pct}% weighting). Dominant \
             state: {state} ({level}%)."
        ),
        (None, Some(facial)) => format!(
            "Facial expression reads {facial}; no recent voice reading, so the \
             assessment rests on the facial channel ({facial_pct}% weighting). Dominant \
             state: {state} ({level}%)."
        ),
        (None, None) => format!(
            "No classifier activity yet. Scores are holding at baseline; dominant \
             state {state} ({level}%) within nominal mission parameters."
        ),
    }
}

fn dominant_score(scores: &[FusedScore]) -> Option<FusedScore> {
    let mut best: Option<FusedScore> = None;
    for &score in scores {
        match best {
            Some(current) if score.combined <= current.combined => {}
            _ => best = Some(score),
        }
    }
    best
}
