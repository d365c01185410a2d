use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which channel produced a log entry. Combined entries summarize both
/// modalities at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisSource {
    Voice,
    Facial,
    Combined,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Voice => "Voice",
            AnalysisSource::Facial => "Facial",
            AnalysisSource::Combined => "Combined",
        }
    }
}

/// One event in the recent-analysis feed. Immutable once created; evicted
/// only by capacity overflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEntry {
    /// Wall-clock "HH:MM" display time.
    pub time: String,
    pub source: AnalysisSource,
    pub emotion: String,
    pub confidence: f64,
}

/// Bounded, ordered history of dominant-emotion events, most-recent-first.
#[derive(Debug, Clone)]
pub struct AnalysisLog {
    entries: VecDeque<AnalysisEntry>,
    capacity: usize,
}

impl AnalysisLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event unless the most recent entry of the same source type
    /// already carries this emotion label; a modality repeatedly reporting
    /// the same dominant emotion every tick must not spam the feed.
    /// Returns whether the entry was inserted.
    pub fn log_event(
        &mut self,
        source: AnalysisSource,
        emotion: &str,
        confidence: f64,
        now: DateTime<Utc>,
    ) -> bool {
        if let Some(latest) = self.entries.iter().find(|entry| entry.source == source) {
            if latest.emotion == emotion {
                return false;
            }
        }

        self.entries.push_front(AnalysisEntry {
            time: now.format("%H:%M").to_string(),
            source,
            emotion: emotion.to_string(),
            confidence: confidence.clamp(0.0, 100.0),
        });

        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        true
    }

    /// Most-recent-first snapshot of the feed.
    pub fn entries(&self) -> Vec<AnalysisEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw classifier labels are lowercase; the feed shows them capitalized.
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_repeated_emotion_per_source() {
        let mut log = AnalysisLog::new(10);
        let now = Utc::now();
        assert!(log.log_event(AnalysisSource::Facial, "Calm", 80.0, now));
        assert!(!log.log_event(AnalysisSource::Facial, "Calm", 85.0, now));
        assert_eq!(log.len(), 1);

        assert!(log.log_event(AnalysisSource::Facial, "Focus", 70.0, now));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn deduplication_is_scoped_to_the_source_type() {
        let mut log = AnalysisLog::new(10);
        let now = Utc::now();
        assert!(log.log_event(AnalysisSource::Facial, "Calm", 80.0, now));
        assert!(log.log_event(AnalysisSource::Voice, "Calm", 75.0, now));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut log = AnalysisLog::new(10);
        let now = Utc::now();
        for i in 0..12 {
            assert!(log.log_event(AnalysisSource::Voice, &format!("emotion-{i}"), 50.0, now));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), 10);
        // Most recent first, oldest two evicted.
        assert_eq!(entries[0].emotion, "emotion-11");
        assert_eq!(entries[9].emotion, "emotion-2");
    }

    #[test]
    fn renders_wall_clock_time() {
        let mut log = AnalysisLog::new(10);
        let now = "2026-08-29T14:32:09Z".parse::<DateTime<Utc>>().unwrap();
        log.log_event(AnalysisSource::Voice, "Calm", 80.0, now);
        assert_eq!(log.entries()[0].time, "14:32");
    }

    #[test]
    fn display_label_capitalizes() {
        assert_eq!(display_label("sadness"), "Sadness");
        assert_eq!(display_label(""), "");
    }
}
