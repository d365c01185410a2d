use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::fusion::FusionConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingSettings {
    /// Seconds between facial frames while the camera is active.
    pub frame_interval_secs: u64,
    /// Mean-luma cutoff below which a frame is reported as too dark.
    pub darkness_threshold: f64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            frame_interval_secs: 2,
            darkness_threshold: crate::classify::DEFAULT_DARKNESS_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    fusion: FusionConfig,
    sampling: SamplingSettings,
}

/// JSON-file-backed store for the fusion and sampling tunables.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Current fusion tunables. Weights that do not sum to 1 would skew
    /// every blend, so an invalid file falls back to defaults with a warning.
    pub fn fusion(&self) -> FusionConfig {
        let config = self.data.read().unwrap().fusion.clone();
        if config.weights_are_valid() {
            config
        } else {
            warn!(
                "modality weights {}+{} do not sum to 1, using defaults",
                config.voice_weight, config.facial_weight
            );
            FusionConfig::default()
        }
    }

    pub fn sampling(&self) -> SamplingSettings {
        self.data.read().unwrap().sampling.clone()
    }

    pub fn update_fusion(&self, fusion: FusionConfig) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.fusion = fusion;
        self.persist(&guard)
    }

    pub fn update_sampling(&self, sampling: SamplingSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.sampling = sampling;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
