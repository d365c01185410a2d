pub mod aggregate;
pub mod analysis_log;
pub mod config;
pub mod engine;
pub mod mapping;
pub mod narrator;

pub use aggregate::{aggregate, dominant, CategoryAverages};
pub use analysis_log::{display_label, AnalysisEntry, AnalysisLog, AnalysisSource};
pub use config::FusionConfig;
pub use engine::{CategoryReading, FusedScore, FusionEngine};
pub use mapping::{map_to_category, Category, Modality};
pub use narrator::narrate;
