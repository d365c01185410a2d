pub mod classify;
pub mod fusion;
pub mod metrics;
pub mod monitor;
pub mod sampling;
pub mod settings;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use classify::{
    FrameClassifier, FrameSource, RemoteEmotionClient, SimulatedCamera, SimulatedFrameClassifier,
    SimulatedVoiceClassifier, VoiceClassifier,
};
use metrics::MetricsCollector;
use monitor::WellbeingMonitor;
use sampling::SamplingController;
use settings::SettingsStore;

const VOICE_SAMPLE_INTERVAL_SECS: u64 = 7;
const SNAPSHOT_INTERVAL_SECS: u64 = 5;

/// Run the monitor headless with simulated classifiers, emitting one
/// dashboard snapshot per line on stdout until interrupted.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("CrewSense starting up...");

    let settings_path = std::env::var("CREWSENSE_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("crewsense-settings.json"));
    let settings = SettingsStore::new(settings_path)?;
    let fusion_config = settings.fusion();
    let sampling_settings = settings.sampling();

    // If a classification backend is configured, report its reachability up
    // front; the library caller decides whether to route recordings there.
    if let Ok(api_base) = std::env::var("CREWSENSE_API_BASE") {
        let client = RemoteEmotionClient::new(api_base.clone())?;
        match tokio::task::spawn_blocking(move || client.health_check()).await? {
            Ok(true) => info!("remote classification backend at {api_base} is healthy"),
            Ok(false) => info!("remote classification backend at {api_base} is down"),
            Err(err) => error!("remote backend health check failed: {err:?}"),
        }
    }

    let monitor = WellbeingMonitor::new(fusion_config);
    let metrics = MetricsCollector::new();

    let camera: Arc<dyn FrameSource> = Arc::new(SimulatedCamera::new(0.05));
    let frame_classifier: Arc<dyn FrameClassifier> = Arc::new(SimulatedFrameClassifier::new(
        sampling_settings.darkness_threshold,
    ));
    let voice_classifier: Arc<dyn VoiceClassifier> = Arc::new(SimulatedVoiceClassifier::new());

    let session_id = Uuid::new_v4().to_string();
    info!("monitoring session {session_id} started");

    let mut sampling = SamplingController::new();
    sampling.start_sampling(
        session_id.clone(),
        monitor.clone(),
        camera,
        frame_classifier,
        metrics.clone(),
        Duration::from_secs(sampling_settings.frame_interval_secs),
    )?;

    let voice_cancel = CancellationToken::new();
    let voice_handle = tokio::spawn(voice_sample_loop(
        monitor.clone(),
        voice_classifier,
        metrics.clone(),
        voice_cancel.clone(),
    ));

    let mut snapshot_ticker = interval(Duration::from_secs(SNAPSHOT_INTERVAL_SECS));
    loop {
        tokio::select! {
            _ = snapshot_ticker.tick() => {
                let snapshot = monitor.snapshot(Utc::now()).await;
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down session {session_id}");
    voice_cancel.cancel();
    let _ = voice_handle.await;
    sampling.stop_sampling().await?;
    monitor.clear_facial_display().await;

    let totals = metrics.get_snapshot().await;
    info!(
        "session {}: {} frames sampled ({} classified, {} dark), {} voice samples",
        session_id,
        totals.frame_count,
        totals.classified_count,
        totals.dark_skip_count,
        totals.voice_sample_count
    );

    Ok(())
}

/// Simulated recording sessions: one utterance classified every few seconds,
/// feeding the voice side of the fusion engine.
async fn voice_sample_loop(
    monitor: WellbeingMonitor,
    classifier: Arc<dyn VoiceClassifier>,
    metrics: MetricsCollector,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(Duration::from_secs(VOICE_SAMPLE_INTERVAL_SECS));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let classifier = Arc::clone(&classifier);
                let result = tokio::task::spawn_blocking(move || {
                    classifier.classify_transcript("status report nominal")
                })
                .await;

                match result {
                    Ok(Ok(results)) => {
                        monitor.handle_voice_results(&results, Utc::now()).await;
                        metrics.record_voice_sample().await;
                    }
                    Ok(Err(err)) => error!("voice classification failed: {err:?}"),
                    Err(err) => error!("voice classifier worker join failed: {err}"),
                }
            }
            _ = cancel_token.cancelled() => break,
        }
    }
}
