use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::classify::{FrameClassifier, FrameSource};
use crate::metrics::{skip_reason, FrameSampleMetrics, MetricsCollector};
use crate::monitor::WellbeingMonitor;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_error, log_info, log_warn};

const SAMPLE_TIMEOUT_SECS: u64 = 10;

/// Periodic facial sampling: capture a frame, classify it off-thread, feed
/// the analysis to the monitor. Runs until the token is cancelled; when the
/// camera stops, existing readings are left to decay rather than being
/// force-cleared.
pub async fn facial_sampling_loop(
    session_id: String,
    monitor: WellbeingMonitor,
    camera: Arc<dyn FrameSource>,
    classifier: Arc<dyn FrameClassifier>,
    metrics: MetricsCollector,
    frame_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = sample_frame(&session_id, &monitor, &camera, &classifier, &metrics);

                match tokio::time::timeout(Duration::from_secs(SAMPLE_TIMEOUT_SECS), fut).await {
                    Ok(Ok(())) => {},
                    Ok(Err(err)) => log_error!("frame sampling failed for session {}: {err:?}", session_id),
                    Err(_) => log_warn!("frame sampling timeout (> {}s) session {}", SAMPLE_TIMEOUT_SECS, session_id),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("facial sampling loop shutting down");
                break;
            }
        }
    }
}

async fn sample_frame(
    session_id: &str,
    monitor: &WellbeingMonitor,
    camera: &Arc<dyn FrameSource>,
    classifier: &Arc<dyn FrameClassifier>,
    metrics: &MetricsCollector,
) -> Result<()> {
    let sample_start = Instant::now();
    let timestamp = Utc::now();

    let capture_start = Instant::now();
    let frame = tokio::task::spawn_blocking({
        let camera = Arc::clone(camera);
        move || camera.capture()
    })
    .await
    .context("frame capture worker join failed")?
    .context("frame capture failed")?;
    let capture_ms = capture_start.elapsed().as_millis() as u64;

    let Some(frame) = frame else {
        metrics
            .record_frame(skipped(timestamp, capture_ms, sample_start, skip_reason::NO_FRAME))
            .await;
        return Ok(());
    };

    let classify_start = Instant::now();
    let analysis = tokio::task::spawn_blocking({
        let classifier = Arc::clone(classifier);
        move || classifier.classify_frame(&frame)
    })
    .await
    .context("frame classifier worker join failed")?
    .context("frame classification failed")?;
    let classify_ms = classify_start.elapsed().as_millis() as u64;

    if analysis.is_too_dark {
        log_info!("frame too dark, suppressing sample for session {}", session_id);
        metrics
            .record_frame(skipped(timestamp, capture_ms, sample_start, skip_reason::TOO_DARK))
            .await;
        return Ok(());
    }

    if analysis.results.is_empty() {
        metrics
            .record_frame(skipped(timestamp, capture_ms, sample_start, skip_reason::EMPTY_BATCH))
            .await;
        return Ok(());
    }

    monitor.handle_frame_analysis(analysis, Utc::now()).await;

    metrics
        .record_frame(FrameSampleMetrics {
            timestamp,
            capture_ms,
            classify_ms: Some(classify_ms),
            skipped_reason: None,
            total_ms: sample_start.elapsed().as_millis() as u64,
        })
        .await;

    Ok(())
}

fn skipped(
    timestamp: chrono::DateTime<Utc>,
    capture_ms: u64,
    sample_start: Instant,
    reason: &str,
) -> FrameSampleMetrics {
    FrameSampleMetrics {
        timestamp,
        capture_ms,
        classify_ms: None,
        skipped_reason: Some(reason.to_string()),
        total_ms: sample_start.elapsed().as_millis() as u64,
    }
}
