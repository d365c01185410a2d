use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::classify::{FrameClassifier, FrameSource};
use crate::metrics::MetricsCollector;
use crate::monitor::WellbeingMonitor;

use super::loop_worker::facial_sampling_loop;

pub struct SamplingController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn start_sampling(
        &mut self,
        session_id: String,
        monitor: WellbeingMonitor,
        camera: Arc<dyn FrameSource>,
        classifier: Arc<dyn FrameClassifier>,
        metrics: MetricsCollector,
        frame_interval: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("facial sampling already active");
        }

        info!("starting facial sampling for session {session_id}");

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(facial_sampling_loop(
            session_id,
            monitor,
            camera,
            classifier,
            metrics,
            frame_interval,
            token_clone,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop_sampling(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("facial sampling task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SamplingController {
    fn default() -> Self {
        Self::new()
    }
}
