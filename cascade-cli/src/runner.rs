//! Trigger-and-wait workflow
//!
//! Triggers one pipeline run per request, eagerly, so the runs execute
//! concurrently on the host; then polls each run in trigger order until it
//! reaches a terminal status.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use cascade_client::{ClientError, PipelineService};
use cascade_core::domain::pipeline::{Pipeline, PipelineStatus};
use cascade_core::dto::pipeline::TriggerPipeline;

/// Errors surfaced by the trigger-and-wait workflow
#[derive(Debug, Error)]
pub enum RunError {
    /// A remote call failed (network, auth, 4xx/5xx). Never retried.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A run reached a terminal status other than success
    #[error("pipeline {id} finished with status <{status}>")]
    PipelineFailed { id: u64, status: PipelineStatus },

    /// A run did not reach a terminal status before the deadline
    #[error("timed out waiting for pipeline {id}")]
    TimedOut { id: u64 },
}

/// Drives the trigger-and-wait workflow against one project
///
/// Generic over [`PipelineService`] so tests can script the host's answers.
pub struct PipelineRunner<S> {
    service: S,
    project: String,
    poll_interval: Duration,
    wait_timeout: Option<Duration>,
}

impl<S: PipelineService> PipelineRunner<S> {
    pub fn new(service: S, project: impl Into<String>) -> Self {
        Self {
            service,
            project: project.into(),
            poll_interval: Duration::from_secs(10),
            wait_timeout: None,
        }
    }

    /// Sets how long to sleep between status polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets an upper bound on how long `wait` may poll a single run
    ///
    /// `None` waits indefinitely; CI-side job timeouts are then the only
    /// bound.
    pub fn with_wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Trigger a new pipeline run
    pub async fn trigger(&self, request: &TriggerPipeline) -> Result<Pipeline, RunError> {
        info!("Triggering pipeline.");
        info!("Reference: {}", request.reference);
        info!("Variables:");
        for (key, value) in &request.variables {
            info!("{}: {}", key, value);
        }

        let pipeline = self
            .service
            .trigger_pipeline(&self.project, request)
            .await?;

        debug!("Result: {:?}", pipeline);
        info!("Triggered: {}", pipeline.web_url);
        Ok(pipeline)
    }

    /// Wait for a run to finish
    ///
    /// Re-fetches the run on the poll interval until its status is
    /// terminal; never returns while the observed status is still
    /// non-terminal. A terminal status other than success is an error.
    pub async fn wait(&self, handle: &Pipeline) -> Result<PipelineStatus, RunError> {
        let deadline = self.wait_timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let pipeline = self.service.get_pipeline(&self.project, handle.id).await?;

            if pipeline.status.is_terminal() {
                info!(
                    "Pipeline {} finished with status <{}>",
                    pipeline.id, pipeline.status
                );
                return match pipeline.status {
                    PipelineStatus::Success => Ok(pipeline.status),
                    status => Err(RunError::PipelineFailed {
                        id: pipeline.id,
                        status,
                    }),
                };
            }

            info!("Pipeline {} is still running.", pipeline.id);

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(RunError::TimedOut { id: pipeline.id });
                }
            }

            time::sleep(self.poll_interval).await;
        }
    }

    /// Trigger every request, then wait on every triggered run
    ///
    /// All requests are triggered before the first wait, in input order; a
    /// trigger failure aborts the whole batch. Waiting then proceeds in
    /// trigger order. Every handle is waited on even after a run has
    /// already failed, and the first failure is what gets returned. A
    /// transport error while polling aborts immediately.
    pub async fn run_all(&self, requests: &[TriggerPipeline]) -> Result<(), RunError> {
        let mut triggered = Vec::with_capacity(requests.len());
        for request in requests {
            triggered.push(self.trigger(request).await?);
        }

        let mut first_failure = None;
        for pipeline in &triggered {
            match self.wait(pipeline).await {
                Ok(_) => {}
                Err(err @ RunError::Client(_)) => return Err(err),
                Err(err) => {
                    warn!("{}", err);
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
