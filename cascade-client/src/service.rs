//! Pipeline service abstraction
//!
//! The trigger workflow talks to the host through this trait, so tests can
//! substitute a scripted implementation for the real HTTP client.

use async_trait::async_trait;

use crate::GitlabClient;
use crate::error::Result;
use cascade_core::domain::pipeline::Pipeline;
use cascade_core::dto::pipeline::TriggerPipeline;

/// Remote operations the trigger workflow needs from a CI host
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Create a new pipeline run for `project`
    async fn trigger_pipeline(&self, project: &str, req: &TriggerPipeline) -> Result<Pipeline>;

    /// Fetch the current state of run `id` in `project`
    async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline>;
}

#[async_trait]
impl PipelineService for GitlabClient {
    async fn trigger_pipeline(&self, project: &str, req: &TriggerPipeline) -> Result<Pipeline> {
        GitlabClient::trigger_pipeline(self, project, req).await
    }

    async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline> {
        GitlabClient::get_pipeline(self, project, id).await
    }
}
