//! Pipeline-related API endpoints

use crate::GitlabClient;
use crate::error::Result;
use cascade_core::domain::pipeline::Pipeline;
use cascade_core::dto::pipeline::TriggerPipeline;
use tracing::debug;

impl GitlabClient {
    // =============================================================================
    // Pipeline Trigger + Status
    // =============================================================================

    /// Trigger a new pipeline run
    ///
    /// Sends the reference, trigger token and variables as form fields to
    /// the host's trigger endpoint. Every call creates a new run on the
    /// host; this is not idempotent.
    ///
    /// # Arguments
    /// * `project` - Numeric id or namespace path of the target project
    /// * `req` - The trigger request
    ///
    /// # Returns
    /// The pipeline run the host assigned
    pub async fn trigger_pipeline(&self, project: &str, req: &TriggerPipeline) -> Result<Pipeline> {
        let url = format!(
            "{}/api/v4/projects/{}/trigger/pipeline",
            self.base_url,
            Self::project_path(project)
        );

        // The trigger endpoint takes form data, with one variables[KEY]
        // field per pipeline variable.
        let mut form: Vec<(String, String)> = vec![
            ("token".to_string(), req.token.clone()),
            ("ref".to_string(), req.reference.clone()),
        ];
        for (key, value) in &req.variables {
            form.push((format!("variables[{}]", key), value.clone()));
        }

        debug!("POST {}", url);
        let response = self.client.post(&url).form(&form).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the current state of a pipeline run
    ///
    /// # Arguments
    /// * `project` - Numeric id or namespace path of the target project
    /// * `id` - The pipeline id assigned at trigger time
    pub async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline> {
        let url = format!(
            "{}/api/v4/projects/{}/pipelines/{}",
            self.base_url,
            Self::project_path(project),
            id
        );

        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
