//! Pipeline domain types

use serde::{Deserialize, Serialize};

/// Status of a pipeline run as reported by the CI host.
///
/// The host distinguishes more states than the trigger workflow cares about
/// (`created`, `pending`, `preparing`, ...); every wire status that is not
/// terminal deserializes as `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Success,
    Failed,
    Canceled,
    #[serde(other)]
    Running,
}

impl PipelineStatus {
    /// True once the host will no longer transition the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineStatus::Running)
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStatus::Success => "success",
            PipelineStatus::Failed => "failed",
            PipelineStatus::Canceled => "canceled",
            PipelineStatus::Running => "running",
        };
        write!(f, "{}", name)
    }
}

/// Pipeline run record
///
/// The handle the host assigns when a run is triggered. `status` reflects
/// the state at fetch time; waiting on a run means re-fetching this record
/// until `status` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: PipelineStatus,
    pub web_url: String,
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(PipelineStatus::Success.is_terminal());
        assert!(PipelineStatus::Failed.is_terminal());
        assert!(PipelineStatus::Canceled.is_terminal());
        assert!(!PipelineStatus::Running.is_terminal());
    }

    #[test]
    fn test_unknown_wire_status_is_running() {
        for wire in ["\"created\"", "\"pending\"", "\"preparing\"", "\"running\""] {
            let status: PipelineStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(status, PipelineStatus::Running);
        }
    }

    #[test]
    fn test_terminal_wire_statuses() {
        let status: PipelineStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, PipelineStatus::Success);
        let status: PipelineStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, PipelineStatus::Failed);
        let status: PipelineStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(status, PipelineStatus::Canceled);
    }

    #[test]
    fn test_pipeline_deserializes_host_object() {
        // Trimmed-down host response; unknown fields are ignored.
        let body = r#"{
            "id": 287,
            "iid": 42,
            "project_id": 21,
            "status": "pending",
            "ref": "debian/unstable",
            "sha": "0ec9e58f",
            "web_url": "https://example.org/group/project/-/pipelines/287",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:05Z"
        }"#;

        let pipeline: Pipeline = serde_json::from_str(body).unwrap();
        assert_eq!(pipeline.id, 287);
        assert_eq!(pipeline.status, PipelineStatus::Running);
        assert_eq!(pipeline.ref_name.as_deref(), Some("debian/unstable"));
        assert!(pipeline.web_url.ends_with("/pipelines/287"));
    }
}
