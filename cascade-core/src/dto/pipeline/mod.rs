//! Pipeline DTOs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to trigger a new pipeline run
///
/// One instance is built per requested release label. `variables` is a
/// `BTreeMap` so logging and form encoding are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerPipeline {
    pub reference: String,
    pub token: String,
    pub variables: BTreeMap<String, String>,
}
