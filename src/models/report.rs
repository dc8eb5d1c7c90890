use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::LabStatus;
use super::opaque_id;

/// One extracted lab parameter: measured value, unit, and the status the
/// extraction service assigned against its reference policy. The client
/// never recomputes the status from the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub status: LabStatus,
}

/// A single uploaded document plus its server-derived lab analysis.
/// Immutable once cached; never deleted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(with = "opaque_id")]
    pub report_id: String,
    #[serde(with = "opaque_id")]
    pub user_id: String,
    pub file_name: String,
    /// Naive UTC datetime as serialized by the server. Upload responses
    /// omit it; list responses carry it.
    #[serde(default)]
    pub upload_time: Option<NaiveDateTime>,
    /// Parameter name → result. Empty is valid: extraction ran and found
    /// nothing, distinct from "not yet analyzed."
    #[serde(default)]
    pub lab_results: HashMap<String, LabResult>,
    /// First ≤200 chars of the extracted text, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_preview: Option<String>,
}

impl Report {
    /// True when any lab value is flagged other than Normal.
    /// An empty result map is all-normal by definition.
    pub fn has_abnormal_values(&self) -> bool {
        self.lab_results
            .values()
            .any(|r| r.status != LabStatus::Normal)
    }

    pub fn lab_value_count(&self) -> usize {
        self.lab_results.len()
    }
}
