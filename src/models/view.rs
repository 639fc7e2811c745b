//! Rendering views handed to the report template.
//!
//! Views are derived from input records on every generation and serialize
//! with the camelCase keys templates refer to.

use super::{IssueDetail, OperationInfo, RuntimeException};
use serde::Serialize;
use serde_json::Value as Json;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// An issue detail joined with its catalog entry and payload link.
pub struct EnrichedIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
    pub paths_in_payload: Vec<String>,
    pub json_paths_in_payload: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file_link_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One validation issue ready for rendering.
pub struct ValidationView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_info: Option<OperationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file_link_label: Option<String>,
    pub errors: Vec<IssueDetail>,
    pub errors_for_rendering: Vec<EnrichedIssue>,
    pub error_code_len: usize,
    pub runtime_exceptions: Vec<RuntimeException>,
}

impl ValidationView {
    pub fn operation_id(&self) -> &str {
        self.operation_info
            .as_ref()
            .map(|o| o.operation_id.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// General errors of a single operation, merged across its views.
pub struct OperationErrorGroup {
    pub general_errors_inner: Vec<ValidationView>,
    pub error_code_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_info: Option<OperationInfo>,
    pub errors_for_rendering: Vec<EnrichedIssue>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Coverage record with its rewritten spec link and pass count.
pub struct CoverageView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_link_label: Option<String>,
    pub api_version: String,
    #[serde(rename = "coveredOperaions")]
    pub covered_operations: u64,
    pub validation_pass_operations: u64,
    pub validation_fail_operations: u64,
    pub un_covered_operations: u64,
    pub un_covered_operations_list: Vec<Json>,
    pub un_covered_operations_list_gen: Vec<Json>,
    pub total_operations: u64,
    pub coverage_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Scalar metrics of a generated report.
pub struct ReportSummary {
    pub api_version: String,
    pub total_errors: usize,
    pub total_general_errors: usize,
    pub operations_with_errors: usize,
    pub total_run_time_errors: usize,
    pub undefined_operation_count: u64,
    pub coverage_records: usize,
}
