//! Data models for validation-run inputs, the error catalog, and rendering views.
//!
//! Input records mirror the JSON written by the traffic validator (camelCase
//! keys). They are consumed as-is and never re-validated.

pub mod catalog;
pub mod view;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Identity of the API operation a validation issue belongs to.
pub struct OperationInfo {
    #[serde(default)]
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One rule violation reported for a payload.
pub struct IssueDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
    #[serde(default)]
    pub paths_in_payload: Vec<String>,
    #[serde(default)]
    pub json_paths_in_payload: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Json>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeException {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Validation outcome of one recorded request/response pair.
pub struct ValidationIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_info: Option<OperationInfo>,
    #[serde(default)]
    pub errors: Vec<IssueDetail>,
    #[serde(default)]
    pub runtime_exceptions: Vec<RuntimeException>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_file_path: Option<String>,
}

impl ValidationIssue {
    /// Operation identity; the empty string when the record carries none.
    pub fn operation_id(&self) -> &str {
        self.operation_info
            .as_ref()
            .map(|o| o.operation_id.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Coverage summary of one specification document.
pub struct CoverageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(default)]
    pub api_version: String,
    // The validator has always written this key misspelled.
    #[serde(rename = "coveredOperaions", alias = "coveredOperations", default)]
    pub covered_operations: u64,
    #[serde(default)]
    pub validation_fail_operations: u64,
    #[serde(default)]
    pub un_covered_operations: u64,
    #[serde(default)]
    pub un_covered_operations_list: Vec<Json>,
    #[serde(default)]
    pub un_covered_operations_list_gen: Vec<Json>,
    #[serde(default)]
    pub total_operations: u64,
    #[serde(default)]
    pub coverage_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One run-result document as produced by the validation engine.
pub struct RunResults {
    #[serde(default)]
    pub validation_results: Vec<ValidationIssue>,
    #[serde(default)]
    pub coverage_results: Vec<CoverageRecord>,
    #[serde(default)]
    pub undefined_operation_count: u64,
}

#[derive(Debug, Clone, Default)]
/// Raw inputs of one report generation.
pub struct ReportInputs {
    pub validation_results: Vec<ValidationIssue>,
    pub coverage_results: Vec<CoverageRecord>,
    pub undefined_operation_count: u64,
}

impl ReportInputs {
    /// Append another run's results, keeping record order.
    pub fn merge(&mut self, run: RunResults) {
        self.validation_results.extend(run.validation_results);
        self.coverage_results.extend(run.coverage_results);
        self.undefined_operation_count += run.undefined_operation_count;
    }
}

impl From<RunResults> for ReportInputs {
    fn from(run: RunResults) -> Self {
        let mut inputs = ReportInputs::default();
        inputs.merge(run);
        inputs
    }
}
