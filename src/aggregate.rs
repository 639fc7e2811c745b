//! Result aggregation and rendering-view preparation.
//!
//! `ResultAggregator` owns the raw inputs of one report. Preparing it joins
//! every issue detail with the error catalog, rewrites payload and spec links,
//! and freezes the outcome into a `PreparedReport`; every metric the template
//! needs is a pure projection over that snapshot.
//!
//! Ordering guarantees:
//! - Validation issues are sorted by operation id with a stable sort, so
//!   records sharing an id keep their input order.
//! - Grouping by operation keeps the order in which ids are first seen.

use crate::catalog::{CatalogLoad, ErrorCatalogLoader};
use crate::config::ReportOptions;
use crate::links::LinkPolicy;
use crate::models::catalog::ErrorCatalog;
use crate::models::view::{
    CoverageView, EnrichedIssue, OperationErrorGroup, ReportSummary, ValidationView,
};
use crate::models::{CoverageRecord, ReportInputs, ValidationIssue};
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_API_VERSION: &str = "unknown";

pub struct ResultAggregator {
    package: String,
    language: String,
    api_version: String,
    generated_at: NaiveDateTime,
    undefined_operation_count: u64,
    sorted_validation_results: Vec<ValidationIssue>,
    coverage_results: Vec<CoverageRecord>,
    links: LinkPolicy,
    include_exceptions: bool,
}

impl ResultAggregator {
    pub fn new(inputs: ReportInputs, options: &ReportOptions) -> Self {
        let api_version = inputs
            .coverage_results
            .first()
            .map(|c| c.api_version.clone())
            .unwrap_or_else(|| UNKNOWN_API_VERSION.to_string());
        let mut sorted = inputs.validation_results;
        sorted.sort_by(|a, b| a.operation_id().cmp(b.operation_id()));
        Self {
            package: options.sdk_package.clone(),
            language: options.sdk_language.clone(),
            api_version,
            generated_at: Local::now().naive_local(),
            undefined_operation_count: inputs.undefined_operation_count,
            sorted_validation_results: sorted,
            coverage_results: inputs.coverage_results,
            links: LinkPolicy::new(
                options.override_link_in_report,
                &options.spec_link_prefix,
                &options.payload_link_prefix,
            ),
            include_exceptions: options.output_exception_in_report,
        }
    }

    /// Pin the creation timestamp shown in the report.
    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn sorted_validation_results(&self) -> &[ValidationIssue] {
        &self.sorted_validation_results
    }

    fn log_preparation(&self, codes: usize) {
        tracing::debug!(
            api_version = self.api_version(),
            issues = self.sorted_validation_results().len(),
            coverage = self.coverage_results.len(),
            catalog_codes = codes,
            "preparing rendering views"
        );
    }

    /// Fetch the error catalog, then build all rendering views.
    ///
    /// A failed catalog load is logged and the views are built unenriched.
    pub async fn prepare_rendering_views(self, catalog: &ErrorCatalogLoader) -> PreparedReport {
        let loaded = match catalog.load().await {
            CatalogLoad::Loaded(c) => c,
            CatalogLoad::Failed { reason } => {
                tracing::warn!(
                    location = catalog.location(),
                    %reason,
                    "error catalog unavailable; rendering without enrichment"
                );
                ErrorCatalog::empty()
            }
        };
        self.prepare_with_catalog(&loaded)
    }

    /// Build all rendering views against an already loaded catalog.
    pub fn prepare_with_catalog(self, catalog: &ErrorCatalog) -> PreparedReport {
        self.log_preparation(catalog.len());
        let validation_views = self
            .sorted_validation_results
            .iter()
            .map(|issue| self.validation_view(issue, catalog))
            .collect();
        let coverage_views = self
            .coverage_results
            .iter()
            .map(|rec| self.coverage_view(rec))
            .collect();
        PreparedReport {
            package: self.package,
            language: self.language,
            api_version: self.api_version,
            generated_at: self.generated_at,
            undefined_operation_count: self.undefined_operation_count,
            validation_results: self.sorted_validation_results,
            validation_views,
            coverage_views,
            include_exceptions: self.include_exceptions,
        }
    }

    fn validation_view(&self, issue: &ValidationIssue, catalog: &ErrorCatalog) -> ValidationView {
        let payload = self
            .links
            .rewrite_payload_link(issue.payload_file_path.as_deref());
        let (link, label) = match payload {
            Some(p) => (Some(p.link), Some(p.label)),
            None => (None, None),
        };
        let errors_for_rendering: Vec<EnrichedIssue> = issue
            .errors
            .iter()
            .map(|detail| {
                let def = catalog.get(&detail.code);
                EnrichedIssue {
                    friendly_name: def.and_then(|d| d.friendly_name.clone()),
                    link: def.and_then(|d| d.link.clone()),
                    code: detail.code.clone(),
                    message: detail.message.clone(),
                    schema_path: detail.schema_path.clone(),
                    paths_in_payload: detail.paths_in_payload.clone(),
                    json_paths_in_payload: detail.json_paths_in_payload.clone(),
                    severity: detail.severity.clone(),
                    source: detail.source.clone(),
                    params: detail.params.clone(),
                    payload_file_path: link.clone(),
                    payload_file_link_label: label.clone(),
                }
            })
            .collect();
        ValidationView {
            operation_info: issue.operation_info.clone(),
            payload_file_path: link,
            payload_file_link_label: label,
            errors: issue.errors.clone(),
            error_code_len: errors_for_rendering.len(),
            errors_for_rendering,
            runtime_exceptions: issue.runtime_exceptions.clone(),
        }
    }

    fn coverage_view(&self, rec: &CoverageRecord) -> CoverageView {
        let spec = self.links.rewrite_spec_link(rec.spec.as_deref());
        let (spec, spec_link_label) = match spec {
            Some(s) => (Some(s.link), Some(s.label)),
            None => (None, None),
        };
        CoverageView {
            spec,
            spec_link_label,
            api_version: rec.api_version.clone(),
            covered_operations: rec.covered_operations,
            validation_pass_operations: rec
                .covered_operations
                .saturating_sub(rec.validation_fail_operations),
            validation_fail_operations: rec.validation_fail_operations,
            un_covered_operations: rec.un_covered_operations,
            un_covered_operations_list: rec.un_covered_operations_list.clone(),
            un_covered_operations_list_gen: rec.un_covered_operations_list_gen.clone(),
            total_operations: rec.total_operations,
            coverage_rate: rec.coverage_rate,
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable outcome of view preparation.
pub struct PreparedReport {
    pub package: String,
    pub language: String,
    pub api_version: String,
    pub generated_at: NaiveDateTime,
    pub undefined_operation_count: u64,
    pub validation_views: Vec<ValidationView>,
    pub coverage_views: Vec<CoverageView>,
    validation_results: Vec<ValidationIssue>,
    include_exceptions: bool,
}

impl PreparedReport {
    /// Views with at least one issue detail.
    pub fn general_errors(&self) -> Vec<&ValidationView> {
        general_errors_of(self.validation_views.iter())
    }

    /// General errors grouped by operation id, in first-seen order.
    pub fn general_errors_grouped_by_operation(&self) -> Vec<OperationErrorGroup> {
        group_by_operation(&self.general_errors())
    }

    pub fn total_errors(&self) -> usize {
        self.validation_results.len()
    }

    pub fn total_general_errors(&self) -> usize {
        self.general_errors().len()
    }

    /// Issues carrying runtime exceptions; always empty unless exception
    /// output is enabled.
    pub fn run_time_errors(&self) -> Vec<&ValidationIssue> {
        if !self.include_exceptions {
            return Vec::new();
        }
        self.validation_results
            .iter()
            .filter(|x| !x.runtime_exceptions.is_empty())
            .collect()
    }

    pub fn total_run_time_errors(&self) -> usize {
        self.run_time_errors().len()
    }

    pub fn format_generated_date(&self) -> String {
        format_generated_date(&self.generated_at)
    }

    /// Operations that passed validation, summed over coverage records.
    pub fn operation_validated(&self) -> u64 {
        self.coverage_views
            .iter()
            .map(|c| c.validation_pass_operations)
            .sum()
    }

    /// Operations that failed validation, summed over coverage records.
    pub fn operation_failed(&self) -> u64 {
        self.coverage_views
            .iter()
            .map(|c| c.validation_fail_operations)
            .sum()
    }

    /// Operations never exercised by the traffic, summed over coverage records.
    pub fn operation_un_validated(&self) -> u64 {
        self.coverage_views
            .iter()
            .map(|c| c.un_covered_operations)
            .sum()
    }

    /// Raw issues with at least one detail, keyed by operation id.
    pub fn general_error_results(&self) -> BTreeMap<&str, Vec<&ValidationIssue>> {
        let mut out: BTreeMap<&str, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in self.validation_results.iter().filter(|x| !x.errors.is_empty()) {
            out.entry(issue.operation_id()).or_default().push(issue);
        }
        out
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            api_version: self.api_version.clone(),
            total_errors: self.total_errors(),
            total_general_errors: self.total_general_errors(),
            operations_with_errors: self.general_errors_grouped_by_operation().len(),
            total_run_time_errors: self.total_run_time_errors(),
            undefined_operation_count: self.undefined_operation_count,
            coverage_records: self.coverage_views.len(),
        }
    }

    /// Everything a template can refer to, keyed by the names templates use.
    pub fn template_context(&self) -> TemplateContext<'_> {
        TemplateContext {
            package: &self.package,
            language: &self.language,
            api_version: &self.api_version,
            generated_date: self.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            undefined_operation_count: self.undefined_operation_count,
            operation_validated: self.operation_validated(),
            operation_failed: self.operation_failed(),
            operation_un_validated: self.operation_un_validated(),
            general_error_results: self.general_error_results(),
            validation_results_for_rendering: &self.validation_views,
            coverage_results_for_rendering: &self.coverage_views,
            general_errors: self.general_errors(),
            general_errors_grouped: self.general_errors_grouped_by_operation(),
            total_errors: self.total_errors(),
            total_general_errors: self.total_general_errors(),
            run_time_errors: self.run_time_errors(),
            total_run_time_errors: self.total_run_time_errors(),
            has_run_time_errors: self.total_run_time_errors() > 0,
            formatted_generated_date: self.format_generated_date(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext<'a> {
    pub package: &'a str,
    pub language: &'a str,
    pub api_version: &'a str,
    pub generated_date: String,
    pub undefined_operation_count: u64,
    pub operation_validated: u64,
    pub operation_failed: u64,
    pub operation_un_validated: u64,
    pub general_error_results: BTreeMap<&'a str, Vec<&'a ValidationIssue>>,
    pub validation_results_for_rendering: &'a [ValidationView],
    pub coverage_results_for_rendering: &'a [CoverageView],
    #[serde(rename = "getGeneralErrors")]
    pub general_errors: Vec<&'a ValidationView>,
    #[serde(rename = "getGeneralErrorsGen")]
    pub general_errors_grouped: Vec<OperationErrorGroup>,
    #[serde(rename = "getTotalErrors")]
    pub total_errors: usize,
    #[serde(rename = "getTotalGeneralErrors")]
    pub total_general_errors: usize,
    #[serde(rename = "getRunTimeErrors")]
    pub run_time_errors: Vec<&'a ValidationIssue>,
    #[serde(rename = "getTotalRunTimeErrors")]
    pub total_run_time_errors: usize,
    pub has_run_time_errors: bool,
    #[serde(rename = "formatGeneratedDate")]
    pub formatted_generated_date: String,
}

/// Keep only views with at least one issue detail.
pub fn general_errors_of<'a, I>(views: I) -> Vec<&'a ValidationView>
where
    I: IntoIterator<Item = &'a ValidationView>,
{
    views
        .into_iter()
        .filter(|v| !v.errors.is_empty())
        .collect()
}

/// Group views by operation id, keeping first-seen order of ids.
pub fn group_by_operation(views: &[&ValidationView]) -> Vec<OperationErrorGroup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<OperationErrorGroup> = Vec::new();
    for view in views {
        let idx = *slots.entry(view.operation_id()).or_insert_with(|| {
            groups.push(OperationErrorGroup {
                general_errors_inner: Vec::new(),
                error_code_len: 0,
                operation_info: view.operation_info.clone(),
                errors_for_rendering: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.error_code_len += view.error_code_len;
        group
            .errors_for_rendering
            .extend(view.errors_for_rendering.iter().cloned());
        group.general_errors_inner.push((*view).clone());
    }
    groups
}

/// `YYYY-MM-DD at H:MM{AM|PM}`. The hour stays in 24-hour form and `PM`
/// starts at 13:00; existing reports depend on both.
pub fn format_generated_date(at: &NaiveDateTime) -> String {
    let hour = at.hour();
    format!(
        "{}-{:02}-{:02} at {}:{:02}{}",
        at.year(),
        at.month(),
        at.day(),
        hour,
        at.minute(),
        if hour < 13 { "AM" } else { "PM" }
    )
}
