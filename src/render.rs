//! Report rendering: prepare views, render the mustache template, write the file.

use crate::aggregate::ResultAggregator;
use crate::catalog::ErrorCatalogLoader;
use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use crate::models::view::ReportSummary;
use crate::models::ReportInputs;
use chrono::NaiveDateTime;

/// Built-in HTML layout used when no template is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/report.mustache");

pub struct ReportGenerator {
    inputs: ReportInputs,
    options: ReportOptions,
    generated_at: Option<NaiveDateTime>,
}

impl ReportGenerator {
    pub fn new(inputs: ReportInputs, options: ReportOptions) -> Self {
        Self {
            inputs,
            options,
            generated_at: None,
        }
    }

    /// Pin the timestamp printed in the report.
    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Render `template` against the prepared views and write the report,
    /// replacing any existing file at the configured path.
    pub async fn generate_html_report(
        self,
        template: &str,
        catalog: &ErrorCatalogLoader,
    ) -> Result<ReportSummary> {
        let compiled = mustache::compile_str(template)?;
        let mut aggregator = ResultAggregator::new(self.inputs, &self.options);
        if let Some(at) = self.generated_at {
            aggregator = aggregator.with_generated_at(at);
        }
        let report = aggregator.prepare_rendering_views(catalog).await;

        tracing::debug!(
            general_errors = report.total_general_errors(),
            runtime_errors = report.total_run_time_errors(),
            operations = report.general_errors_grouped_by_operation().len(),
            "rendering views prepared"
        );

        let mut buf: Vec<u8> = Vec::new();
        compiled.render(&mut buf, &report.template_context())?;

        let path = &self.options.report_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportError::io(parent, e))?;
        }
        tokio::fs::write(path, &buf)
            .await
            .map_err(|e| ReportError::io(path, e))?;
        tracing::info!(path = %path.display(), "report written");
        Ok(report.summary())
    }
}
