//! Output rendering for the `render` command.
//!
//! Supports `human` (default) and `json` outputs. Both report where the
//! document was written plus the scalar metrics of the run.

use crate::models::view::ReportSummary;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Show `path` relative to the working directory when possible.
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Print the outcome of a report generation in the requested format.
pub fn print_summary(report_path: &Path, summary: &ReportSummary, output: &str) {
    match output {
        "json" => {
            let out = compose_summary_json(&display_path(report_path), summary);
            match serde_json::to_string_pretty(&out) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("{} {}", error_prefix(), e),
            }
        }
        _ => {
            let color = use_colors(output);
            let path = display_path(report_path);
            if color {
                println!("{} {}", "📄 report written:".green().bold(), path.bold());
            } else {
                println!("📄 report written: {}", path);
            }
            let errors = format!(
                "payloads={} with-errors={} operations={} runtime={}",
                summary.total_errors,
                summary.total_general_errors,
                summary.operations_with_errors,
                summary.total_run_time_errors
            );
            if color && summary.total_general_errors > 0 {
                println!("{} {}", "✖".red(), errors);
            } else {
                println!("{} {}", if color { "◆".blue().to_string() } else { "◆".to_string() }, errors);
            }
            let tail = format!(
                "— Summary — apiVersion={} specs={} undefined-operations={}",
                summary.api_version, summary.coverage_records, summary.undefined_operation_count
            );
            if color {
                println!("{}", tail.bold());
            } else {
                println!("{}", tail);
            }
        }
    }
}

/// Compose the JSON summary object (pure) for testing purposes.
pub fn compose_summary_json(report: &str, summary: &ReportSummary) -> JsonVal {
    json!({
        "report": report,
        "summary": summary,
    })
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}
