//! Conventional artifact names for scenario runs.
//!
//! Pure string helpers; malformed input yields a best-effort string.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// `{base}.json` -> `{base}/report.json` (first `.json` only).
pub fn default_quality_report_file_path(newman_report_file_path: &str) -> String {
    newman_report_file_path.replacen(".json", "/report.json", 1)
}

pub fn default_collection_file_name(scenario_file: &str, run_id: &str) -> String {
    format!("{}/{}/collection.json", scenario_file, run_id)
}

pub fn default_env_file_name(scenario_file: &str, run_id: &str) -> String {
    format!("{}/{}/env.json", scenario_file, run_id)
}

pub fn default_newman_report(scenario_file: &str, run_id: &str, scenario_name: &str) -> String {
    format!("{}/{}/{}.json", scenario_file, run_id, scenario_name)
}

pub fn default_newman_dir(scenario_file: &str, run_id: &str) -> String {
    format!("{}/{}", scenario_file, run_id)
}

fn dir_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*[\\/]").expect("static regex"))
}

/// Base name of `file_path` (either separator) with the first `.yaml` removed.
pub fn file_name_from_path(file_path: &str) -> String {
    dir_prefix()
        .replace(file_path, "")
        .replacen(".yaml", "", 1)
}

/// `{name}_{YYYY-MM-DD}`.
pub fn blob_name_date_postfix(name: &str, date: NaiveDate) -> String {
    format!("{}_{}", name, date.format("%Y-%m-%d"))
}

/// `blob_name_date_postfix` with today's UTC date.
pub fn blob_name_date_postfix_today(name: &str) -> String {
    blob_name_date_postfix(name, Utc::now().date_naive())
}
