//! CLI argument parsing via `clap`.

use crate::config::CliOverrides;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "traffic-report",
    version,
    about = "Render traffic validation results into a report",
    long_about = "traffic-report — aggregate validation issues and coverage from a traffic validation run into a single HTML report.\n\nConfiguration precedence: CLI > traffic-report.toml > defaults.",
    after_help = "Examples:\n  traffic-report render --results out/results.json\n  traffic-report render --results 'out/**/results.json' --override-links --payload-link-prefix https://host/payloads\n  traffic-report render --results out/results.json --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Emit logs as JSON lines")]
    pub log_json: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current traffic-report version.")]
    Version,
    /// Render the report
    #[command(
        about = "Render the report",
        long_about = "Read one or more run-result documents, enrich errors from the error catalog, and write the rendered report.",
        after_help = "Examples:\n  traffic-report render --results out/results.json --report-path report.html"
    )]
    Render(RenderArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RenderArgs {
    #[arg(long, required = true, num_args = 1.., help = "Run-result JSON files or glob patterns")]
    pub results: Vec<String>,
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Destination of the rendered report (default: report.html)")]
    pub report_path: Option<String>,
    #[arg(long = "package", help = "SDK package label")]
    pub sdk_package: Option<String>,
    #[arg(long = "language", help = "SDK language label")]
    pub sdk_language: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Rewrite spec/payload links under the configured prefixes")]
    pub override_links: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Include runtime exceptions in the report")]
    pub include_exceptions: bool,
    #[arg(long, help = "Prefix for spec links when overriding")]
    pub spec_link_prefix: Option<String>,
    #[arg(long, help = "Prefix for payload links when overriding")]
    pub payload_link_prefix: Option<String>,
    #[arg(long, help = "Error catalog URL or path")]
    pub error_catalog: Option<String>,
    #[arg(long, help = "Mustache template (default: built-in layout)")]
    pub template: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

impl RenderArgs {
    /// Split into input patterns and configuration overrides. Flags that are
    /// off defer to the config file.
    pub fn into_overrides(self) -> (Vec<String>, CliOverrides) {
        let overrides = CliOverrides {
            repo_root: self.repo_root,
            report_path: self.report_path,
            sdk_package: self.sdk_package,
            sdk_language: self.sdk_language,
            override_link_in_report: self.override_links.then_some(true),
            output_exception_in_report: self.include_exceptions.then_some(true),
            spec_link_prefix: self.spec_link_prefix,
            payload_link_prefix: self.payload_link_prefix,
            error_catalog: self.error_catalog,
            template: self.template,
            output: self.output,
        };
        (self.results, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args_parse_and_split() {
        let cli = Cli::parse_from([
            "traffic-report",
            "render",
            "--results",
            "a.json",
            "runs/*.json",
            "--override-links",
            "--payload-link-prefix",
            "https://x/",
            "--package",
            "pets",
        ]);
        let Commands::Render(args) = cli.cmd else {
            panic!("expected render");
        };
        let (results, ov) = args.into_overrides();
        assert_eq!(results, vec!["a.json", "runs/*.json"]);
        assert_eq!(ov.override_link_in_report, Some(true));
        assert_eq!(ov.output_exception_in_report, None);
        assert_eq!(ov.payload_link_prefix.as_deref(), Some("https://x/"));
        assert_eq!(ov.sdk_package.as_deref(), Some("pets"));
    }
}
