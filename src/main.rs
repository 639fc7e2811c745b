//! traffic-report CLI binary entry point.
//! Resolves configuration, loads run results, and renders the report.

use clap::Parser;
use std::path::PathBuf;
use traffic_report::catalog::ErrorCatalogLoader;
use traffic_report::cli::{Cli, Commands, RenderArgs};
use traffic_report::config;
use traffic_report::error::{ReportError, Result};
use traffic_report::models::{ReportInputs, RunResults};
use traffic_report::output;
use traffic_report::render::{ReportGenerator, DEFAULT_TEMPLATE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Expand patterns relative to `root` and merge every matched document.
async fn load_inputs(root: &std::path::Path, patterns: &[String]) -> Result<ReportInputs> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        let abs = root.join(pat);
        let pattern = abs.to_string_lossy().to_string();
        let entries = glob::glob(&pattern)
            .map_err(|e| ReportError::Config(format!("bad results pattern '{}': {}", pat, e)))?;
        let before = files.len();
        files.extend(entries.flatten());
        if files.len() == before {
            return Err(ReportError::Config(format!(
                "no run results matched '{}'",
                pat
            )));
        }
    }
    let mut inputs = ReportInputs::default();
    for f in files {
        let s = tokio::fs::read_to_string(&f)
            .await
            .map_err(|e| ReportError::io(&f, e))?;
        let run: RunResults = serde_json::from_str(&s).map_err(|source| ReportError::Json {
            context: f.to_string_lossy().to_string(),
            source,
        })?;
        tracing::debug!(file = %f.display(), issues = run.validation_results.len(), "run results loaded");
        inputs.merge(run);
    }
    Ok(inputs)
}

async fn render(args: RenderArgs) -> Result<()> {
    let (patterns, overrides) = args.into_overrides();
    let eff = config::resolve_effective(overrides)?;
    if !eff.config_found {
        eprintln!(
            "{} No traffic-report.toml found; using defaults.",
            output::note_prefix()
        );
    }
    let inputs = load_inputs(&eff.repo_root, &patterns).await?;
    let template = match eff.options.template.as_ref() {
        Some(p) => tokio::fs::read_to_string(p)
            .await
            .map_err(|e| ReportError::io(p, e))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let catalog = ErrorCatalogLoader::from_location(eff.options.error_catalog.clone());
    let report_path = eff.options.report_path.clone();
    let summary = ReportGenerator::new(inputs, eff.options)
        .generate_html_report(&template, &catalog)
        .await?;
    output::print_summary(&report_path, &summary, &eff.output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Render(args) => {
            if let Err(e) = render(args).await {
                eprintln!("{} {}", output::error_prefix(), e);
                std::process::exit(2);
            }
        }
    }
}
