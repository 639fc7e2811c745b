//! Configuration discovery and report options resolution.
//!
//! traffic-report reads `traffic-report.toml|yaml|yml` from the repository
//! root (or closest ancestor) and merges it with CLI flags to produce
//! `ReportOptions`.
//! Defaults:
//! - `reportPath`: `report.html`
//! - `sdkPackage` / `sdkLanguage`: empty
//! - `overrideLinkInReport` / `outputExceptionInReport`: false
//! - `specLinkPrefix` / `payloadLinkPrefix`: empty
//! - `errorCatalog`: the upstream error-definitions document
//! - `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::catalog::DEFAULT_ERROR_CATALOG;
use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = [
    "traffic-report.toml",
    "traffic-report.yaml",
    "traffic-report.yml",
];

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// Root configuration loaded from `traffic-report.toml|yaml`.
pub struct ReportConfig {
    pub report_path: Option<String>,
    pub sdk_package: Option<String>,
    pub sdk_language: Option<String>,
    pub override_link_in_report: Option<bool>,
    pub output_exception_in_report: Option<bool>,
    pub spec_link_prefix: Option<String>,
    pub payload_link_prefix: Option<String>,
    pub error_catalog: Option<String>,
    pub template: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Options of one report generation, read-only once resolved.
pub struct ReportOptions {
    pub report_path: PathBuf,
    pub sdk_package: String,
    pub sdk_language: String,
    pub override_link_in_report: bool,
    pub output_exception_in_report: bool,
    pub spec_link_prefix: String,
    pub payload_link_prefix: String,
    pub error_catalog: String,
    pub template: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("report.html"),
            sdk_package: String::new(),
            sdk_language: String::new(),
            override_link_in_report: false,
            output_exception_in_report: false,
            spec_link_prefix: String::new(),
            payload_link_prefix: String::new(),
            error_catalog: DEFAULT_ERROR_CATALOG.to_string(),
            template: None,
        }
    }
}

#[derive(Debug, Default, Clone)]
/// Values supplied on the command line; `None` defers to config/defaults.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub report_path: Option<String>,
    pub sdk_package: Option<String>,
    pub sdk_language: Option<String>,
    pub override_link_in_report: Option<bool>,
    pub output_exception_in_report: Option<bool>,
    pub spec_link_prefix: Option<String>,
    pub payload_link_prefix: Option<String>,
    pub error_catalog: Option<String>,
    pub template: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by the binary after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub options: ReportOptions,
    pub output: String,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a config file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ReportConfig` from the first config file present under `root`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<ReportConfig>> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if !p.exists() {
            continue;
        }
        let s = fs::read_to_string(&p).map_err(|e| ReportError::io(&p, e))?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<ReportConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<ReportConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|e| ReportError::Config(format!("invalid {}: {}", p.display(), e)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Discovery starts at `--repo-root` when given, else at the working directory.
pub fn resolve_effective(cli: CliOverrides) -> Result<Effective> {
    let cwd = std::env::current_dir().map_err(|e| ReportError::io(".", e))?;
    resolve_effective_in(cli, &cwd)
}

/// Same as `resolve_effective`, with relative paths anchored at `cwd`.
pub fn resolve_effective_in(cli: CliOverrides, cwd: &Path) -> Result<Effective> {
    // An absolute repo root replaces `cwd` in the join.
    let start = match cli.repo_root.as_deref() {
        Some(r) => cwd.join(r),
        None => cwd.to_path_buf(),
    };
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    let defaults = ReportOptions::default();

    let report_path = cli
        .report_path
        .or(cfg.report_path)
        .map(PathBuf::from)
        .unwrap_or(defaults.report_path);
    let report_path = if report_path.is_relative() {
        repo_root.join(report_path)
    } else {
        report_path
    };
    let template = cli
        .template
        .or(cfg.template)
        .map(|t| {
            let p = PathBuf::from(t);
            if p.is_relative() {
                repo_root.join(p)
            } else {
                p
            }
        });

    let options = ReportOptions {
        report_path,
        sdk_package: cli.sdk_package.or(cfg.sdk_package).unwrap_or_default(),
        sdk_language: cli.sdk_language.or(cfg.sdk_language).unwrap_or_default(),
        override_link_in_report: cli
            .override_link_in_report
            .or(cfg.override_link_in_report)
            .unwrap_or(false),
        output_exception_in_report: cli
            .output_exception_in_report
            .or(cfg.output_exception_in_report)
            .unwrap_or(false),
        spec_link_prefix: cli
            .spec_link_prefix
            .or(cfg.spec_link_prefix)
            .unwrap_or_default(),
        payload_link_prefix: cli
            .payload_link_prefix
            .or(cfg.payload_link_prefix)
            .unwrap_or_default(),
        error_catalog: cli
            .error_catalog
            .or(cfg.error_catalog)
            .unwrap_or(defaults.error_catalog),
        template,
    };
    let output = cli
        .output
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Ok(Effective {
        repo_root,
        config_found,
        options,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn at_root(root: &Path) -> CliOverrides {
        CliOverrides {
            repo_root: root.to_str().map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("traffic-report.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
reportPath = "out/report.html"
sdkPackage = "azure-pets"
overrideLinkInReport = true
payloadLinkPrefix = "https://payloads/"
output = "json"
    "#
        )
        .unwrap();

        let eff = resolve_effective(at_root(root)).unwrap();
        assert!(eff.config_found);
        assert_eq!(eff.options.report_path, root.join("out/report.html"));
        assert_eq!(eff.options.sdk_package, "azure-pets");
        assert!(eff.options.override_link_in_report);
        assert_eq!(eff.options.payload_link_prefix, "https://payloads/");
        assert_eq!(eff.output, "json");
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("traffic-report.yaml"),
            "sdkLanguage: python\noutputExceptionInReport: true\n",
        )
        .unwrap();

        let eff = resolve_effective(at_root(root)).unwrap();
        assert_eq!(eff.options.sdk_language, "python");
        assert!(eff.options.output_exception_in_report);
        assert!(!eff.options.override_link_in_report);
        assert_eq!(eff.options.report_path, root.join("report.html"));
        assert_eq!(eff.options.error_catalog, DEFAULT_ERROR_CATALOG);
        assert!(eff.options.template.is_none());
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_cli_takes_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("traffic-report.toml"),
            "overrideLinkInReport = true\nsdkPackage = \"from-config\"\ntemplate = \"t/layout.mustache\"\n",
        )
        .unwrap();

        let cli = CliOverrides {
            override_link_in_report: Some(false),
            sdk_package: Some("from-cli".into()),
            report_path: Some("/abs/report.html".into()),
            ..at_root(root)
        };
        let eff = resolve_effective(cli).unwrap();
        assert!(!eff.options.override_link_in_report);
        assert_eq!(eff.options.sdk_package, "from-cli");
        assert_eq!(eff.options.report_path, PathBuf::from("/abs/report.html"));
        assert_eq!(eff.options.template, Some(root.join("t/layout.mustache")));
    }

    #[test]
    fn test_config_discovered_in_ancestor_of_working_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("traffic-report.toml"), "sdkPackage = \"from-parent\"\n").unwrap();
        let child = root.join("a").join("b");
        fs::create_dir_all(&child).unwrap();

        let eff = resolve_effective_in(CliOverrides::default(), &child).unwrap();
        assert!(eff.config_found);
        assert_eq!(eff.repo_root, root.to_path_buf());
        assert_eq!(eff.options.sdk_package, "from-parent");
        assert_eq!(eff.options.report_path, root.join("report.html"));

        let relative = CliOverrides {
            repo_root: Some("a".into()),
            ..Default::default()
        };
        let eff = resolve_effective_in(relative, root).unwrap();
        assert!(eff.config_found);
        assert_eq!(eff.repo_root, root.to_path_buf());
    }

    #[test]
    fn test_missing_config_uses_defaults_and_invalid_config_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        let eff = resolve_effective(at_root(root)).unwrap();
        assert!(!eff.config_found);
        assert_eq!(eff.repo_root, root.to_path_buf());

        fs::write(root.join("traffic-report.toml"), "reportPath = [").unwrap();
        let err = resolve_effective(at_root(root)).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
