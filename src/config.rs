//! Configuration management for go-check.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration files (`.go-check.toml`)
//! - Per-check settings and their defaults

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".go-check.toml";

/// Lint tool used when none is configured
pub const DEFAULT_LINT_TOOL: &str = "golint";

/// Command-line arguments for go-check
#[derive(Debug, Parser)]
#[command(name = "go-check")]
#[command(about = "Run Go build, lint, vet and coverage checks and report diagnostics")]
#[command(version)]
pub struct Args {
    /// Log level for go-check itself
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Explicit project configuration file
    #[arg(long, global = true, help = "Path to a .go-check.toml file")]
    pub config: Option<PathBuf>,

    /// Go installation to use instead of GOROOT
    #[arg(long, global = true, help = "Go root directory")]
    pub go_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a single file and print its diagnostics
    Check {
        /// Go source file to check
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        overrides: SettingsOverrides,
    },
    /// Check every Go file written under a directory
    Watch {
        /// Directory to watch recursively
        dir: PathBuf,

        #[command(flatten)]
        overrides: SettingsOverrides,
    },
    /// Run as a language server on stdio
    Serve,
}

/// How `check` prints diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line switches layered over file settings
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct SettingsOverrides {
    /// Skip the build check
    #[arg(long)]
    pub no_build: bool,

    /// Skip the lint check
    #[arg(long)]
    pub no_lint: bool,

    /// Skip the vet check
    #[arg(long)]
    pub no_vet: bool,

    /// Run the coverage check
    #[arg(long)]
    pub cover: bool,

    /// Lint tool to run instead of golint
    #[arg(long)]
    pub lint_tool: Option<String>,

    /// Build tags passed to go build
    #[arg(long)]
    pub build_tags: Option<String>,
}

impl SettingsOverrides {
    /// Apply the switches that were given on top of `settings`
    pub fn apply(&self, settings: &mut CheckSettings) {
        if self.no_build {
            settings.build_on_save = false;
        }
        if self.no_lint {
            settings.lint_on_save = false;
        }
        if self.no_vet {
            settings.vet_on_save = false;
        }
        if self.cover {
            settings.cover_on_save = true;
        }
        if let Some(tool) = &self.lint_tool {
            settings.lint_tool = Some(tool.clone());
        }
        if let Some(tags) = &self.build_tags {
            settings.build_tags = tags.clone();
        }
    }
}

/// Which checks run on save, and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckSettings {
    pub build_on_save: bool,
    pub build_flags: Vec<String>,
    pub build_tags: String,
    pub lint_on_save: bool,
    pub lint_tool: Option<String>,
    pub lint_flags: Vec<String>,
    pub vet_on_save: bool,
    pub vet_flags: Vec<String>,
    pub cover_on_save: bool,
    pub go_root: Option<PathBuf>,
    pub go_path: Option<PathBuf>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            build_on_save: true,
            build_flags: Vec::new(),
            build_tags: String::new(),
            lint_on_save: true,
            lint_tool: None,
            lint_flags: Vec::new(),
            vet_on_save: true,
            vet_flags: Vec::new(),
            cover_on_save: false,
            go_root: None,
            go_path: None,
        }
    }
}

impl CheckSettings {
    /// Settings with every check switched off
    pub fn disabled() -> Self {
        Self {
            build_on_save: false,
            lint_on_save: false,
            vet_on_save: false,
            cover_on_save: false,
            ..Self::default()
        }
    }

    /// Configured lint tool, or golint
    pub fn lint_tool(&self) -> &str {
        self.lint_tool
            .as_deref()
            .filter(|tool| !tool.is_empty())
            .unwrap_or(DEFAULT_LINT_TOOL)
    }

    /// True when at least one check is enabled
    pub fn any_enabled(&self) -> bool {
        self.build_on_save || self.lint_on_save || self.vet_on_save || self.cover_on_save
    }

    /// Parse settings from the contents of a TOML file
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse go-check settings")
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings sent by an editor, either bare or under a `"go"` key
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let section = value.get("go").unwrap_or(value);
        serde_json::from_value(section.clone()).context("Failed to parse editor settings")
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit project configuration file
    pub config_path: Option<PathBuf>,
    /// Go root given on the command line
    pub go_root: Option<PathBuf>,
    /// Command-line switches for the selected command
    pub overrides: SettingsOverrides,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<(Self, Command)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args.command))
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: &Args) -> Result<Self> {
        let overrides = match &args.command {
            Command::Check { overrides, .. } | Command::Watch { overrides, .. } => {
                overrides.clone()
            }
            Command::Serve => SettingsOverrides::default(),
        };

        if let Some(path) = &args.config
            && !path.is_file()
        {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        Ok(Config {
            config_path: args.config.clone(),
            go_root: args.go_root.clone(),
            overrides,
            log_level: args.log_level.clone(),
        })
    }

    /// Project configuration file that applies to `file`
    pub fn project_config_for(&self, file: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        find_project_config(file.parent()?)
    }

    /// Settings for checking `file`: defaults, then project file, then CLI switches
    pub fn settings_for(&self, file: &Path) -> Result<CheckSettings> {
        let mut settings = match self.project_config_for(file) {
            Some(path) => {
                log::debug!("Using project config {}", path.display());
                CheckSettings::load(&path)?
            }
            None => CheckSettings::default(),
        };

        self.overrides.apply(&mut settings);
        if let Some(go_root) = &self.go_root {
            settings.go_root = Some(go_root.clone());
        }

        Ok(settings)
    }
}

/// Walk up from `dir` looking for a project configuration file
pub fn find_project_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CheckSettings::default();
        assert!(settings.build_on_save);
        assert!(settings.lint_on_save);
        assert!(settings.vet_on_save);
        assert!(!settings.cover_on_save);
        assert_eq!(settings.lint_tool(), "golint");
        assert!(settings.build_tags.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = CheckSettings::from_toml_str(
            r#"
vetOnSave = false
lintTool = "gometalinter"
lintFlags = ["--fast"]
buildTags = "integration"
"#,
        )
        .unwrap();

        assert!(settings.build_on_save);
        assert!(!settings.vet_on_save);
        assert_eq!(settings.lint_tool(), "gometalinter");
        assert_eq!(settings.lint_flags, vec!["--fast"]);
        assert_eq!(settings.build_tags, "integration");
    }

    #[test]
    fn test_empty_lint_tool_means_default() {
        let settings = CheckSettings::from_toml_str("lintTool = \"\"").unwrap();
        assert_eq!(settings.lint_tool(), "golint");
    }

    #[test]
    fn test_json_settings_nested_under_go() {
        let value = serde_json::json!({ "go": { "buildOnSave": false, "coverOnSave": true } });
        let settings = CheckSettings::from_json(&value).unwrap();
        assert!(!settings.build_on_save);
        assert!(settings.cover_on_save);

        let bare = serde_json::json!({ "lintOnSave": false });
        assert!(!CheckSettings::from_json(&bare).unwrap().lint_on_save);
    }

    #[test]
    fn test_overrides() {
        let mut settings = CheckSettings::default();
        let overrides = SettingsOverrides {
            no_build: true,
            no_vet: true,
            cover: true,
            lint_tool: Some("staticcheck".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut settings);

        assert!(!settings.build_on_save);
        assert!(settings.lint_on_save);
        assert!(!settings.vet_on_save);
        assert!(settings.cover_on_save);
        assert_eq!(settings.lint_tool(), "staticcheck");
    }

    #[test]
    fn test_disabled() {
        assert!(!CheckSettings::disabled().any_enabled());
        assert!(CheckSettings::default().any_enabled());
    }
}
