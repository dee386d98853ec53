//! Toolchain resolution
//!
//! Finds the `go` binary and the tools installed next to it:
//! - `go` from the configured go root, then `PATH`
//! - tools from each `GOPATH` entry's `bin`, the go root's `bin`, then `PATH`

use std::env;
use std::path::{Path, PathBuf};

/// Known tools and the import path that installs them
const TOOL_IMPORT_PATHS: &[(&str, &str)] = &[
    ("golint", "github.com/golang/lint/golint"),
    ("gometalinter", "github.com/alecthomas/gometalinter"),
    ("staticcheck", "honnef.co/go/tools/cmd/staticcheck"),
    ("revive", "github.com/mgechev/revive"),
    ("golangci-lint", "github.com/golangci/golangci-lint/cmd/golangci-lint"),
];

/// Resolved locations of the Go toolchain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toolchain {
    /// Path to the `go` binary, if one was found
    pub go_runtime: Option<PathBuf>,
    /// Directories searched, in order, for tool binaries
    pub tool_dirs: Vec<PathBuf>,
}

impl Toolchain {
    /// Toolchain with an explicit runtime and tool directories
    pub fn new(go_runtime: Option<PathBuf>, tool_dirs: Vec<PathBuf>) -> Self {
        Self {
            go_runtime,
            tool_dirs,
        }
    }

    /// Resolve the toolchain from overrides and the environment
    ///
    /// `go_root` and `go_path` take precedence over `GOROOT` and `GOPATH`.
    pub fn detect(go_root: Option<&Path>, go_path: Option<&Path>) -> Self {
        let go_root = go_root
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("GOROOT").map(PathBuf::from));

        let path_dirs: Vec<PathBuf> = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        let go_runtime = go_root
            .as_ref()
            .map(|root| root.join("bin").join(executable_name("go")))
            .filter(|candidate| candidate.is_file())
            .or_else(|| find_in(&path_dirs, "go"));

        let mut tool_dirs = Vec::new();
        for entry in go_path_entries(go_path) {
            tool_dirs.push(entry.join("bin"));
        }
        if let Some(root) = &go_root {
            tool_dirs.push(root.join("bin"));
        }
        tool_dirs.extend(path_dirs);

        log::debug!(
            "Resolved go runtime {:?} with {} tool directories",
            go_runtime,
            tool_dirs.len()
        );

        Self {
            go_runtime,
            tool_dirs,
        }
    }

    /// Locate a tool binary in the tool directories
    pub fn find_tool(&self, name: &str) -> Option<PathBuf> {
        find_in(&self.tool_dirs, name)
    }

    /// Path to spawn for a tool; falls back to the bare name when unresolved
    pub fn tool_path(&self, name: &str) -> PathBuf {
        self.find_tool(name)
            .unwrap_or_else(|| PathBuf::from(executable_name(name)))
    }
}

/// `GOPATH` entries, defaulting to `~/go`
fn go_path_entries(go_path: Option<&Path>) -> Vec<PathBuf> {
    if let Some(go_path) = go_path {
        return env::split_paths(go_path.as_os_str()).collect();
    }
    match env::var_os("GOPATH") {
        Some(paths) if !paths.is_empty() => env::split_paths(&paths).collect(),
        _ => dirs::home_dir()
            .map(|home| vec![home.join("go")])
            .unwrap_or_default(),
    }
}

fn find_in(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    let file_name = executable_name(name);
    dirs.iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) && !name.ends_with(".exe") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// Import path that installs `tool`, for the tools we know about
pub fn import_path(tool: &str) -> Option<&'static str> {
    TOOL_IMPORT_PATHS
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, path)| *path)
}

/// Message asking the user to install a missing tool
pub fn install_hint(tool: &str) -> String {
    match import_path(tool) {
        Some(path) => format!(
            "The \"{}\" command is not available. Use \"go get -u -v {}\" to install.",
            tool, path
        ),
        None => format!(
            "The \"{}\" command is not available. Install it and make sure it is on your PATH.",
            tool
        ),
    }
}
