//! Build Orchestrator
//!
//! Runs the configured compiler for a root document, exactly once per call,
//! and normalizes the result into a status plus structured error records.

use std::process::Stdio;

use serde::{Deserialize, Serialize, Serializer};
use tokio::process::Command;
use tower_lsp::lsp_types::Url;

use super::log::{parse_log, BuildError};

/// Compiler invocation settings, resolved per root document.
///
/// The server only supplies defaults; whatever the client sends is passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub executable: String,
    pub args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            executable: "latexmk".to_string(),
            args: vec![
                "-pdf".to_string(),
                "-interaction=nonstopmode".to_string(),
                "-synctex=1".to_string(),
            ],
        }
    }
}

/// Result code of one build request.
///
/// `Error` means the compiler ran and reported problems, a normal outcome.
/// `Failure` means the toolchain could not run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Success = 0,
    Error = 1,
    Failure = 2,
}

impl Serialize for BuildStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

/// Status plus the flat list of compiler-reported problems.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    pub status: BuildStatus,
    pub errors: Vec<BuildError>,
}

impl BuildOutcome {
    fn failure() -> Self {
        Self {
            status: BuildStatus::Failure,
            errors: Vec::new(),
        }
    }
}

/// Compile `root` with `config`.
///
/// The compiler's exit code decides between `Success` and `Error`; its log
/// file supplies the error records either way. Only an unrunnable toolchain
/// or a non-file root maps to `Failure`.
pub async fn build(root: &Url, config: &BuildConfig) -> BuildOutcome {
    let Ok(path) = root.to_file_path() else {
        log::warn!("cannot build non-file document {}", root);
        return BuildOutcome::failure();
    };
    let Some(directory) = path.parent() else {
        log::warn!("document {} has no parent directory", root);
        return BuildOutcome::failure();
    };

    let exit = Command::new(&config.executable)
        .args(&config.args)
        .arg(&path)
        .current_dir(directory)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    let exit = match exit {
        Ok(exit) => exit,
        Err(err) => {
            log::warn!("cannot run {}: {}", config.executable, err);
            return BuildOutcome::failure();
        }
    };

    let log_path = path.with_extension("log");
    let errors = match tokio::fs::read_to_string(&log_path).await {
        Ok(text) => parse_log(root, &text),
        Err(err) => {
            log::debug!("no build log at {}: {}", log_path.display(), err);
            Vec::new()
        }
    };

    let status = if exit.success() {
        BuildStatus::Success
    } else {
        BuildStatus::Error
    };

    BuildOutcome { status, errors }
}
