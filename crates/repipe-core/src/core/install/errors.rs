use std::path::{Path, PathBuf};

use repipe_domain::ReportError;
use serde_json::{json, Value};

use crate::outcome::ExecutionOutcome;
use crate::process::RunOutput;

/// Terminal failures of an install invocation.
///
/// Each variant maps onto one outcome class: configuration problems are user
/// errors, resolution and installation problems are failures carrying pip's
/// own diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("{message}")]
    Configuration {
        message: String,
        path: PathBuf,
        hint: Option<String>,
    },
    #[error("{message}")]
    Resolution {
        message: String,
        reason: Option<String>,
        output: Option<RunOutput>,
    },
    #[error("{message}")]
    Installation { message: String, output: RunOutput },
}

impl InstallError {
    pub(crate) fn missing_requirements(path: &Path) -> Self {
        Self::Configuration {
            message: format!("requirements file {} does not exist", path.display()),
            path: path.to_path_buf(),
            hint: Some("pass an existing requirements file with -r".to_string()),
        }
    }

    pub(crate) fn lock_file_given(path: &Path) -> Self {
        Self::Configuration {
            message: format!("{} is a lock file, not a requirements file", path.display()),
            path: path.to_path_buf(),
            hint: Some(
                "pass the requirements file the lock was generated from; repipe finds the lock \
                 next to it"
                    .to_string(),
            ),
        }
    }

    pub(crate) fn resolution_failed(target: &str, output: RunOutput) -> Self {
        Self::Resolution {
            message: format!("pip failed to resolve {target}"),
            reason: None,
            output: Some(output),
        }
    }

    pub(crate) fn malformed_report(target: &str, reason: &ReportError) -> Self {
        Self::Resolution {
            message: format!("pip produced an unusable report for {target}"),
            reason: Some(reason.to_string()),
            output: None,
        }
    }

    pub(crate) fn installation_failed(action: &str, output: RunOutput) -> Self {
        Self::Installation {
            message: format!("{action} failed"),
            output,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            InstallError::Configuration { .. } => "configuration",
            InstallError::Resolution { .. } => "resolution",
            InstallError::Installation { .. } => "installation",
        }
    }

    pub(crate) fn into_outcome(self) -> ExecutionOutcome {
        let kind = self.kind();
        match self {
            InstallError::Configuration {
                message,
                path,
                hint,
            } => ExecutionOutcome::user_error(
                message,
                json!({
                    "reason": kind,
                    "path": path.display().to_string(),
                    "hint": hint,
                }),
            ),
            InstallError::Resolution {
                message,
                reason,
                output,
            } => {
                let mut details = json!({ "reason": kind, "error": reason });
                if let Some(output) = output {
                    attach_output(&mut details, &output);
                }
                ExecutionOutcome::failure(message, details)
            }
            InstallError::Installation { message, output } => {
                let mut details = json!({ "reason": kind });
                attach_output(&mut details, &output);
                ExecutionOutcome::failure(message, details)
            }
        }
    }
}

fn attach_output(details: &mut Value, output: &RunOutput) {
    if let Value::Object(map) = details {
        map.insert("code".into(), json!(output.code));
        map.insert("stdout".into(), json!(output.stdout));
        map.insert("stderr".into(), json!(output.stderr));
        map.insert("output".into(), json!(output.combined()));
    }
}
