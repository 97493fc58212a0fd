//! `repipe install`: lock-aware installation on top of pip.

mod driver;
mod errors;
mod reconcile;


use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;

pub use driver::{run_install, InstallReport, InstallSource};
pub use errors::InstallError;

#[derive(Clone, Debug)]
pub struct InstallRequest {
    pub requirements: PathBuf,
    /// Package specifiers to add or upgrade; empty for a plain install.
    pub packages: Vec<String>,
}

/// Runs an install and converts the result into a command outcome.
///
/// # Errors
/// Returns an error only if the outcome payload cannot be serialized.
pub fn install(ctx: &CommandContext, request: &InstallRequest) -> Result<ExecutionOutcome> {
    match run_install(ctx.effects(), request) {
        Ok(report) => Ok(install_success_outcome(&report)?),
        Err(err) => match err.downcast::<InstallError>() {
            Ok(install_err) => Ok(install_err.into_outcome()),
            Err(err) => Ok(ExecutionOutcome::failure(
                "install failed",
                json!({
                    "reason": "internal",
                    "error": format!("{err:#}"),
                }),
            )),
        },
    }
}

fn install_success_outcome(report: &InstallReport) -> Result<ExecutionOutcome> {
    let message = match report.source {
        InstallSource::LockFile => format!(
            "installed {} from {}",
            package_count(report.locked.len()),
            report.lock.display()
        ),
        InstallSource::Requirements => format!(
            "installed {} and locked {}",
            report.requirements.display(),
            package_count(report.locked.len())
        ),
    };
    Ok(ExecutionOutcome::success(
        message,
        serde_json::to_value(report)?,
    ))
}

fn package_count(count: usize) -> String {
    if count == 1 {
        "1 package".to_string()
    } else {
        format!("{count} packages")
    }
}
