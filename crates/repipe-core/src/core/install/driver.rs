use std::path::{Path, PathBuf};

use anyhow::Result;
use repipe_domain::{
    declares_requirements, is_lock_path, lock_path_for, parse_freeze_listing, PackagePin,
    PinChange,
};
use serde::Serialize;
use tracing::info;

use super::errors::InstallError;
use super::reconcile::{
    install_from_file, installed_pins, resolve_requirements, update_requirements, write_lock,
};
use super::InstallRequest;
use crate::effects::{Effects, FileSystem};

/// Which file pip installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallSource {
    /// The lock file was present and trusted; nothing was resolved.
    #[serde(rename = "lock")]
    LockFile,
    /// The requirements file was resolved and installed, and the lock rewritten.
    Requirements,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub requirements: PathBuf,
    pub lock: PathBuf,
    pub source: InstallSource,
    pub changes: Vec<PinChange>,
    /// Lock file contents after the run.
    pub locked: Vec<PackagePin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallPlan {
    FromLock,
    ResolveAndLock,
}

fn plan_install(fs: &dyn FileSystem, lock: &Path, rewrite_lock: bool) -> InstallPlan {
    if !rewrite_lock && fs.exists(lock) {
        InstallPlan::FromLock
    } else {
        InstallPlan::ResolveAndLock
    }
}

fn check_requirements_path(fs: &dyn FileSystem, requirements: &Path) -> Result<(), InstallError> {
    if is_lock_path(requirements) {
        return Err(InstallError::lock_file_given(requirements));
    }
    if !fs.exists(requirements) {
        return Err(InstallError::missing_requirements(requirements));
    }
    Ok(())
}

/// Installs a requirements file, keeping its lock file in step.
///
/// An existing lock is installed as-is unless packages were requested. With
/// packages, they are resolved and merged into the requirements file first,
/// and the lock is always regenerated. The lock is written only after pip
/// install and freeze both succeed.
///
/// # Errors
///
/// Returns [`InstallError`] (inside `anyhow::Error`) for a bad requirements
/// path or a failed pip call, and plain I/O errors otherwise.
pub fn run_install(effects: &dyn Effects, request: &InstallRequest) -> Result<InstallReport> {
    let requirements = request.requirements.as_path();
    check_requirements_path(effects.fs(), requirements)?;
    let lock = lock_path_for(requirements);

    let rewrite_lock = !request.packages.is_empty();
    let mut changes = Vec::new();
    if rewrite_lock {
        let declared = declares_requirements(&effects.fs().read_to_string(requirements)?);
        changes = update_requirements(effects, requirements, &request.packages, declared)?;
    }

    let (source, locked) = match plan_install(effects.fs(), &lock, rewrite_lock) {
        InstallPlan::FromLock => (InstallSource::LockFile, install_locked(effects, &lock)?),
        InstallPlan::ResolveAndLock => (
            InstallSource::Requirements,
            install_and_lock(effects, requirements, &lock)?,
        ),
    };

    Ok(InstallReport {
        requirements: requirements.to_path_buf(),
        lock,
        source,
        changes,
        locked,
    })
}

fn install_locked(effects: &dyn Effects, lock: &Path) -> Result<Vec<PackagePin>> {
    info!("installing from lock file {}", lock.display());
    let contents = effects.fs().read_to_string(lock)?;
    if declares_requirements(&contents) {
        install_from_file(effects, lock)?;
    } else {
        info!("lock file is empty; nothing to install");
    }
    Ok(parse_freeze_listing(&contents).pins)
}

fn install_and_lock(
    effects: &dyn Effects,
    requirements: &Path,
    lock: &Path,
) -> Result<Vec<PackagePin>> {
    info!("installing from requirements file {}", requirements.display());
    let contents = effects.fs().read_to_string(requirements)?;
    if !declares_requirements(&contents) {
        info!("requirements file declares no packages; writing an empty lock");
        return write_lock(effects, lock, &[], &[]);
    }

    let declared = resolve_requirements(effects, requirements, true)?;
    install_from_file(effects, requirements)?;
    let installed = installed_pins(effects)?;
    write_lock(effects, lock, &declared, &installed)
}
