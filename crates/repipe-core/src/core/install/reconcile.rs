//! Reads pip's view of the world and writes requirements and lock files.
//!
//! Every pip call goes through [`Effects`]; report and listing scratch files
//! are [`TempPath`]s, removed when they drop on success and error alike.

use std::path::Path;

use anyhow::{Context, Result};
use repipe_domain::{
    merge_requested_pins, parse_freeze_listing, parse_install_report, render_pins,
    select_locked_pins, PackagePin, PinChange,
};
use tempfile::TempPath;
use tracing::{debug, info};

use super::errors::InstallError;
use crate::effects::Effects;
use crate::process::RunOutput;

fn scratch_file(prefix: &str, suffix: &str) -> Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .context("creating scratch file")?;
    Ok(file.into_temp_path())
}

/// Resolves a requirements file in dry-run mode.
///
/// With `include_deps` the result is the full transitive set; without it,
/// the literal entries of the file pinned to what pip would pick.
pub(crate) fn resolve_requirements(
    effects: &dyn Effects,
    requirements: &Path,
    include_deps: bool,
) -> Result<Vec<PackagePin>> {
    let report = scratch_file("repipe-report-", ".json")?;
    let target = requirements.display().to_string();
    debug!(requirements = %target, include_deps, "resolving requirements");
    let output = effects
        .installer()
        .resolve_requirements(requirements, include_deps, &report)?;
    read_report(effects, &target, &output, &report)
}

/// Resolves package specifiers in dry-run, no-deps mode.
pub(crate) fn resolve_packages(effects: &dyn Effects, specs: &[String]) -> Result<Vec<PackagePin>> {
    let report = scratch_file("repipe-report-", ".json")?;
    let target = specs.join(" ");
    debug!(packages = %target, "resolving requested packages");
    let output = effects.installer().resolve_packages(specs, &report)?;
    read_report(effects, &target, &output, &report)
}

fn read_report(
    effects: &dyn Effects,
    target: &str,
    output: &RunOutput,
    report: &Path,
) -> Result<Vec<PackagePin>> {
    if !output.success() {
        return Err(InstallError::resolution_failed(target, output.clone()).into());
    }
    let contents = effects.fs().read_to_string(report)?;
    let pins = parse_install_report(&contents)
        .map_err(|err| InstallError::malformed_report(target, &err))?;
    debug!(source = target, count = pins.len(), "pip report parsed");
    Ok(pins)
}

/// Lists installed packages as exact pins, in `pip freeze` order.
pub(crate) fn installed_pins(effects: &dyn Effects) -> Result<Vec<PackagePin>> {
    let listing_path = scratch_file("repipe-freeze-", ".txt")?;
    let output = effects.installer().list_installed(&listing_path)?;
    if !output.success() {
        return Err(InstallError::installation_failed("pip freeze", output).into());
    }
    let contents = effects.fs().read_to_string(&listing_path)?;
    let listing = parse_freeze_listing(&contents);
    for line in &listing.skipped {
        debug!(entry = %line, "skipping freeze entry without an exact pin");
    }
    Ok(listing.pins)
}

pub(crate) fn install_from_file(effects: &dyn Effects, path: &Path) -> Result<()> {
    let output = effects.installer().install_requirements(path)?;
    if output.success() {
        Ok(())
    } else {
        let action = format!("pip install -r {}", path.display());
        Err(InstallError::installation_failed(&action, output).into())
    }
}

/// Rewrites the lock file from the declared set and what is installed.
pub(crate) fn write_lock(
    effects: &dyn Effects,
    lock: &Path,
    declared: &[PackagePin],
    installed: &[PackagePin],
) -> Result<Vec<PackagePin>> {
    let locked = select_locked_pins(declared, installed);
    effects
        .fs()
        .write_atomic(lock, render_pins(&locked).as_bytes())?;
    info!("updated lock file {} ({} packages)", lock.display(), locked.len());
    Ok(locked)
}

/// Resolves `specs` and merges the result into the requirements file.
///
/// Nothing is written unless both resolutions succeed.
pub(crate) fn update_requirements(
    effects: &dyn Effects,
    requirements: &Path,
    specs: &[String],
    declared_entries: bool,
) -> Result<Vec<PinChange>> {
    let requested = resolve_packages(effects, specs)?;
    let existing = if declared_entries {
        resolve_requirements(effects, requirements, false)?
    } else {
        Vec::new()
    };
    let merged = merge_requested_pins(&existing, &requested);
    for change in &merged.changes {
        match change {
            PinChange::Updated { name, from, to } => {
                info!("changing {name} from {from} to {to}");
            }
            PinChange::Added { name, version } => info!("adding {name}=={version}"),
        }
    }
    effects
        .fs()
        .write_atomic(requirements, render_pins(&merged.pins).as_bytes())?;
    Ok(merged.changes)
}
