//! `python -m pip` as the package installer.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use tracing::debug;

use super::effects::PackageInstaller;
use super::process::{run_command, run_command_streaming, run_command_to_file, RunOutput};
use crate::config::PipConfig;
use crate::python_sys::detect_interpreter;

pub(crate) struct SystemPip {
    config: PipConfig,
    python: OnceLock<String>,
}

impl SystemPip {
    pub(crate) fn new(config: PipConfig) -> Self {
        Self {
            config,
            python: OnceLock::new(),
        }
    }

    fn python(&self) -> Result<&str> {
        if let Some(python) = self.python.get() {
            return Ok(python.as_str());
        }
        let detected = detect_interpreter(self.config.python.as_deref())?;
        Ok(self.python.get_or_init(|| detected).as_str())
    }

    fn envs() -> Vec<(String, String)> {
        vec![("PIP_DISABLE_PIP_VERSION_CHECK".into(), "1".into())]
    }

    fn run(&self, args: &[String]) -> Result<RunOutput> {
        let python = self.python()?;
        debug!(python, args = %args.join(" "), "running pip");
        run_command(python, args, &Self::envs(), self.config.max_capture_bytes)
    }
}

impl PackageInstaller for SystemPip {
    fn install_requirements(&self, requirements: &Path) -> Result<RunOutput> {
        let python = self.python()?;
        let args = install_args(requirements);
        debug!(python, args = %args.join(" "), "running pip");
        if self.config.stream_output {
            run_command_streaming(python, &args, &Self::envs(), self.config.max_capture_bytes)
        } else {
            run_command(python, &args, &Self::envs(), self.config.max_capture_bytes)
        }
    }

    fn resolve_requirements(
        &self,
        requirements: &Path,
        include_deps: bool,
        report: &Path,
    ) -> Result<RunOutput> {
        let mut args = dry_run_args(self.config.quiet_reports, report);
        if !include_deps {
            args.push("--no-deps".into());
        }
        args.push("-r".into());
        args.push(path_arg(requirements));
        self.run(&args)
    }

    fn resolve_packages(&self, specs: &[String], report: &Path) -> Result<RunOutput> {
        let mut args = dry_run_args(self.config.quiet_reports, report);
        args.push("--no-deps".into());
        args.extend(specs.iter().cloned());
        self.run(&args)
    }

    fn list_installed(&self, output: &Path) -> Result<RunOutput> {
        let python = self.python()?;
        let args = vec!["-m".to_string(), "pip".to_string(), "freeze".to_string()];
        debug!(python, args = %args.join(" "), output = %output.display(), "running pip");
        run_command_to_file(
            python,
            &args,
            &Self::envs(),
            output,
            self.config.max_capture_bytes,
        )
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn install_args(requirements: &Path) -> Vec<String> {
    vec![
        "-m".into(),
        "pip".into(),
        "install".into(),
        "-r".into(),
        path_arg(requirements),
    ]
}

fn dry_run_args(quiet: bool, report: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec!["-m".into(), "pip".into(), "install".into()];
    if quiet {
        args.push("--quiet".into());
    }
    args.extend([
        "--dry-run".into(),
        "--ignore-installed".into(),
        "--report".into(),
        path_arg(report),
    ]);
    args
}
