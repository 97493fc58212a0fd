use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::pip::SystemPip;
use super::process::RunOutput;
use crate::config::PipConfig;

/// The four pip operations repipe relies on.
///
/// Implementations report pip's exit status through [`RunOutput`]; an `Err`
/// means pip could not be run at all.
pub trait PackageInstaller: Send + Sync {
    /// `pip install -r <requirements>`.
    fn install_requirements(&self, requirements: &Path) -> Result<RunOutput>;

    /// Dry-run install of a requirements file, writing pip's JSON report to
    /// `report`. Transitive dependencies are skipped unless `include_deps`.
    fn resolve_requirements(
        &self,
        requirements: &Path,
        include_deps: bool,
        report: &Path,
    ) -> Result<RunOutput>;

    /// Dry-run, no-deps install of package specifiers, writing pip's JSON
    /// report to `report`.
    fn resolve_packages(&self, specs: &[String], report: &Path) -> Result<RunOutput>;

    /// `pip freeze`, with its listing written to `output`.
    fn list_installed(&self, output: &Path) -> Result<RunOutput>;
}

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Replaces `path` with `contents` in one rename.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

pub trait Effects: Send + Sync {
    fn installer(&self) -> &dyn PackageInstaller;
    fn fs(&self) -> &dyn FileSystem;
}

pub struct SystemEffects {
    installer: Arc<SystemPip>,
    fs: Arc<SystemFileSystem>,
}

impl SystemEffects {
    #[must_use]
    pub fn new(pip: PipConfig) -> Self {
        Self {
            installer: Arc::new(SystemPip::new(pip)),
            fs: Arc::new(SystemFileSystem),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new(PipConfig::default())
    }
}

impl Effects for SystemEffects {
    fn installer(&self) -> &dyn PackageInstaller {
        self.installer.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

pub(crate) struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = scratch_builder()
            .tempfile_in(dir)
            .with_context(|| format!("creating temporary file in {}", dir.display()))?;
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .with_context(|| format!("copying permissions of {}", path.display()))?;
        }
        tmp.write_all(contents)
            .with_context(|| format!("writing {}", path.display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("syncing {}", path.display()))?;
        tmp.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Temp files start out owner-only; new targets instead get the mode a plain
/// create would, with the umask applied.
#[cfg(unix)]
fn scratch_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder
        .prefix(".repipe-")
        .permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn scratch_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".repipe-");
    builder
}

pub type SharedEffects = Arc<dyn Effects>;
