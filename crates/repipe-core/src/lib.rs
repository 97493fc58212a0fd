#![deny(clippy::all)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::python::python_sys;
pub(crate) use crate::core::runtime::{effects, process};
pub(crate) use crate::core::tooling::outcome;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{Config, GlobalOptions, PipConfig};
pub use crate::core::install::{
    install, run_install, InstallError, InstallReport, InstallRequest, InstallSource,
};
pub use crate::core::runtime::effects::{
    Effects, FileSystem, PackageInstaller, SharedEffects, SystemEffects,
};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::core::tooling::response::{format_status_message, to_json_response, CommandGroup};
