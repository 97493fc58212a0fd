pub(crate) mod config;
pub(crate) mod install;
pub(crate) mod python;
pub(crate) mod runtime;
pub(crate) mod tooling;
