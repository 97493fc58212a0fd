use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_MAX_CAPTURE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub json: bool,
    /// Interpreter that runs `-m pip`; wins over `REPIPE_PYTHON`.
    pub python: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) pip: PipConfig,
}

/// How pip is located and invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipConfig {
    /// Explicit interpreter; `None` means search `PATH` for `python3`/`python`.
    pub python: Option<String>,
    /// Pass `--quiet` to dry-run resolutions.
    pub quiet_reports: bool,
    /// Echo pip's install output to stderr while capturing it.
    pub stream_output: bool,
    pub max_capture_bytes: usize,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            python: None,
            quiet_reports: true,
            stream_output: false,
            max_capture_bytes: DEFAULT_MAX_CAPTURE_BYTES,
        }
    }
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env(global: &GlobalOptions) -> Self {
        Self::from_snapshot(&EnvSnapshot::capture(), global)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, global: &GlobalOptions) -> Self {
        let python = global
            .python
            .clone()
            .or_else(|| snapshot.var("REPIPE_PYTHON").map(ToOwned::to_owned))
            .filter(|value| !value.trim().is_empty());
        Self {
            pip: PipConfig {
                python,
                quiet_reports: !matches!(
                    snapshot.var("REPIPE_PIP_QUIET").map(str::to_ascii_lowercase).as_deref(),
                    Some("0" | "false" | "no" | "off")
                ),
                stream_output: !(global.quiet || global.json),
                max_capture_bytes: snapshot
                    .var("REPIPE_MAX_CAPTURE_BYTES")
                    .and_then(|raw| raw.trim().parse::<usize>().ok())
                    .filter(|value| *value > 0)
                    .unwrap_or(DEFAULT_MAX_CAPTURE_BYTES),
            },
        }
    }

    #[must_use]
    pub fn pip(&self) -> &PipConfig {
        &self.pip
    }
}
