use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::pin::PackagePin;

pub const LOCK_SUFFIX: &str = ".lock";

/// The lock file sits next to the requirements file with `.lock` appended to
/// the full file name (`requirements.txt` -> `requirements.txt.lock`).
pub fn lock_path_for(requirements: &Path) -> PathBuf {
    let mut raw: OsString = requirements.as_os_str().to_os_string();
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}

pub fn is_lock_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > LOCK_SUFFIX.len() && name.ends_with(LOCK_SUFFIX))
}

/// Selects the installed pins that belong in the lock file.
///
/// `declared` is the requirements file resolved with dependencies; only
/// installed packages whose canonical name appears there are kept, in the
/// order pip listed them. Packages the user installed by hand are dropped.
pub fn select_locked_pins(declared: &[PackagePin], installed: &[PackagePin]) -> Vec<PackagePin> {
    let names: HashSet<String> = declared.iter().map(PackagePin::canonical_name).collect();
    let mut seen = HashSet::new();
    installed
        .iter()
        .filter(|pin| {
            let key = pin.canonical_name();
            names.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}
