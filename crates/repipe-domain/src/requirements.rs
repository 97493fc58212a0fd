//! Merging newly requested pins into an existing requirements declaration.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::pin::PackagePin;

/// A change made to the requirements declaration by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PinChange {
    Updated {
        name: String,
        from: String,
        to: String,
    },
    Added {
        name: String,
        version: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedRequirements {
    pub pins: Vec<PackagePin>,
    pub changes: Vec<PinChange>,
}

/// Merges `requested` into `existing`.
///
/// Existing pins keep their position; a requested name that is already
/// declared replaces that entry in place and is consumed. Requested names
/// that were never consumed are appended in request order. Names are compared
/// canonically and the output never repeats a name: a repeated request keeps
/// its first occurrence, and a name declared twice in `existing` collapses
/// into its first entry.
pub fn merge_requested_pins(
    existing: &[PackagePin],
    requested: &[PackagePin],
) -> MergedRequirements {
    let mut wanted: IndexMap<String, &PackagePin> = IndexMap::new();
    for pin in requested {
        wanted.entry(pin.canonical_name()).or_insert(pin);
    }
    let mut pending: IndexSet<String> = wanted.keys().cloned().collect();

    let mut merged: IndexMap<String, PackagePin> = IndexMap::new();
    let mut changes = Vec::new();
    for pin in existing {
        let key = pin.canonical_name();
        if merged.contains_key(&key) {
            continue;
        }
        let entry = match wanted.get(&key) {
            Some(replacement) => {
                pending.shift_remove(&key);
                if replacement.version != pin.version {
                    changes.push(PinChange::Updated {
                        name: replacement.name.clone(),
                        from: pin.version.clone(),
                        to: replacement.version.clone(),
                    });
                }
                (*replacement).clone()
            }
            None => pin.clone(),
        };
        merged.insert(key, entry);
    }

    for key in pending {
        let pin = wanted[&key];
        changes.push(PinChange::Added {
            name: pin.name.clone(),
            version: pin.version.clone(),
        });
        merged.insert(key, pin.clone());
    }

    MergedRequirements {
        pins: merged.into_values().collect(),
        changes,
    }
}

/// Whether a requirements file has anything for pip to act on.
///
/// pip writes no report for a file without requirements, so blank and
/// comment-only files are handled without invoking it.
pub fn declares_requirements(contents: &str) -> bool {
    contents.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}
