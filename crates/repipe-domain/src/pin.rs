use std::fmt;

use serde::{Deserialize, Serialize};

/// An exact `name==version` pin as pip reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackagePin {
    pub name: String,
    pub version: String,
}

impl PackagePin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Name used for identity comparisons; the display name is what gets written.
    pub fn canonical_name(&self) -> String {
        canonicalize_package_name(&self.name)
    }
}

impl fmt::Display for PackagePin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Normalizes a distribution name the way pip compares them: lowercase, with
/// every run of `-`, `_` and `.` collapsed to a single `-`.
pub fn canonicalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(ch.to_ascii_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Renders pins in requirements-file form, one `name==version` per line.
pub fn render_pins(pins: &[PackagePin]) -> String {
    let mut out = String::new();
    for pin in pins {
        out.push_str(&pin.to_string());
        out.push('\n');
    }
    out
}
