use crate::pin::PackagePin;

/// Parsed `pip freeze` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeListing {
    pub pins: Vec<PackagePin>,
    /// Lines that were not a plain `name==version` pin, such as
    /// `pkg @ git+https://...` or `-e` entries.
    pub skipped: Vec<String>,
}

/// Splits each line on `==` and keeps only lines with exactly two parts.
///
/// Anything else is recorded in [`FreezeListing::skipped`] rather than treated
/// as an error: VCS and editable installs have no exact pin to lock.
pub fn parse_freeze_listing(contents: &str) -> FreezeListing {
    let mut listing = FreezeListing::default();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split("==").collect();
        match parts.as_slice() {
            [name, version] => listing
                .pins
                .push(PackagePin::new(name.trim(), version.trim())),
            _ => listing.skipped.push(line.to_string()),
        }
    }
    listing
}
