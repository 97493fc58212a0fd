//! Parsing for pip's `--report` JSON document.
//!
//! Only `install[].metadata.{name,version}` is read; the rest of the report
//! (download info, requested extras, environment markers) is ignored so newer
//! report versions keep parsing.

use serde::Deserialize;

use crate::pin::PackagePin;

#[derive(Debug, thiserror::Error)]
#[error("malformed pip install report: {0}")]
pub struct ReportError(#[from] serde_json::Error);

#[derive(Deserialize)]
struct InstallReport {
    install: Vec<InstallItem>,
}

#[derive(Deserialize)]
struct InstallItem {
    metadata: ItemMetadata,
}

#[derive(Deserialize)]
struct ItemMetadata {
    name: String,
    version: String,
}

/// Parses a dry-run report into pins, keeping pip's resolution order.
pub fn parse_install_report(contents: &str) -> Result<Vec<PackagePin>, ReportError> {
    let report: InstallReport = serde_json::from_str(contents)?;
    Ok(report
        .install
        .into_iter()
        .map(|item| PackagePin::new(item.metadata.name, item.metadata.version))
        .collect())
}
