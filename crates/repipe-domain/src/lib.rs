#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod freeze;
pub mod lockfile;
pub mod pin;
pub mod report;
pub mod requirements;

pub use freeze::{parse_freeze_listing, FreezeListing};
pub use lockfile::{is_lock_path, lock_path_for, select_locked_pins, LOCK_SUFFIX};
pub use pin::{canonicalize_package_name, render_pins, PackagePin};
pub use report::{parse_install_report, ReportError};
pub use requirements::{
    declares_requirements, merge_requested_pins, MergedRequirements, PinChange,
};
