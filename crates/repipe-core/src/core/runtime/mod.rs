//! Process execution and the effect boundary around pip.

pub(crate) mod effects;
pub(crate) mod pip;
pub(crate) mod process;
