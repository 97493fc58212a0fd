pub(crate) mod outcome;
pub(crate) mod response;
