//! Peak representation and caller-side pruning of matches.

pub(crate) mod nms;
pub(crate) mod peak;
