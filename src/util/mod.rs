//! Shared utility helpers.

pub mod error;

pub use error::{IconLocError, IconLocResult, ImageRole};
