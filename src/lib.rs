//! iconloc finds icon templates in a larger scene image.
//!
//! Every window placement is scored with normalized cross-correlation and
//! reported when the score reaches a threshold. Scans can run densely or tile
//! by tile (identical results), optionally in parallel via the `rayon`
//! feature. Image decoding lives behind the `image-io` feature.

pub mod classify;
mod candidate;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use candidate::nms::suppress_overlapping;
pub use candidate::peak::Peak;
pub use crate::image::{ImageView, OwnedImage};
pub use search::offset::{apply_offset, Offset};
pub use search::{
    Anchor, IconLocator, LocateConfig, LocateReport, Match, OutcomeStatus, ScanStrategy,
    TemplateOutcome,
};
pub use template::{Template, TemplateSet};
pub use util::{IconLocError, IconLocResult, ImageRole};
