//! Error types for iconloc.

use std::fmt;
use thiserror::Error;

/// Result alias for iconloc operations.
pub type IconLocResult<T> = std::result::Result<T, IconLocError>;

/// Which input of a scan an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageRole {
    /// The large image being searched.
    Scene,
    /// The small icon image searched for.
    Template,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRole::Scene => f.write_str("scene"),
            ImageRole::Template => f.write_str("template"),
        }
    }
}

/// Errors that can occur when locating icons.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IconLocError {
    /// The template is larger than the scene on at least one axis.
    #[error(
        "template {tpl_width}x{tpl_height} does not fit in scene {img_width}x{img_height}"
    )]
    InvalidDimensions {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// An input image has zero width or height.
    #[error("{role} image is empty ({width}x{height})")]
    EmptyImage {
        role: ImageRole,
        width: usize,
        height: usize,
    },
    /// Scene and template disagree on the number of channels per pixel.
    #[error("channel mismatch: scene has {scene}, template has {template}")]
    ChannelMismatch { scene: usize, template: usize },
    /// The channel count is zero or unsupported by the operation.
    #[error("invalid channel count {channels}")]
    InvalidChannels { channels: usize },
    /// Row stride is shorter than one row of pixels.
    #[error("invalid stride {stride} for row length {row_len}")]
    InvalidStride { row_len: usize, stride: usize },
    /// Backing buffer is shorter than the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested region lies outside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The similarity threshold is NaN.
    #[error("invalid threshold {threshold}")]
    InvalidThreshold { threshold: f64 },
    /// A label was inserted twice into a template set.
    #[error("duplicate template label {label:?}")]
    DuplicateLabel { label: String },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Decoding an image file failed.
    #[error("failed to load image {path}: {reason}")]
    ImageIo { path: String, reason: String },
}
