//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{IconLocError, IconLocResult};
use std::path::Path;

/// Creates an owned single-channel image from a dynamic image.
pub fn owned_gray_from_dynamic(img: &image::DynamicImage) -> IconLocResult<OwnedImage> {
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Creates an owned RGB image from a dynamic image, dropping any alpha.
pub fn owned_rgb_from_dynamic(img: &image::DynamicImage) -> IconLocResult<OwnedImage> {
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    OwnedImage::with_channels(rgb.into_raw(), width, height, 3)
}

fn open<P: AsRef<Path>>(path: P) -> IconLocResult<image::DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|err| IconLocError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> IconLocResult<OwnedImage> {
    owned_gray_from_dynamic(&open(path)?)
}

/// Loads an image from disk and converts it to an RGB owned image.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> IconLocResult<OwnedImage> {
    owned_rgb_from_dynamic(&open(path)?)
}
