//! Loading and saving grayscale images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{StereoError, StereoResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> StereoResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts a dynamic image to luma8 and copies it into an owned image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> StereoResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> StereoResult<OwnedImage> {
    let img = image::open(path).map_err(|err| StereoError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Writes a grayscale image; the format follows the file extension.
pub fn save_gray_image<P: AsRef<Path>>(path: P, img: &OwnedImage) -> StereoResult<()> {
    let buffer = image::GrayImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        img.data().to_vec(),
    )
    .ok_or(StereoError::BufferTooSmall {
        needed: img.width() * img.height(),
        got: img.data().len(),
    })?;
    buffer.save(path).map_err(|err| StereoError::ImageIo {
        reason: err.to_string(),
    })
}
