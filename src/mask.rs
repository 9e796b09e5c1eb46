//! Foreground masks from a disparity band.
//!
//! Pixels whose disparity falls inside the inclusive band are foreground
//! (value 0) and stay sharp; everything else is background (value 255) and
//! is meant to be blurred by the caller.

use crate::disparity::DisparityMap;
use crate::image::OwnedImage;
use crate::util::{StereoError, StereoResult};

/// Mask value for pixels inside the band.
pub const MASK_FOREGROUND: u8 = 0;

/// Mask value for pixels outside the band.
pub const MASK_BACKGROUND: u8 = 255;

/// Inclusive disparity band selected as foreground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisparityBand {
    /// Lower bound; must be below 255.
    pub low: f32,
    /// Upper bound. A value below `low` selects nothing.
    pub high: f32,
}

impl DisparityBand {
    /// Creates a band without validation.
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Checks that the lower bound is below 255.
    pub fn validate(&self) -> StereoResult<()> {
        if !(self.low < 255.0) {
            return Err(StereoError::InvalidMaskBand {
                low: self.low,
                high: self.high,
                reason: "lower bound must be below 255",
            });
        }
        Ok(())
    }

    /// Returns true when `disparity` lies inside the band. NaN never does.
    pub fn contains(&self, disparity: f32) -> bool {
        disparity >= self.low && disparity <= self.high
    }
}

/// Thresholds `map` into a foreground/background mask of the same shape.
pub fn create_mask(map: &DisparityMap, band: DisparityBand) -> StereoResult<OwnedImage> {
    band.validate()?;
    let data = map
        .as_slice()
        .iter()
        .map(|&d| {
            if band.contains(d) {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            }
        })
        .collect();
    OwnedImage::new(data, map.width(), map.height())
}
