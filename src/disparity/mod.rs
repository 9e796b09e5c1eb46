//! Disparity data structures shared by all matchers.
//!
//! Block matchers produce a dense [`DisparityMap`]. The scanline matcher
//! produces a [`DisparityPair`] of [`ScanlineDisparityMap`]s whose cells are
//! `None` wherever the optimal path never matched a pixel, so that a zero
//! disparity is never confused with "not visited".

use crate::image::{ImageView, OwnedImage};
use crate::util::{StereoError, StereoResult};

/// Left and right grayscale images of a rectified stereo pair.
///
/// Both views are guaranteed to share the same width and height.
#[derive(Clone, Copy, Debug)]
pub struct StereoPair<'a> {
    left: ImageView<'a, u8>,
    right: ImageView<'a, u8>,
}

impl<'a> StereoPair<'a> {
    /// Pairs two views, failing when their shapes differ.
    pub fn new(left: ImageView<'a, u8>, right: ImageView<'a, u8>) -> StereoResult<Self> {
        if left.shape() != right.shape() {
            return Err(StereoError::ShapeMismatch {
                left_width: left.width(),
                left_height: left.height(),
                right_width: right.width(),
                right_height: right.height(),
            });
        }
        Ok(Self { left, right })
    }

    /// Returns the left view.
    pub fn left(&self) -> ImageView<'a, u8> {
        self.left
    }

    /// Returns the right view.
    pub fn right(&self) -> ImageView<'a, u8> {
        self.right
    }

    /// Shared image width.
    pub fn width(&self) -> usize {
        self.left.width()
    }

    /// Shared image height.
    pub fn height(&self) -> usize {
        self.left.height()
    }
}

/// Closed interval of candidate disparities.
///
/// The upper bound is further clamped per pixel so that every candidate
/// window stays inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisparityRange {
    /// Smallest disparity considered.
    pub min: usize,
    /// Largest disparity considered before per-pixel clamping.
    pub max: usize,
}

impl DisparityRange {
    /// Creates a validated range.
    pub fn new(min: usize, max: usize) -> StereoResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Checks that `min <= max`.
    pub fn validate(&self) -> StereoResult<()> {
        if self.min > self.max {
            return Err(StereoError::InvalidDisparityRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Clamps `max` for a window whose exclusive right edge is `window_x1`.
    pub fn clamped_max(&self, width: usize, window_x1: usize) -> usize {
        self.max.min(width.saturating_sub(window_x1))
    }
}

impl Default for DisparityRange {
    fn default() -> Self {
        Self { min: 0, max: 64 }
    }
}

/// Dense floating-point disparity map in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMap {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl DisparityMap {
    /// Creates a zero-filled map; dimensions come from a validated view.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Wraps a row-major buffer of exactly `width * height` values.
    pub fn from_vec(data: Vec<f32>, width: usize, height: usize) -> StereoResult<Self> {
        if width == 0 || height == 0 {
            return Err(StereoError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(StereoError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(StereoError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the disparity at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Sets the disparity at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: usize, y: usize, value: f32) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns the row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Smallest and largest finite disparity, if any.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Renders the map as 8-bit gray, clamping values to `[0, 255]`.
    pub fn to_gray(&self) -> OwnedImage {
        self.render(1.0)
    }

    /// Renders the map as 8-bit gray scaled so the largest disparity is 255.
    ///
    /// Falls back to [`DisparityMap::to_gray`] when the map has no positive
    /// disparity.
    pub fn to_gray_normalized(&self) -> OwnedImage {
        let scale = match self.min_max() {
            Some((_, max)) if max > 0.0 => 255.0 / max,
            _ => 1.0,
        };
        self.render(scale)
    }

    fn render(&self, scale: f32) -> OwnedImage {
        let data: Vec<u8> = self
            .data
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    0
                } else {
                    (v * scale).clamp(0.0, 255.0) as u8
                }
            })
            .collect();
        OwnedImage::new(data, self.width, self.height)
            .expect("disparity map dimensions are validated on construction")
    }
}

/// Sparse scanline disparity map; `None` marks cells the matching path
/// never visited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanlineDisparityMap {
    data: Vec<Option<u32>>,
    width: usize,
    height: usize,
}

impl ScanlineDisparityMap {
    /// Creates a map with every cell unvisited.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![None; width * height],
            width,
            height,
        }
    }

    /// Map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(x, y)`; `None` for unvisited or out-of-bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data[y * self.width + x]
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> Option<&[Option<u32>]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Option<u32>] {
        &mut self.data
    }

    /// Number of cells that received a disparity.
    pub fn visited_count(&self) -> usize {
        self.data.iter().filter(|cell| cell.is_some()).count()
    }

    /// Converts to a dense map, writing `fill` into unvisited cells.
    pub fn to_dense(&self, fill: f32) -> DisparityMap {
        let data = self
            .data
            .iter()
            .map(|cell| cell.map_or(fill, |d| d as f32))
            .collect();
        DisparityMap {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Disparity maps aligned to the left and right image columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisparityPair {
    /// Disparities indexed by left-image column.
    pub left: ScanlineDisparityMap,
    /// Disparities indexed by right-image column.
    pub right: ScanlineDisparityMap,
}
