//! Clipped block windows around a center pixel.
//!
//! A window of radius `r` centered on `(x, y)` covers columns
//! `[max(0, x - r), min(width - 1, x + r))` and the matching row range. The
//! upper bounds are exclusive, so interior windows are `2r x 2r` and windows
//! never include the last image row or column. Edge windows shrink instead
//! of being padded.

use crate::image::ImageView;

/// Half-open pixel rectangle produced by clipping a block to image bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockWindow {
    /// First column (inclusive).
    pub x0: usize,
    /// First row (inclusive).
    pub y0: usize,
    /// End column (exclusive).
    pub x1: usize,
    /// End row (exclusive).
    pub y1: usize,
}

impl BlockWindow {
    /// Builds the clipped window of `radius` around `(x, y)` in a
    /// `width x height` image.
    ///
    /// `width` and `height` must be non-zero and `(x, y)` inside the image.
    pub fn around(width: usize, height: usize, x: usize, y: usize, radius: usize) -> Self {
        debug_assert!(x < width && y < height);
        Self {
            x0: x.saturating_sub(radius),
            y0: y.saturating_sub(radius),
            x1: x.saturating_add(radius).min(width - 1),
            y1: y.saturating_add(radius).min(height - 1),
        }
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// Returns true when the window covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns the window as a zero-copy view, or `None` when it is empty or
    /// does not fit `image`.
    pub fn view<'a, T>(&self, image: ImageView<'a, T>) -> Option<ImageView<'a, T>> {
        if self.is_empty() {
            return None;
        }
        image
            .roi(self.x0, self.y0, self.width(), self.height())
            .ok()
    }
}
