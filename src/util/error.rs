//! Error types for stereomatch.

use thiserror::Error;

/// Result alias for stereomatch operations.
pub type StereoResult<T> = std::result::Result<T, StereoError>;

/// Errors that can occur when building views or running disparity estimation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StereoError {
    /// Width or height is zero, or the buffer size overflows.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride: width={width}, stride={stride}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside the image.
    #[error(
        "roi out of bounds: x={x}, y={y}, width={width}, height={height} \
         (image {img_width}x{img_height})"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Left and right images of a stereo pair differ in size.
    #[error(
        "stereo pair shape mismatch: left {left_width}x{left_height}, \
         right {right_width}x{right_height}"
    )]
    ShapeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// Disparity range bounds are out of order.
    #[error("invalid disparity range: min={min} exceeds max={max}")]
    InvalidDisparityRange { min: usize, max: usize },
    /// Mask band cannot be applied.
    #[error("invalid mask band [{low}, {high}]: {reason}")]
    InvalidMaskBand {
        low: f32,
        high: f32,
        reason: &'static str,
    },
    /// Scanline backtracking reached a cell with no recorded move.
    #[error("scanline backtrack reached cell (left={left}, right={right}) in row {row} without a move")]
    BacktrackInconsistent {
        row: usize,
        left: usize,
        right: usize,
    },
    /// The row observer requested cancellation.
    #[error("disparity computation cancelled")]
    Cancelled,
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image decoding or encoding failed.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
