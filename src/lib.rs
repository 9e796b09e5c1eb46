//! stereomatch computes dense disparity maps from rectified stereo pairs.
//!
//! Three estimators are provided: windowed SSD and NCC block matching
//! ([`BlockMatcher`]) and per-scanline dynamic programming
//! ([`ScanlineMatcher`]). A disparity band can then be turned into a
//! foreground mask for selective blur with [`create_mask`].
//!
//! Rows can be processed in parallel with the `rayon` feature, block sums
//! can be vectorized with `simd`, images can be loaded with `image-io`, and
//! spans/events are emitted with `tracing`.

pub mod candidate;
pub mod disparity;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod mask;
pub mod progress;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;

pub use disparity::{DisparityMap, DisparityPair, DisparityRange, ScanlineDisparityMap, StereoPair};
pub use image::{ImageView, OwnedImage};
pub use mask::{create_mask, DisparityBand, MASK_BACKGROUND, MASK_FOREGROUND};
pub use progress::{CancelFlag, NoProgress, RowCallback, RowObserver, TracingProgress};
pub use search::{
    BlockMatchConfig, BlockMatcher, DisparityAlgorithm, Metric, ScanlineConfig, ScanlineMatcher,
    DEFAULT_OCCLUSION_COST,
};
pub use util::{StereoError, StereoResult};
