//! Disparity search strategies.
//!
//! `block` sweeps a window along each pixel's disparity range with an SSD or
//! NCC kernel. `scanline` aligns whole rows by dynamic programming with an
//! explicit occlusion penalty.

use crate::disparity::StereoPair;
use crate::progress::{NoProgress, RowObserver};
use crate::util::StereoResult;

pub(crate) mod block;
pub(crate) mod scanline;

pub use block::{BlockMatchConfig, BlockMatcher, Metric};
pub use scanline::{Move, ScanlineConfig, ScanlineMatcher, ScanlineTables, DEFAULT_OCCLUSION_COST};

/// Common interface of the disparity estimators.
pub trait DisparityAlgorithm {
    /// Disparity output produced for one stereo pair.
    type Output;

    /// Computes disparities, reporting each finished row to `observer` and
    /// polling it for cancellation before each row.
    fn compute_with(
        &self,
        pair: StereoPair<'_>,
        observer: &dyn RowObserver,
    ) -> StereoResult<Self::Output>;

    /// Computes disparities without progress reporting.
    fn compute(&self, pair: StereoPair<'_>) -> StereoResult<Self::Output> {
        self.compute_with(pair, &NoProgress)
    }
}
