//! Low-level building blocks for custom matching pipelines and diagnosis.
//!
//! These expose the window extractor, the score kernels and the scanline
//! cost/move tables. Most users should prefer [`BlockMatcher`] and
//! [`ScanlineMatcher`].
//!
//! [`BlockMatcher`]: crate::BlockMatcher
//! [`ScanlineMatcher`]: crate::ScanlineMatcher

pub use crate::candidate::best::{BestScore, Candidate, Polarity};
pub use crate::image::BlockWindow;
pub use crate::kernel::scalar::accumulate as accumulate_scalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::accumulate as accumulate_simd;
pub use crate::kernel::{BlockSums, Kernel, NccNormed, SsdNormed};
pub use crate::search::{Move, ScanlineTables};
