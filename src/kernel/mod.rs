//! Block similarity kernels.
//!
//! A kernel turns the raw sums of one template/candidate placement into a
//! score. Both metrics are normalized by `sqrt(sum(T^2) * sum(I^2))`:
//!
//! - SSD: `sum((T - I)^2) / norm`, lower is better.
//! - NCC: `sum(T * I) / norm`, higher is better.
//!
//! Sums are accumulated as integers, so a score depends only on the pixel
//! values and never on the accumulation order.

use crate::candidate::best::{BestScore, Candidate, Polarity};
use crate::ImageView;

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(not(feature = "simd"))]
pub(crate) use scalar::accumulate as accumulate_block;
#[cfg(feature = "simd")]
pub(crate) use simd::accumulate as accumulate_block;

/// Raw products accumulated over one template placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockSums {
    /// `sum(T * I)`.
    pub cross: u64,
    /// `sum(T * T)`.
    pub template_sq: u64,
    /// `sum(I * I)`.
    pub image_sq: u64,
}

impl BlockSums {
    /// `sum((T - I)^2)`, derived from the three accumulated sums.
    pub fn sq_diff(&self) -> u64 {
        self.template_sq + self.image_sq - 2 * self.cross
    }

    /// Normalization term `sqrt(sum(T^2) * sum(I^2))`.
    pub fn norm(&self) -> f64 {
        (self.template_sq as f64 * self.image_sq as f64).sqrt()
    }
}

/// Divides `numerator` by `denominator`, saturating near-degenerate ratios.
///
/// Ratios whose magnitude reaches the denominator snap to `+-1` when within
/// 12.5% of it; anything larger (including a zero denominator) yields
/// `fallback`.
pub(crate) fn normalized_ratio(numerator: f64, denominator: f64, fallback: f32) -> f32 {
    let magnitude = numerator.abs();
    if magnitude < denominator {
        (numerator / denominator) as f32
    } else if magnitude < denominator * 1.125 {
        numerator.signum() as f32
    } else {
        fallback
    }
}

/// Similarity metric over equally sized blocks.
pub trait Kernel {
    /// Whether lower or higher scores indicate a better match.
    const POLARITY: Polarity;

    /// Scores one placement from its accumulated sums.
    fn score(sums: &BlockSums) -> f32;

    /// Scores `template` against the block of `image` whose top-left corner
    /// is `(x, y)`. The block must lie inside `image`.
    fn score_at(image: ImageView<'_, u8>, template: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
        Self::score(&accumulate_block(image, template, x, y))
    }

    /// Slides `template` across a strip of the same height and returns the
    /// best offset (first one on ties). Returns `None` when the strip is
    /// narrower than the template or the heights differ.
    fn sweep(strip: ImageView<'_, u8>, template: ImageView<'_, u8>) -> Option<Candidate> {
        if strip.height() != template.height() || strip.width() < template.width() {
            return None;
        }
        let mut best = BestScore::new(Self::POLARITY);
        for offset in 0..=(strip.width() - template.width()) {
            best.push(offset, Self::score_at(strip, template, offset, 0));
        }
        best.best()
    }
}

/// Normalized sum of squared differences.
pub struct SsdNormed;

/// Normalized cross-correlation (not mean-subtracted).
pub struct NccNormed;

impl Kernel for SsdNormed {
    const POLARITY: Polarity = Polarity::Minimize;

    fn score(sums: &BlockSums) -> f32 {
        normalized_ratio(sums.sq_diff() as f64, sums.norm(), 1.0)
    }
}

impl Kernel for NccNormed {
    const POLARITY: Polarity = Polarity::Maximize;

    fn score(sums: &BlockSums) -> f32 {
        normalized_ratio(sums.cross as f64, sums.norm(), 0.0)
    }
}
