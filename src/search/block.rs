//! Windowed block matching.
//!
//! For every pixel the right-image window is the template. Candidate blocks
//! are taken from the left image starting `range.min` columns to the right of
//! the window and sliding up to the per-pixel clamped maximum. The winning
//! offset plus `range.min` is the disparity. When no candidate fits (empty
//! window, collapsed range, strip narrower than the template) the pixel gets
//! `range.min`.

use crate::disparity::{DisparityMap, DisparityRange, StereoPair};
use crate::image::BlockWindow;
use crate::kernel::{Kernel, NccNormed, SsdNormed};
use crate::progress::RowObserver;
use crate::search::DisparityAlgorithm;
use crate::trace::{trace_event, trace_span};
use crate::util::{StereoError, StereoResult};

/// Block similarity metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Normalized sum of squared differences (argmin).
    Ssd,
    /// Normalized cross-correlation (argmax).
    Ncc,
}

impl Metric {
    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Ssd => "ssd",
            Metric::Ncc => "ncc",
        }
    }
}

/// Configuration for [`BlockMatcher`].
#[derive(Clone, Debug)]
pub struct BlockMatchConfig {
    /// Similarity metric.
    pub metric: Metric,
    /// Window radius; windows span `[c - r, c + r)` before clipping.
    pub block_radius: usize,
    /// Candidate disparities.
    pub disparity: DisparityRange,
    /// Process rows with rayon (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for BlockMatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Ssd,
            block_radius: 3,
            disparity: DisparityRange::default(),
            parallel: false,
        }
    }
}

impl BlockMatchConfig {
    /// Checks the disparity range ordering.
    pub fn validate(&self) -> StereoResult<()> {
        self.disparity.validate()
    }
}

/// SSD/NCC block matcher producing one dense disparity map.
#[derive(Clone, Debug)]
pub struct BlockMatcher {
    cfg: BlockMatchConfig,
}

impl BlockMatcher {
    /// Creates a matcher after validating `cfg`.
    pub fn new(cfg: BlockMatchConfig) -> StereoResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BlockMatchConfig {
        &self.cfg
    }
}

impl DisparityAlgorithm for BlockMatcher {
    type Output = DisparityMap;

    fn compute_with(
        &self,
        pair: StereoPair<'_>,
        observer: &dyn RowObserver,
    ) -> StereoResult<DisparityMap> {
        let _span = trace_span!(
            "block_match",
            metric = self.cfg.metric.name(),
            radius = self.cfg.block_radius,
            width = pair.width(),
            height = pair.height()
        )
        .entered();

        let map = match self.cfg.metric {
            Metric::Ssd => run::<SsdNormed>(pair, &self.cfg, observer)?,
            Metric::Ncc => run::<NccNormed>(pair, &self.cfg, observer)?,
        };

        if let Some((min, max)) = map.min_max() {
            trace_event!("disparity_stats", min = min, max = max);
        }
        Ok(map)
    }
}

fn run<K: Kernel>(
    pair: StereoPair<'_>,
    cfg: &BlockMatchConfig,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityMap> {
    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            return crate::kernel::rayon::block_match_par::<K>(pair, cfg, observer);
        }
    }
    block_match_seq::<K>(pair, cfg, observer)
}

fn block_match_seq<K: Kernel>(
    pair: StereoPair<'_>,
    cfg: &BlockMatchConfig,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityMap> {
    let width = pair.width();
    let height = pair.height();
    let mut map = DisparityMap::new(width, height);

    for (y, row) in map.as_mut_slice().chunks_mut(width).enumerate() {
        if observer.should_cancel() {
            return Err(StereoError::Cancelled);
        }
        match_row::<K>(pair, cfg, y, row);
        observer.on_row(y, height);
    }

    Ok(map)
}

/// Fills one output row with block-matched disparities.
pub(crate) fn match_row<K: Kernel>(
    pair: StereoPair<'_>,
    cfg: &BlockMatchConfig,
    y: usize,
    out: &mut [f32],
) {
    for (x, cell) in out.iter_mut().enumerate() {
        *cell = match_pixel::<K>(pair, cfg.block_radius, cfg.disparity, x, y) as f32;
    }
}

/// Returns the disparity chosen for pixel `(x, y)`.
pub(crate) fn match_pixel<K: Kernel>(
    pair: StereoPair<'_>,
    radius: usize,
    range: DisparityRange,
    x: usize,
    y: usize,
) -> usize {
    let width = pair.width();
    let win = BlockWindow::around(width, pair.height(), x, y, radius);
    let max_d = range.clamped_max(width, win.x1);
    if max_d <= range.min {
        return range.min;
    }

    let Some(template) = win.view(pair.right()) else {
        return range.min;
    };
    let Ok(strip) = pair
        .left()
        .roi(win.x0 + range.min, win.y0, max_d - range.min, win.height())
    else {
        return range.min;
    };

    K::sweep(strip, template).map_or(0, |best| best.offset) + range.min
}
