//! Scanline dynamic-programming stereo matching.
//!
//! Each row is aligned independently. For a row of width `N` an `N x N`
//! cost table is filled where cell `(i, j)` holds the cheapest alignment of
//! left columns `0..=i` with right columns `0..=j`. Matching two pixels costs
//! their absolute intensity difference; skipping a pixel in either image
//! costs the occlusion penalty. The cheapest path is then walked back from
//! `(N - 1, N - 1)` and every diagonal step records `|i - j|` in both
//! disparity rows.

use crate::disparity::{DisparityPair, ScanlineDisparityMap, StereoPair};
use crate::progress::RowObserver;
use crate::search::DisparityAlgorithm;
use crate::trace::{trace_event, trace_span};
use crate::util::{StereoError, StereoResult};

/// Default penalty for a pixel without a correspondence.
pub const DEFAULT_OCCLUSION_COST: u32 = 20;

/// Predecessor move recorded for a cost-table cell.
///
/// When several moves reach the same cost the first one in declaration order
/// wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Move {
    /// Left column `i` matched with right column `j`.
    Diagonal = 1,
    /// Left column `i` occluded in the right image.
    Up = 2,
    /// Right column `j` occluded in the left image.
    Left = 3,
}

impl Move {
    /// Numeric path code (1, 2 or 3).
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Cost and move tables for one scanline.
///
/// Tables are sized once and refilled for every row handled by the same
/// worker.
#[derive(Clone, Debug)]
pub struct ScanlineTables {
    width: usize,
    cost: Vec<u64>,
    moves: Vec<Option<Move>>,
}

impl ScanlineTables {
    /// Allocates tables for rows of `width` pixels. No cell has a move until
    /// the tables are filled.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            cost: vec![0; width * width],
            moves: vec![None; width * width],
        }
    }

    /// Builds the tables for one pair of rows.
    pub fn build(left_row: &[u8], right_row: &[u8], occlusion_cost: u32) -> StereoResult<Self> {
        if left_row.len() != right_row.len() {
            return Err(StereoError::ShapeMismatch {
                left_width: left_row.len(),
                left_height: 1,
                right_width: right_row.len(),
                right_height: 1,
            });
        }
        if left_row.is_empty() {
            return Err(StereoError::InvalidDimensions {
                width: 0,
                height: 1,
            });
        }
        let mut tables = Self::new(left_row.len());
        tables.fill(left_row, right_row, occlusion_cost);
        Ok(tables)
    }

    /// Row width the tables were sized for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Accumulated cost of cell `(left, right)`.
    pub fn cost(&self, left: usize, right: usize) -> Option<u64> {
        if left >= self.width || right >= self.width {
            return None;
        }
        Some(self.cost[left * self.width + right])
    }

    /// Move recorded at cell `(left, right)`; border cells have none.
    pub fn step(&self, left: usize, right: usize) -> Option<Move> {
        if left >= self.width || right >= self.width {
            return None;
        }
        self.moves[left * self.width + right]
    }

    /// Recomputes both tables for a pair of rows of length `width()`.
    pub(crate) fn fill(&mut self, left_row: &[u8], right_row: &[u8], occlusion_cost: u32) {
        let n = self.width;
        debug_assert_eq!(left_row.len(), n);
        debug_assert_eq!(right_row.len(), n);
        let occ = u64::from(occlusion_cost);

        for i in 0..n {
            let border = i as u64 * occ;
            self.cost[i * n] = border;
            self.cost[i] = border;
        }

        for c in 1..n {
            let left_px = left_row[c];
            for d in 1..n {
                let diagonal = self.cost[(c - 1) * n + d - 1] + u64::from(left_px.abs_diff(right_row[d]));
                let up = self.cost[(c - 1) * n + d] + occ;
                let left = self.cost[c * n + d - 1] + occ;

                let (value, step) = if diagonal <= up && diagonal <= left {
                    (diagonal, Move::Diagonal)
                } else if up <= left {
                    (up, Move::Up)
                } else {
                    (left, Move::Left)
                };
                self.cost[c * n + d] = value;
                self.moves[c * n + d] = Some(step);
            }
        }
    }

    /// Walks the recorded moves back from the last cell until either index
    /// reaches zero, writing disparities into the two output rows.
    ///
    /// Returns the number of steps taken, at most `2 * (width - 1)`. Cells the
    /// path never matches are left untouched.
    pub fn backtrack(
        &self,
        row: usize,
        left_out: &mut [Option<u32>],
        right_out: &mut [Option<u32>],
    ) -> StereoResult<usize> {
        let n = self.width;
        if left_out.len() != n || right_out.len() != n {
            return Err(StereoError::InvalidInput(
                "backtrack output rows must match the table width",
            ));
        }
        if n == 0 {
            return Ok(0);
        }

        let mut i = n - 1;
        let mut j = n - 1;
        let mut steps = 0;
        while i != 0 && j != 0 {
            match self.moves[i * n + j] {
                Some(Move::Diagonal) => {
                    let disparity = i.abs_diff(j) as u32;
                    left_out[i] = Some(disparity);
                    right_out[j] = Some(disparity);
                    i -= 1;
                    j -= 1;
                }
                Some(Move::Up) => i -= 1,
                Some(Move::Left) => j -= 1,
                None => {
                    return Err(StereoError::BacktrackInconsistent {
                        row,
                        left: i,
                        right: j,
                    })
                }
            }
            steps += 1;
        }
        Ok(steps)
    }
}

/// Configuration for [`ScanlineMatcher`].
///
/// The occlusion cost is unsigned, so it cannot be negative; no upper limit
/// is imposed.
#[derive(Clone, Debug)]
pub struct ScanlineConfig {
    /// Penalty for leaving a pixel unmatched.
    pub occlusion_cost: u32,
    /// Process rows with rayon (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ScanlineConfig {
    fn default() -> Self {
        Self {
            occlusion_cost: DEFAULT_OCCLUSION_COST,
            parallel: false,
        }
    }
}

/// Dynamic-programming matcher producing left- and right-aligned maps.
#[derive(Clone, Debug, Default)]
pub struct ScanlineMatcher {
    cfg: ScanlineConfig,
}

impl ScanlineMatcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: ScanlineConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ScanlineConfig {
        &self.cfg
    }
}

impl DisparityAlgorithm for ScanlineMatcher {
    type Output = DisparityPair;

    fn compute_with(
        &self,
        pair: StereoPair<'_>,
        observer: &dyn RowObserver,
    ) -> StereoResult<DisparityPair> {
        let _span = trace_span!(
            "scanline_match",
            occlusion_cost = self.cfg.occlusion_cost,
            width = pair.width(),
            height = pair.height()
        )
        .entered();

        let out = run(pair, &self.cfg, observer)?;
        trace_event!(
            "scanline_visited",
            left = out.left.visited_count(),
            right = out.right.visited_count()
        );
        Ok(out)
    }
}

fn run(
    pair: StereoPair<'_>,
    cfg: &ScanlineConfig,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityPair> {
    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            return crate::kernel::rayon::scanline_match_par(pair, cfg.occlusion_cost, observer);
        }
    }
    scanline_match_seq(pair, cfg.occlusion_cost, observer)
}

fn scanline_match_seq(
    pair: StereoPair<'_>,
    occlusion_cost: u32,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityPair> {
    let width = pair.width();
    let height = pair.height();
    let mut left = ScanlineDisparityMap::new(width, height);
    let mut right = ScanlineDisparityMap::new(width, height);
    let mut tables = ScanlineTables::new(width);

    let rows = left
        .as_mut_slice()
        .chunks_mut(width)
        .zip(right.as_mut_slice().chunks_mut(width));
    for (y, (left_row, right_row)) in rows.enumerate() {
        if observer.should_cancel() {
            return Err(StereoError::Cancelled);
        }
        match_scanline(&mut tables, pair, occlusion_cost, y, left_row, right_row)?;
        observer.on_row(y, height);
    }

    Ok(DisparityPair { left, right })
}

/// Aligns row `y` of the pair and writes its disparities.
pub(crate) fn match_scanline(
    tables: &mut ScanlineTables,
    pair: StereoPair<'_>,
    occlusion_cost: u32,
    y: usize,
    left_out: &mut [Option<u32>],
    right_out: &mut [Option<u32>],
) -> StereoResult<()> {
    let missing_row = StereoError::InvalidInput("scanline row outside the image");
    let left_row = pair.left().row(y).ok_or_else(|| missing_row.clone())?;
    let right_row = pair.right().row(y).ok_or(missing_row)?;
    tables.fill(left_row, right_row, occlusion_cost);
    tables.backtrack(y, left_out, right_out)?;
    Ok(())
}
