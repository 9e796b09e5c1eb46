//! Rayon row-parallel drivers (feature-gated).
//!
//! Every output row is written by exactly one task and reads only the
//! immutable input images, so the results are identical to the sequential
//! drivers regardless of scheduling.

use crate::disparity::{DisparityMap, DisparityPair, ScanlineDisparityMap, StereoPair};
use crate::kernel::Kernel;
use crate::progress::RowObserver;
use crate::search::block::{match_row, BlockMatchConfig};
use crate::search::scanline::{match_scanline, ScanlineTables};
use crate::util::{StereoError, StereoResult};
use rayon::prelude::*;

/// Row-parallel block matching.
pub fn block_match_par<K: Kernel>(
    pair: StereoPair<'_>,
    cfg: &BlockMatchConfig,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityMap> {
    let width = pair.width();
    let height = pair.height();
    let mut map = DisparityMap::new(width, height);

    map.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| {
            if observer.should_cancel() {
                return Err(StereoError::Cancelled);
            }
            match_row::<K>(pair, cfg, y, row);
            observer.on_row(y, height);
            Ok(())
        })?;

    Ok(map)
}

/// Row-parallel scanline matching with one set of tables per worker.
pub fn scanline_match_par(
    pair: StereoPair<'_>,
    occlusion_cost: u32,
    observer: &dyn RowObserver,
) -> StereoResult<DisparityPair> {
    let width = pair.width();
    let height = pair.height();
    let mut left = ScanlineDisparityMap::new(width, height);
    let mut right = ScanlineDisparityMap::new(width, height);

    left.as_mut_slice()
        .par_chunks_mut(width)
        .zip(right.as_mut_slice().par_chunks_mut(width))
        .enumerate()
        .try_for_each_init(
            || ScanlineTables::new(width),
            |tables, (y, (left_row, right_row))| {
                if observer.should_cancel() {
                    return Err(StereoError::Cancelled);
                }
                match_scanline(tables, pair, occlusion_cost, y, left_row, right_row)?;
                observer.on_row(y, height);
                Ok(())
            },
        )?;

    Ok(DisparityPair { left, right })
}
