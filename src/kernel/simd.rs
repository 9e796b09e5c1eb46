//! SIMD block-sum accumulation using the `wide` crate.
//!
//! Eight template columns are processed per step with `f32x8`. Products of
//! two `u8` values are exact in `f32`, and each lane stays an exact integer
//! as long as it sums at most [`MAX_EXACT_LANE_TERMS`] products, so the
//! result is bit-identical to the scalar path. Larger templates fall back to
//! [`scalar::accumulate`].

use crate::kernel::{scalar, BlockSums};
use crate::ImageView;
use wide::f32x8;

const LANES: usize = 8;

/// `MAX_EXACT_LANE_TERMS * 255^2` stays below `2^24`.
const MAX_EXACT_LANE_TERMS: usize = 258;

#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

/// Horizontal sum of exact integer lanes.
#[inline]
fn hsum_exact(v: f32x8) -> u64 {
    v.to_array().iter().map(|&lane| lane as u64).sum()
}

/// Accumulates [`BlockSums`] for `template` placed at `(x, y)` in `image`.
///
/// The placement must fit inside `image`.
pub fn accumulate(
    image: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    x: usize,
    y: usize,
) -> BlockSums {
    let width = template.width();
    let height = template.height();
    let simd_end = width / LANES * LANES;
    if simd_end == 0 || (width / LANES) * height > MAX_EXACT_LANE_TERMS {
        return scalar::accumulate(image, template, x, y);
    }

    let mut cross_vec = f32x8::ZERO;
    let mut tpl_sq_vec = f32x8::ZERO;
    let mut img_sq_vec = f32x8::ZERO;
    let mut tail = BlockSums::default();

    for ty in 0..height {
        let tpl_row = template.row(ty).expect("template row within bounds");
        let img_row = &image.row(y + ty).expect("image row within bounds for block")[x..x + width];

        let mut tx = 0;
        while tx < simd_end {
            let t = load_u8x8_as_f32x8(&tpl_row[tx..]);
            let i = load_u8x8_as_f32x8(&img_row[tx..]);
            cross_vec += t * i;
            tpl_sq_vec += t * t;
            img_sq_vec += i * i;
            tx += LANES;
        }

        for (&t, &i) in tpl_row[simd_end..].iter().zip(&img_row[simd_end..]) {
            let t = u64::from(t);
            let i = u64::from(i);
            tail.cross += t * i;
            tail.template_sq += t * t;
            tail.image_sq += i * i;
        }
    }

    BlockSums {
        cross: hsum_exact(cross_vec) + tail.cross,
        template_sq: hsum_exact(tpl_sq_vec) + tail.template_sq,
        image_sq: hsum_exact(img_sq_vec) + tail.image_sq,
    }
}
