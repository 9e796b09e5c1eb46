//! Scalar reference accumulation of block sums.

use crate::kernel::BlockSums;
use crate::ImageView;

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
    let mut sums = BlockSums::default();

    for ty in 0..template.height() {
        let tpl_row = template.row(ty).expect("template row within bounds");
        let img_row = image.row(y + ty).expect("image row within bounds for block");
        for (&t, &i) in tpl_row.iter().zip(&img_row[x..x + width]) {
            let t = u64::from(t);
            let i = u64::from(i);
            sums.cross += t * i;
            sums.template_sq += t * t;
            sums.image_sq += i * i;
        }
    }

    sums
}
