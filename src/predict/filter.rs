//! Recursive filter intra prediction, for blocks up to 32x32.

use crate::pixel::{clip_pixel, CastFromPrimitive, Pixel};
use crate::predict::IntraEdge;
use crate::tables::FILTER_INTRA_TAPS;

/// Predicts the block as a raster walk of 4x2 sub-patches. Each sub-patch is
/// a 7-tap function of its top-left sample, the four samples above and the
/// two samples to the left; after the first patch those come from rows this
/// kernel already wrote, so the destination is deliberately read back rather
/// than cached.
pub(crate) fn ipred_filter<T: Pixel>(
    dst: &mut [T],
    stride: usize,
    edge: IntraEdge<'_, T>,
    width: usize,
    height: usize,
    filt_idx: i32,
    bit_depth: usize,
) {
    let filt_idx = (filt_idx & 511) as usize;
    debug_assert!(filt_idx < 5);
    debug_assert!(width <= 32 && height <= 32);
    let filter = &FILTER_INTRA_TAPS[filt_idx];

    for y in (0..height).step_by(2) {
        for x in (0..width).step_by(4) {
            let (p0, p1, p2, p3, p4) = if y == 0 {
                let corner = if x == 0 { edge.topleft() } else { edge.top(x - 1) };
                (
                    i32::cast_from(corner),
                    i32::cast_from(edge.top(x)),
                    i32::cast_from(edge.top(x + 1)),
                    i32::cast_from(edge.top(x + 2)),
                    i32::cast_from(edge.top(x + 3)),
                )
            } else {
                let above = (y - 1) * stride;
                let corner = if x == 0 {
                    edge.left(y - 1)
                } else {
                    dst[above + x - 1]
                };
                (
                    i32::cast_from(corner),
                    i32::cast_from(dst[above + x]),
                    i32::cast_from(dst[above + x + 1]),
                    i32::cast_from(dst[above + x + 2]),
                    i32::cast_from(dst[above + x + 3]),
                )
            };
            let (p5, p6) = if x == 0 {
                (
                    i32::cast_from(edge.left(y)),
                    i32::cast_from(edge.left(y + 1)),
                )
            } else {
                (
                    i32::cast_from(dst[y * stride + x - 1]),
                    i32::cast_from(dst[(y + 1) * stride + x - 1]),
                )
            };

            for yy in 0..2 {
                for xx in 0..4 {
                    let taps = &filter[yy * 4 + xx];
                    let acc = taps[0] as i32 * p0
                        + taps[1] as i32 * p1
                        + taps[2] as i32 * p2
                        + taps[3] as i32 * p3
                        + taps[4] as i32 * p4
                        + taps[5] as i32 * p5
                        + taps[6] as i32 * p6;
                    dst[(y + yy) * stride + x + xx] = clip_pixel((acc + 8) >> 4, bit_depth);
                }
            }
        }
    }
}
