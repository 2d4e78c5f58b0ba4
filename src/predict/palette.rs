//! Palette block expansion.

use crate::pixel::{CastFromPrimitive, Pixel};

/// Expands per-pixel palette indices into samples. `idx` is laid out with a
/// stride equal to the block width; the palette holds up to 16 entries.
pub(crate) fn pal_pred<T: Pixel>(
    dst: &mut [T],
    stride: usize,
    pal: &[u16],
    idx: &[u8],
    width: usize,
    height: usize,
) {
    for y in 0..height {
        let row = &mut dst[y * stride..y * stride + width];
        let idx_row = &idx[y * width..y * width + width];
        for (out, &i) in row.iter_mut().zip(idx_row) {
            *out = T::cast_from(pal[usize::from(i)]);
        }
    }
}
