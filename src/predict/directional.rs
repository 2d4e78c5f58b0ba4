//! Directional prediction along the AV1 angle set.
//!
//! The three kernels share the edge conditioning helpers: depending on block
//! size, angle distance from the nearest axis and the smooth-context flag,
//! the neighbor run is either upsampled 2x, smoothed with a 5-tap kernel, or
//! used as is.

use crate::pixel::{clip_pixel, CastFromPrimitive, Pixel};
use crate::predict::IntraEdge;
use crate::tables::DR_INTRA_DERIVATIVE;

/// Whether the edge run should be doubled in resolution before sampling.
/// `d` is the absolute angle distance from the nearest cardinal axis.
pub(crate) fn get_upsample(blk_wh: usize, d: usize, is_sm: bool) -> bool {
    if d >= 40 {
        return false;
    }
    if is_sm {
        blk_wh <= 8
    } else {
        blk_wh <= 16
    }
}

/// Smoothing strength for the edge run, 0 meaning none.
pub(crate) fn get_filter_strength(blk_wh: usize, d: usize, is_sm: bool) -> usize {
    let mut strength = 0;
    if !is_sm {
        if blk_wh <= 8 {
            if d >= 56 {
                strength = 1;
            }
        } else if blk_wh <= 12 {
            if d >= 40 {
                strength = 1;
            }
        } else if blk_wh <= 16 {
            if d >= 40 {
                strength = 1;
            }
        } else if blk_wh <= 24 {
            if d >= 8 {
                strength = 1;
            }
            if d >= 16 {
                strength = 2;
            }
            if d >= 32 {
                strength = 3;
            }
        } else if blk_wh <= 32 {
            if d >= 1 {
                strength = 1;
            }
            if d >= 4 {
                strength = 2;
            }
            if d >= 32 {
                strength = 3;
            }
        } else if d >= 1 {
            strength = 3;
        }
    } else {
        if blk_wh <= 8 {
            if d >= 40 {
                strength = 1;
            }
            if d >= 64 {
                strength = 2;
            }
        } else if blk_wh <= 16 {
            if d >= 20 {
                strength = 1;
            }
            if d >= 48 {
                strength = 2;
            }
        } else if blk_wh <= 24 {
            if d >= 4 {
                strength = 3;
            }
        } else if d >= 1 {
            strength = 3;
        }
    }
    strength
}

/// Doubles an edge run to `2 * hsz - 1` samples, interleaving the originals
/// with a rounded 4-tap interpolation of their clamped neighbors.
///
/// Input sample `i` is `edge[base + clamp(i, from, to - 1)]` in corner
/// offsets, mirroring how the callers address subranges of the neighbor
/// vector.
pub(crate) fn upsample_edge<T: Pixel>(
    out: &mut [T],
    hsz: usize,
    edge: IntraEdge<'_, T>,
    base: isize,
    from: isize,
    to: isize,
    bit_depth: usize,
) {
    const KERNEL: [i32; 4] = [-1, 9, 9, -1];
    let sample = |i: isize| edge.get(base + i.clamp(from, to - 1));

    for i in 0..hsz - 1 {
        out[i * 2] = sample(i as isize);

        let mut s = 0;
        for (j, &k) in KERNEL.iter().enumerate() {
            s += k * i32::cast_from(sample(i as isize + j as isize - 1));
        }
        out[i * 2 + 1] = clip_pixel((s + 8) >> 4, bit_depth);
    }
    out[(hsz - 1) * 2] = sample((hsz - 1) as isize);
}

/// Applies one of three 5-tap smoothing kernels over an edge run, clamping
/// reads to `[from, to - 1]` like [`upsample_edge`]. The taps sum to 16, so
/// no final clip is needed.
pub(crate) fn filter_edge<T: Pixel>(
    out: &mut [T],
    sz: usize,
    edge: IntraEdge<'_, T>,
    base: isize,
    from: isize,
    to: isize,
    strength: usize,
) {
    const KERNEL: [[i32; 5]; 3] = [[0, 4, 8, 4, 0], [0, 5, 6, 5, 0], [2, 4, 4, 4, 2]];

    debug_assert!((1..=3).contains(&strength));
    for i in 0..sz {
        let mut s = 0;
        for (j, &k) in KERNEL[strength - 1].iter().enumerate() {
            let pos = (i as isize + j as isize - 2).clamp(from, to - 1);
            s += k * i32::cast_from(edge.get(base + pos));
        }
        out[i] = T::cast_from((s + 8) >> 4);
    }
}

pub(crate) fn ipred_z1<T: Pixel>(
    dst: &mut [T],
    stride: usize,
    edge: IntraEdge<'_, T>,
    width: usize,
    height: usize,
    angle: i32,
    bit_depth: usize,
) {
    let is_sm = (angle >> 9) & 0x1 != 0;
    let angle = (angle & 511) as usize;
    debug_assert!(angle < 90);
    let dx = DR_INTRA_DERIVATIVE[angle] as usize;

    let mut top_out = [T::zero(); (64 + 64) * 2];
    let upsample_above = get_upsample(width + height, 90 - angle, is_sm);
    let (top, max_base_x): (&[T], usize) = if upsample_above {
        upsample_edge(
            &mut top_out,
            width + height,
            edge,
            1,
            -1,
            (width + width.min(height)) as isize,
            bit_depth,
        );
        (&top_out, 2 * (width + height) - 2)
    } else {
        let filter_strength = get_filter_strength(width + height, 90 - angle, is_sm);
        if filter_strength > 0 {
            filter_edge(
                &mut top_out,
                width + height,
                edge,
                1,
                -1,
                (width + width.min(height)) as isize,
                filter_strength,
            );
            (&top_out, width + height - 1)
        } else {
            (
                edge.top_slice(width + width.min(height)),
                width + width.min(height) - 1,
            )
        }
    };

    let frac_bits = 6 - usize::from(upsample_above);
    let base_inc = 1 << usize::from(upsample_above);
    let mut xpos = dx;
    for y in 0..height {
        let row = &mut dst[y * stride..y * stride + width];
        let mut base = xpos >> frac_bits;
        let frac = (((xpos << usize::from(upsample_above)) & 0x3F) >> 1) as i32;

        for x in 0..width {
            if base < max_base_x {
                let v = i32::cast_from(top[base]) * (32 - frac)
                    + i32::cast_from(top[base + 1]) * frac;
                row[x] = clip_pixel((v + 16) >> 5, bit_depth);
                base += base_inc;
            } else {
                row[x..].fill(top[max_base_x]);
                break;
            }
        }
        xpos += dx;
    }
}

pub(crate) fn ipred_z2<T: Pixel>(
    dst: &mut [T],
    stride: usize,
    edge: IntraEdge<'_, T>,
    width: usize,
    height: usize,
    angle: i32,
    bit_depth: usize,
) {
    let is_sm = (angle >> 9) & 0x1 != 0;
    let angle = (angle & 511) as usize;
    debug_assert!(angle > 90 && angle < 180);
    let dy = DR_INTRA_DERIVATIVE[angle - 90] as i32;
    let dx = DR_INTRA_DERIVATIVE[180 - angle] as i32;
    let upsample_left = get_upsample(width + height, 180 - angle, is_sm);
    let upsample_above = get_upsample(width + height, angle - 90, is_sm);

    // Joint edge buffer: left run below `tl`, corner at `tl`, top run above.
    let mut edge_buf = [T::zero(); 64 * 2 + 64 * 2 + 1];
    let tl = height * 2;

    if upsample_above {
        upsample_edge(
            &mut edge_buf[tl..],
            width + 1,
            edge,
            0,
            0,
            (width + 1) as isize,
            bit_depth,
        );
    } else {
        let filter_strength = get_filter_strength(width + height, angle - 90, is_sm);
        if filter_strength > 0 {
            filter_edge(
                &mut edge_buf[tl + 1..],
                width,
                edge,
                1,
                -1,
                width as isize,
                filter_strength,
            );
        } else {
            edge_buf[tl + 1..tl + 1 + width].copy_from_slice(edge.top_slice(width));
        }
    }
    if upsample_left {
        upsample_edge(
            &mut edge_buf[..],
            height + 1,
            edge,
            -(height as isize),
            0,
            (height + 1) as isize,
            bit_depth,
        );
    } else {
        let filter_strength = get_filter_strength(width + height, 180 - angle, is_sm);
        if filter_strength > 0 {
            filter_edge(
                &mut edge_buf[tl - height..],
                height,
                edge,
                -(height as isize),
                0,
                (height + 1) as isize,
                filter_strength,
            );
        } else {
            for i in 0..height {
                edge_buf[tl - height + i] = edge.get(i as isize - height as isize);
            }
        }
    }
    edge_buf[tl] = edge.topleft();

    let min_base_x = -(1 << usize::from(upsample_above)) as i32;
    let frac_bits_y = 6 - usize::from(upsample_left);
    let frac_bits_x = 6 - usize::from(upsample_above);
    let base_inc_x = 1 << usize::from(upsample_above);
    let left_origin = tl as isize - (1 << usize::from(upsample_left));
    let top_origin = tl as isize + (1 << usize::from(upsample_above));

    let mut xpos = -dx;
    for y in 0..height {
        let row = &mut dst[y * stride..y * stride + width];
        let mut base_x = xpos >> frac_bits_x;
        let frac_x = ((xpos * (1 << usize::from(upsample_above)) as i32) & 0x3F) >> 1;

        let mut ypos = ((y as i32) << 6) - dy;
        for x in 0..width {
            let v = if base_x >= min_base_x {
                let t = (top_origin + base_x as isize) as usize;
                i32::cast_from(edge_buf[t]) * (32 - frac_x)
                    + i32::cast_from(edge_buf[t + 1]) * frac_x
            } else {
                let base_y = ypos >> frac_bits_y;
                debug_assert!(base_y >= -(1 << usize::from(upsample_left)) as i32);
                let frac_y = ((ypos * (1 << usize::from(upsample_left)) as i32) & 0x3F) >> 1;
                let l = (left_origin - base_y as isize) as usize;
                i32::cast_from(edge_buf[l]) * (32 - frac_y)
                    + i32::cast_from(edge_buf[l - 1]) * frac_y
            };
            row[x] = clip_pixel((v + 16) >> 5, bit_depth);
            base_x += base_inc_x;
            ypos -= dy;
        }
        xpos -= dx;
    }
}

pub(crate) fn ipred_z3<T: Pixel>(
    dst: &mut [T],
    stride: usize,
    edge: IntraEdge<'_, T>,
    width: usize,
    height: usize,
    angle: i32,
    bit_depth: usize,
) {
    let is_sm = (angle >> 9) & 0x1 != 0;
    let angle = (angle & 511) as usize;
    debug_assert!(angle > 180);
    let dy = DR_INTRA_DERIVATIVE[270 - angle] as usize;

    let mut left_out = [T::zero(); (64 + 64) * 2];
    let upsample_left = get_upsample(width + height, angle - 180, is_sm);
    // Sample `i` of the effective left run is `buf[origin - i]`.
    let (buf, origin, max_base_y): (&[T], usize, usize) = if upsample_left {
        upsample_edge(
            &mut left_out,
            width + height,
            edge,
            -((width + height) as isize),
            width.saturating_sub(height) as isize,
            (width + height + 1) as isize,
            bit_depth,
        );
        (&left_out, 2 * (width + height) - 2, 2 * (width + height) - 2)
    } else {
        let filter_strength = get_filter_strength(width + height, angle - 180, is_sm);
        if filter_strength > 0 {
            filter_edge(
                &mut left_out,
                width + height,
                edge,
                -((width + height) as isize),
                width.saturating_sub(height) as isize,
                (width + height + 1) as isize,
                filter_strength,
            );
            (&left_out, width + height - 1, width + height - 1)
        } else {
            let (data, corner) = edge.as_parts();
            (data, corner - 1, height + width.min(height) - 1)
        }
    };

    let frac_bits = 6 - usize::from(upsample_left);
    let base_inc = 1 << usize::from(upsample_left);
    let mut ypos = dy;
    for x in 0..width {
        let mut base = ypos >> frac_bits;
        let frac = (((ypos << usize::from(upsample_left)) & 0x3F) >> 1) as i32;

        let mut y = 0;
        while y < height {
            if base < max_base_y {
                let v = i32::cast_from(buf[origin - base]) * (32 - frac)
                    + i32::cast_from(buf[origin - base - 1]) * frac;
                dst[y * stride + x] = clip_pixel((v + 16) >> 5, bit_depth);
                y += 1;
                base += base_inc;
            } else {
                while y < height {
                    dst[y * stride + x] = buf[origin - max_base_y];
                    y += 1;
                }
            }
        }
        ypos += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::test_util::*;

    #[test]
    fn upsample_thresholds() {
        // Small blocks close to the axis upsample, large ones never do.
        assert!(get_upsample(8, 3, false));
        assert!(get_upsample(16, 39, false));
        assert!(!get_upsample(16, 40, false));
        assert!(!get_upsample(24, 3, false));
        // The smooth-context variant cuts off at 8 instead of 16.
        assert!(get_upsample(8, 3, true));
        assert!(!get_upsample(12, 3, true));
    }

    #[test]
    fn filter_strength_thresholds() {
        assert_eq!(get_filter_strength(8, 55, false), 0);
        assert_eq!(get_filter_strength(8, 56, false), 1);
        assert_eq!(get_filter_strength(16, 40, false), 1);
        assert_eq!(get_filter_strength(24, 16, false), 2);
        assert_eq!(get_filter_strength(24, 32, false), 3);
        assert_eq!(get_filter_strength(32, 4, false), 2);
        assert_eq!(get_filter_strength(48, 1, false), 3);
        assert_eq!(get_filter_strength(8, 64, true), 2);
        assert_eq!(get_filter_strength(16, 20, true), 1);
        assert_eq!(get_filter_strength(24, 4, true), 3);
        assert_eq!(get_filter_strength(64, 1, true), 3);
    }

    #[test]
    fn filter_edge_preserves_flat_runs() {
        let (data, origin) = flat_edge(90u8, 16);
        let edge = IntraEdge::new(&data, origin);
        let mut out = [0u8; 16];
        for strength in 1..=3 {
            filter_edge(&mut out, 16, edge, 1, -1, 12, strength);
            assert!(out.iter().all(|&v| v == 90), "strength {}", strength);
        }
    }

    #[test]
    fn upsample_edge_interleaves_originals() {
        let (data, origin) = build_edge(7u8, &[10, 20, 30, 40, 50, 60, 70, 80], &[0u8; 8]);
        let edge = IntraEdge::new(&data, origin);
        let mut out = [0u8; 15];
        upsample_edge(&mut out, 8, edge, 1, 0, 8, 8);
        for i in 0..8 {
            assert_eq!(out[i * 2], (i as u8 + 1) * 10);
        }
        // Away from the clamped ends, interpolating a linear ramp lands on
        // the midpoints.
        for i in 1..6 {
            let mid = (out[i * 2] as u32 + out[i * 2 + 2] as u32) / 2;
            assert_eq!(out[i * 2 + 1] as u32, mid, "midpoint {}", i);
        }
    }

    #[test]
    fn z1_flat_edge_is_flat() {
        let (data, origin) = flat_edge(111u8, 16);
        let edge = IntraEdge::new(&data, origin);
        let mut dst = vec![0u8; 8 * 8];
        for angle in [3, 45, 87] {
            ipred_z1(&mut dst, 8, edge, 8, 8, angle, 8);
            assert!(dst.iter().all(|&v| v == 111), "angle {}", angle);
        }
    }

    #[test]
    fn z2_flat_edge_is_flat() {
        let (data, origin) = flat_edge(57u8, 16);
        let edge = IntraEdge::new(&data, origin);
        let mut dst = vec![0u8; 8 * 8];
        for angle in [104, 135, 166] {
            ipred_z2(&mut dst, 8, edge, 8, 8, angle, 8);
            assert!(dst.iter().all(|&v| v == 57), "angle {}", angle);
        }
    }

    #[test]
    fn z3_flat_edge_is_flat() {
        let (data, origin) = flat_edge(203u8, 16);
        let edge = IntraEdge::new(&data, origin);
        let mut dst = vec![0u8; 8 * 8];
        for angle in [183, 225, 267] {
            ipred_z3(&mut dst, 8, edge, 8, 8, angle, 8);
            assert!(dst.iter().all(|&v| v == 203), "angle {}", angle);
        }
    }

    #[test]
    fn z3_transposes_z1() {
        // Walking down the left edge mirrors walking right along the top
        // edge of the transposed block.
        let run: Vec<u8> = (0..24).map(|i| (i * 7 + 13) as u8).collect();
        let pad = vec![100u8; 24];

        let (data1, origin1) = build_edge(50u8, &run, &pad);
        let e1 = IntraEdge::new(&data1, origin1);
        let (data2, origin2) = build_edge(50u8, &pad, &run);
        let e2 = IntraEdge::new(&data2, origin2);

        for (angle, mirrored) in [(45, 225), (61, 209), (87, 183)] {
            let (w, h) = (16, 8);
            let mut out1 = vec![0u8; w * h];
            ipred_z1(&mut out1, w, e1, w, h, angle, 8);
            let mut out2 = vec![0u8; h * w];
            ipred_z3(&mut out2, h, e2, h, w, mirrored, 8);
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(
                        out1[y * w + x],
                        out2[x * h + y],
                        "angle {} at ({}, {})",
                        angle,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn z1_steep_angle_tracks_top_row() {
        // At 87 degrees the sampling step is small, so early rows read the
        // top run almost in place.
        let top: Vec<u8> = (0..16).map(|i| (i * 10) as u8).collect();
        let (data, origin) = build_edge(0u8, &top, &vec![0u8; 16]);
        let edge = IntraEdge::new(&data, origin);
        let mut dst = vec![0u8; 8 * 8];
        ipred_z1(&mut dst, 8, edge, 8, 8, 87, 8);
        for x in 0..8 {
            let got = dst[x] as i32;
            let reference = x as i32 * 10;
            assert!((got - reference).abs() <= 10, "column {}", x);
        }
    }
}
