//! Intra prediction kernels and the dispatch table that binds a prediction
//! mode to its implementation.
//!
//! Every kernel writes one rectangular block of samples into a caller-owned
//! destination, reading only the already decoded row above and column to the
//! left of the block (the [`IntraEdge`]). Kernels are stateless, allocation
//! free, and synchronous; callers may run them concurrently on disjoint
//! destinations.

mod cfl;
mod directional;
mod filter;
mod nondirectional;
mod palette;

use crate::pixel::{Pixel, PixelType};
use crate::PredictionError;
use log::debug;

/// Number of entries in the [`PredictionDsp::intra_pred`] table.
pub const N_INTRA_PRED_MODES: usize = 14;

/// Number of transform-size tags, square and rectangular together.
pub const N_TX_SIZES: usize = 19;

/// Intra prediction modes addressable through the dispatch table.
///
/// The discriminants are part of the interface; per-block decoder code and
/// architecture-specific overrides index the table with them directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PredictionMode {
    /// Mean of the top row and left column.
    Dc = 0,
    /// Constant mid-range value, for blocks with no decoded neighbors.
    Dc128 = 1,
    /// Mean of the top row only.
    TopDc = 2,
    /// Mean of the left column only.
    LeftDc = 3,
    /// Each row is a copy of the left neighbor sample.
    Hor = 4,
    /// Each row is a copy of the top neighbor row.
    Vert = 5,
    /// Per-pixel choice between left, top and top-left neighbors.
    Paeth = 6,
    /// Weighted blend of all four block edges.
    Smooth = 7,
    /// Vertical-only smooth blend.
    SmoothV = 8,
    /// Horizontal-only smooth blend.
    SmoothH = 9,
    /// Directional, angles in (0, 90), predicting from the top edge.
    Z1 = 10,
    /// Directional, angles in (90, 180), predicting from both edges.
    Z2 = 11,
    /// Directional, angles in (180, 270), predicting from the left edge.
    Z3 = 12,
    /// Recursive 7-tap filter prediction.
    Filter = 13,
}

/// Transform-size tags used to index the CFL AC table.
///
/// Square sizes come first, then the rectangular ones, matching the AV1
/// enumeration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TxSize {
    Tx4x4 = 0,
    Tx8x8 = 1,
    Tx16x16 = 2,
    Tx32x32 = 3,
    Tx64x64 = 4,
    Rtx4x8 = 5,
    Rtx8x4 = 6,
    Rtx8x16 = 7,
    Rtx16x8 = 8,
    Rtx16x32 = 9,
    Rtx32x16 = 10,
    Rtx32x64 = 11,
    Rtx64x32 = 12,
    Rtx4x16 = 13,
    Rtx16x4 = 14,
    Rtx8x32 = 15,
    Rtx32x8 = 16,
    Rtx16x64 = 17,
    Rtx64x16 = 18,
}

impl TxSize {
    /// Block width in samples.
    pub const fn width(self) -> usize {
        use TxSize::*;
        match self {
            Tx4x4 | Rtx4x8 | Rtx4x16 => 4,
            Tx8x8 | Rtx8x4 | Rtx8x16 | Rtx8x32 => 8,
            Tx16x16 | Rtx16x8 | Rtx16x32 | Rtx16x4 | Rtx16x64 => 16,
            Tx32x32 | Rtx32x16 | Rtx32x64 | Rtx32x8 => 32,
            Tx64x64 | Rtx64x32 | Rtx64x16 => 64,
        }
    }

    /// Block height in samples.
    pub const fn height(self) -> usize {
        use TxSize::*;
        match self {
            Tx4x4 | Rtx8x4 | Rtx16x4 => 4,
            Tx8x8 | Rtx4x8 | Rtx16x8 | Rtx32x8 => 8,
            Tx16x16 | Rtx8x16 | Rtx32x16 | Rtx4x16 | Rtx64x16 => 16,
            Tx32x32 | Rtx16x32 | Rtx64x32 | Rtx8x32 => 32,
            Tx64x64 | Rtx32x64 | Rtx16x64 => 64,
        }
    }
}

/// Chroma sampling formats with a chroma plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChromaSampling {
    /// Both vertically and horizontally subsampled.
    Cs420,
    /// Horizontally subsampled.
    Cs422,
    /// Not subsampled.
    Cs444,
}

impl ChromaSampling {
    /// The amount to right shift the luma plane dimensions by to get the
    /// chroma plane dimensions, as `(horizontal, vertical)`.
    pub fn get_decimation(self) -> (usize, usize) {
        use self::ChromaSampling::*;
        match self {
            Cs420 => (1, 1),
            Cs422 => (1, 0),
            Cs444 => (0, 0),
        }
    }

    /// Row index of this layout in the CFL AC dispatch table.
    pub fn cfl_index(self) -> usize {
        use self::ChromaSampling::*;
        match self {
            Cs420 => 0,
            Cs422 => 1,
            Cs444 => 2,
        }
    }
}

/// Borrowed view of the decoded neighbor samples around one block.
///
/// The backing slice holds, in order, the left-column samples from bottom to
/// top, the top-left corner sample at `origin`, and the top-row samples from
/// left to right. For a `width` by `height` block both sides must extend to
/// `width + height` samples, replicated past the frame boundary by the
/// caller.
#[derive(Copy, Clone)]
pub struct IntraEdge<'a, T: Pixel> {
    data: &'a [T],
    origin: usize,
}

impl<'a, T: Pixel> IntraEdge<'a, T> {
    /// Wraps a neighbor slice whose top-left corner sample sits at `origin`.
    pub fn new(data: &'a [T], origin: usize) -> Self {
        assert!(origin < data.len());
        Self { data, origin }
    }

    /// The top-left corner sample.
    #[inline(always)]
    pub fn topleft(&self) -> T {
        self.data[self.origin]
    }

    /// Sample `x` of the row above the block.
    #[inline(always)]
    pub fn top(&self, x: usize) -> T {
        self.data[self.origin + 1 + x]
    }

    /// Sample `y` of the column left of the block.
    #[inline(always)]
    pub fn left(&self, y: usize) -> T {
        self.data[self.origin - 1 - y]
    }

    /// Signed offset from the corner: 0 is the corner itself, positive
    /// offsets walk the top row, negative offsets walk down the left column.
    #[inline(always)]
    pub(crate) fn get(&self, offset: isize) -> T {
        self.data[(self.origin as isize + offset) as usize]
    }

    /// The first `len` samples of the top row as a slice.
    #[inline(always)]
    pub(crate) fn top_slice(&self, len: usize) -> &'a [T] {
        &self.data[self.origin + 1..self.origin + 1 + len]
    }

    /// Backing slice and corner index, for kernels that mix the view with
    /// their own scratch indexing.
    #[inline(always)]
    pub(crate) fn as_parts(&self) -> (&'a [T], usize) {
        (self.data, self.origin)
    }
}

/// An intra prediction kernel.
///
/// `dst` is addressed as `dst[y * stride + x]`; only the `width` by `height`
/// rectangle is written. `angle` packs the auxiliary argument: the angle in
/// degrees with the smooth-context flag in bit 9 for the directional modes,
/// the filter bank index for filter prediction, and is ignored elsewhere.
pub type IntraPredFn<T> = fn(
    dst: &mut [T],
    stride: usize,
    edge: IntraEdge<'_, T>,
    width: usize,
    height: usize,
    angle: i32,
    bit_depth: usize,
);

/// A CFL AC kernel: subsamples a luma region to chroma resolution into `ac`
/// and removes its mean. Chroma geometry is baked into each table entry;
/// `w_pad`/`h_pad` give the number of 4-sample columns/rows to fill by
/// replication instead of reading luma.
pub type CflAcFn<T> = fn(ac: &mut [i16], ypx: &[T], stride: usize, w_pad: usize, h_pad: usize);

/// A single-plane CFL prediction kernel. `dst[0]` must hold the DC
/// prediction on entry; the block width is baked into the table entry.
pub type CflPred1Fn<T> =
    fn(dst: &mut [T], stride: usize, ac: &[i16], alpha: i8, height: usize, bit_depth: usize);

/// A dual-plane CFL prediction kernel, applying `alphas[0]` to the U plane
/// and `alphas[1]` to the V plane in one pass over the AC signal.
pub type CflPredFn<T> = fn(
    dst_u: &mut [T],
    dst_v: &mut [T],
    stride: usize,
    ac: &[i16],
    alphas: [i8; 2],
    height: usize,
    bit_depth: usize,
);

/// A palette expansion kernel. `idx` holds one byte per pixel with stride
/// equal to the block width.
pub type PalPredFn<T> =
    fn(dst: &mut [T], stride: usize, pal: &[u16], idx: &[u8], width: usize, height: usize);

/// The published table of intra prediction kernels for one bit depth.
///
/// Built once by [`PredictionDsp::new`] and read-only afterwards. All
/// entries are plain function pointers, so architecture-specific
/// implementations can replace individual entries before the record is
/// shared; a shared record is `Sync` and may be read without locking.
#[derive(Clone)]
pub struct PredictionDsp<T: Pixel> {
    /// Prediction kernels indexed by [`PredictionMode`].
    pub intra_pred: [IntraPredFn<T>; N_INTRA_PRED_MODES],
    /// CFL AC kernels indexed by chroma layout and [`TxSize`] of the chroma
    /// block. Combinations a layout cannot produce are `None`.
    pub cfl_ac: [[Option<CflAcFn<T>>; N_TX_SIZES]; 3],
    /// Single-plane CFL kernels for block widths 4, 8, 16 and 32, indexed by
    /// `log2(width) - 2`.
    pub cfl_pred_1: [CflPred1Fn<T>; 4],
    /// Dual-plane CFL kernels, indexed like `cfl_pred_1`.
    pub cfl_pred: [CflPredFn<T>; 4],
    /// Palette expansion kernel.
    pub pal_pred: PalPredFn<T>,
    /// The bit depth this record was built for.
    pub bit_depth: usize,
}

impl<T: Pixel> PredictionDsp<T> {
    /// Builds the dispatch record with every reference kernel installed.
    ///
    /// `bit_depth` must be 8 for `u8` samples and within 8..=16 for `u16`
    /// samples.
    pub fn new(bit_depth: usize) -> Self {
        match T::type_enum() {
            PixelType::U8 => assert_eq!(bit_depth, 8),
            PixelType::U16 => assert!((8..=16).contains(&bit_depth)),
        }

        let mut cfl_ac: [[Option<CflAcFn<T>>; N_TX_SIZES]; 3] = [[None; N_TX_SIZES]; 3];
        {
            use TxSize::*;
            let i420 = &mut cfl_ac[ChromaSampling::Cs420.cfl_index()];
            i420[Tx4x4 as usize] = Some(cfl::cfl_ac::<T, 4, 4, true, true>);
            i420[Rtx4x8 as usize] = Some(cfl::cfl_ac::<T, 4, 8, true, true>);
            i420[Rtx4x16 as usize] = Some(cfl::cfl_ac::<T, 4, 16, true, true>);
            i420[Rtx8x4 as usize] = Some(cfl::cfl_ac::<T, 8, 4, true, true>);
            i420[Tx8x8 as usize] = Some(cfl::cfl_ac::<T, 8, 8, true, true>);
            i420[Rtx8x16 as usize] = Some(cfl::cfl_ac::<T, 8, 16, true, true>);
            i420[Rtx16x4 as usize] = Some(cfl::cfl_ac::<T, 16, 4, true, true>);
            i420[Rtx16x8 as usize] = Some(cfl::cfl_ac::<T, 16, 8, true, true>);
            i420[Tx16x16 as usize] = Some(cfl::cfl_ac::<T, 16, 16, true, true>);

            let i422 = &mut cfl_ac[ChromaSampling::Cs422.cfl_index()];
            i422[Tx4x4 as usize] = Some(cfl::cfl_ac::<T, 4, 4, true, false>);
            i422[Rtx4x8 as usize] = Some(cfl::cfl_ac::<T, 4, 8, true, false>);
            i422[Rtx8x4 as usize] = Some(cfl::cfl_ac::<T, 8, 4, true, false>);
            i422[Tx8x8 as usize] = Some(cfl::cfl_ac::<T, 8, 8, true, false>);
            i422[Rtx8x16 as usize] = Some(cfl::cfl_ac::<T, 8, 16, true, false>);
            i422[Rtx16x8 as usize] = Some(cfl::cfl_ac::<T, 16, 8, true, false>);
            i422[Tx16x16 as usize] = Some(cfl::cfl_ac::<T, 16, 16, true, false>);
            i422[Rtx16x32 as usize] = Some(cfl::cfl_ac::<T, 16, 32, true, false>);

            let i444 = &mut cfl_ac[ChromaSampling::Cs444.cfl_index()];
            i444[Tx4x4 as usize] = Some(cfl::cfl_ac::<T, 4, 4, false, false>);
            i444[Rtx4x8 as usize] = Some(cfl::cfl_ac::<T, 4, 8, false, false>);
            i444[Rtx4x16 as usize] = Some(cfl::cfl_ac::<T, 4, 16, false, false>);
            i444[Rtx8x4 as usize] = Some(cfl::cfl_ac::<T, 8, 4, false, false>);
            i444[Tx8x8 as usize] = Some(cfl::cfl_ac::<T, 8, 8, false, false>);
            i444[Rtx8x16 as usize] = Some(cfl::cfl_ac::<T, 8, 16, false, false>);
            i444[Rtx8x32 as usize] = Some(cfl::cfl_ac::<T, 8, 32, false, false>);
            i444[Rtx16x4 as usize] = Some(cfl::cfl_ac::<T, 16, 4, false, false>);
            i444[Rtx16x8 as usize] = Some(cfl::cfl_ac::<T, 16, 8, false, false>);
            i444[Tx16x16 as usize] = Some(cfl::cfl_ac::<T, 16, 16, false, false>);
            i444[Rtx16x32 as usize] = Some(cfl::cfl_ac::<T, 16, 32, false, false>);
            i444[Rtx32x8 as usize] = Some(cfl::cfl_ac::<T, 32, 8, false, false>);
            i444[Rtx32x16 as usize] = Some(cfl::cfl_ac::<T, 32, 16, false, false>);
            i444[Tx32x32 as usize] = Some(cfl::cfl_ac::<T, 32, 32, false, false>);
        }

        let dsp = Self {
            intra_pred: [
                nondirectional::ipred_dc,
                nondirectional::ipred_dc_128,
                nondirectional::ipred_dc_top,
                nondirectional::ipred_dc_left,
                nondirectional::ipred_h,
                nondirectional::ipred_v,
                nondirectional::ipred_paeth,
                nondirectional::ipred_smooth,
                nondirectional::ipred_smooth_v,
                nondirectional::ipred_smooth_h,
                directional::ipred_z1,
                directional::ipred_z2,
                directional::ipred_z3,
                filter::ipred_filter,
            ],
            cfl_ac,
            cfl_pred_1: [
                cfl::cfl_pred_1::<T, 4>,
                cfl::cfl_pred_1::<T, 8>,
                cfl::cfl_pred_1::<T, 16>,
                cfl::cfl_pred_1::<T, 32>,
            ],
            cfl_pred: [
                cfl::cfl_pred::<T, 4>,
                cfl::cfl_pred::<T, 8>,
                cfl::cfl_pred::<T, 16>,
                cfl::cfl_pred::<T, 32>,
            ],
            pal_pred: palette::pal_pred,
            bit_depth,
        };
        debug!("installed intra prediction kernels for {}-bit samples", bit_depth);
        dsp
    }

    /// Looks up the CFL AC kernel for a chroma layout and transform size.
    ///
    /// Returns `None` for combinations the layout cannot produce.
    pub fn cfl_ac_fn(&self, layout: ChromaSampling, tx_size: TxSize) -> Option<CflAcFn<T>> {
        self.cfl_ac[layout.cfl_index()][tx_size as usize]
    }

    /// Validates the caller's arguments, then dispatches to the kernel for
    /// `mode`.
    ///
    /// The checks here are the preconditions every kernel assumes; using the
    /// table directly skips them, which is fine for a caller that derives
    /// its arguments from an already validated bitstream.
    pub fn predict(
        &self,
        mode: PredictionMode,
        dst: &mut [T],
        stride: usize,
        edge: IntraEdge<'_, T>,
        width: usize,
        height: usize,
        angle: i32,
    ) -> Result<(), PredictionError> {
        let valid_dim = |d: usize| d.is_power_of_two() && (4..=64).contains(&d);
        if !valid_dim(width) || !valid_dim(height) {
            return Err(PredictionError::InvalidBlock {
                reason: "block sides must be powers of two between 4 and 64",
            });
        }
        if stride < width || dst.len() < (height - 1) * stride + width {
            return Err(PredictionError::InvalidBlock {
                reason: "destination does not cover the block rectangle",
            });
        }
        if edge.origin < width + height || edge.data.len() <= edge.origin + width + height {
            return Err(PredictionError::InvalidBlock {
                reason: "neighbor slice must extend width + height samples on both sides",
            });
        }
        let aux = (angle & 511) as usize;
        match mode {
            PredictionMode::Z1 if !(1..90).contains(&aux) => {
                return Err(PredictionError::InvalidArgument {
                    reason: "angle for a top-edge directional block must be in (0, 90)",
                });
            }
            PredictionMode::Z2 if !(91..180).contains(&aux) => {
                return Err(PredictionError::InvalidArgument {
                    reason: "angle for a two-edge directional block must be in (90, 180)",
                });
            }
            PredictionMode::Z3 if !(181..270).contains(&aux) => {
                return Err(PredictionError::InvalidArgument {
                    reason: "angle for a left-edge directional block must be in (180, 270)",
                });
            }
            PredictionMode::Filter if aux >= 5 => {
                return Err(PredictionError::InvalidArgument {
                    reason: "filter bank index must be below 5",
                });
            }
            PredictionMode::Filter if width > 32 || height > 32 => {
                return Err(PredictionError::InvalidBlock {
                    reason: "filter prediction covers blocks up to 32x32",
                });
            }
            _ => {}
        }
        self.intra_pred[mode as usize](dst, stride, edge, width, height, angle, self.bit_depth);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Lays out a neighbor slice from the corner sample and the two edge
    /// runs, returning the backing buffer and the corner index.
    pub(crate) fn build_edge<T: Pixel>(topleft: T, top: &[T], left: &[T]) -> (Vec<T>, usize) {
        let mut data = Vec::with_capacity(left.len() + 1 + top.len());
        data.extend(left.iter().rev().copied());
        data.push(topleft);
        data.extend_from_slice(top);
        (data, left.len())
    }

    /// Neighbor slice with every sample equal to `v`, extended `ext` samples
    /// on both sides.
    pub(crate) fn flat_edge<T: Pixel>(v: T, ext: usize) -> (Vec<T>, usize) {
        (vec![v; 2 * ext + 1], ext)
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn mode_indices_are_stable() {
        assert_eq!(PredictionMode::Dc as usize, 0);
        assert_eq!(PredictionMode::Dc128 as usize, 1);
        assert_eq!(PredictionMode::TopDc as usize, 2);
        assert_eq!(PredictionMode::LeftDc as usize, 3);
        assert_eq!(PredictionMode::Hor as usize, 4);
        assert_eq!(PredictionMode::Vert as usize, 5);
        assert_eq!(PredictionMode::Paeth as usize, 6);
        assert_eq!(PredictionMode::Smooth as usize, 7);
        assert_eq!(PredictionMode::SmoothV as usize, 8);
        assert_eq!(PredictionMode::SmoothH as usize, 9);
        assert_eq!(PredictionMode::Z1 as usize, 10);
        assert_eq!(PredictionMode::Z2 as usize, 11);
        assert_eq!(PredictionMode::Z3 as usize, 12);
        assert_eq!(PredictionMode::Filter as usize, 13);
    }

    #[test]
    fn tx_sizes_are_stable() {
        assert_eq!(TxSize::Tx4x4 as usize, 0);
        assert_eq!(TxSize::Tx64x64 as usize, 4);
        assert_eq!(TxSize::Rtx4x8 as usize, 5);
        assert_eq!(TxSize::Rtx64x16 as usize, 18);
        assert_eq!(TxSize::Rtx16x32.width(), 16);
        assert_eq!(TxSize::Rtx16x32.height(), 32);
        assert_eq!(TxSize::Rtx32x8.width(), 32);
        assert_eq!(TxSize::Rtx32x8.height(), 8);
    }

    #[test]
    fn layout_decimation() {
        assert_eq!(ChromaSampling::Cs420.get_decimation(), (1, 1));
        assert_eq!(ChromaSampling::Cs422.get_decimation(), (1, 0));
        assert_eq!(ChromaSampling::Cs444.get_decimation(), (0, 0));
    }

    #[test]
    fn cfl_table_population() {
        let dsp = PredictionDsp::<u8>::new(8);
        let counts: Vec<usize> = dsp
            .cfl_ac
            .iter()
            .map(|row| row.iter().filter(|e| e.is_some()).count())
            .collect();
        assert_eq!(counts, vec![9, 8, 14]);
        assert!(dsp
            .cfl_ac_fn(ChromaSampling::Cs420, TxSize::Tx4x4)
            .is_some());
        // 4:2:0 chroma cannot reach a 32-wide transform.
        assert!(dsp
            .cfl_ac_fn(ChromaSampling::Cs420, TxSize::Tx32x32)
            .is_none());
    }

    #[test]
    fn predict_validates_block_geometry() {
        let dsp = PredictionDsp::<u8>::new(8);
        let (data, origin) = flat_edge(128u8, 16);
        let edge = IntraEdge::new(&data, origin);
        let mut dst = vec![0u8; 8 * 8];

        assert!(dsp
            .predict(PredictionMode::Dc, &mut dst, 8, edge, 8, 8, 0)
            .is_ok());
        // 6 is not a power of two.
        assert!(dsp
            .predict(PredictionMode::Dc, &mut dst, 8, edge, 6, 8, 0)
            .is_err());
        // Edge only extends 16 samples, an 8x16 block needs 24.
        assert!(dsp
            .predict(PredictionMode::Dc, &mut dst, 8, edge, 8, 16, 0)
            .is_err());
        // Angle outside (0, 90).
        assert!(dsp
            .predict(PredictionMode::Z1, &mut dst, 8, edge, 8, 8, 90)
            .is_err());
        assert!(dsp
            .predict(PredictionMode::Z1, &mut dst, 8, edge, 8, 8, 45)
            .is_ok());
    }

    #[test]
    fn build_edge_layout() {
        let (data, origin) = build_edge(5u8, &[1, 2, 3], &[7, 8, 9]);
        let edge = IntraEdge::new(&data, origin);
        assert_eq!(edge.topleft(), 5);
        assert_eq!(edge.top(0), 1);
        assert_eq!(edge.top(2), 3);
        assert_eq!(edge.left(0), 7);
        assert_eq!(edge.left(2), 9);
    }
}
