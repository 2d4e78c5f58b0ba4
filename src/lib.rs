//! `av_ipred` is a library of reference kernels for AV1 intra prediction:
//! the directional, DC, smooth, Paeth, filter, chroma-from-luma and palette
//! predictors, published through a per-bit-depth dispatch table of plain
//! function pointers.
//!
//! The kernels are scalar and architecture neutral. They are written to be
//! bit-exact against the AV1 specification, so a SIMD implementation can
//! replace any table entry and be validated against the one it shadows.

#![allow(clippy::cast_lossless)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unreadable_literal)]
#![deny(missing_docs)]

mod pixel;
pub mod predict;
mod tables;

pub use pixel::*;

use thiserror::Error;

/// Possible errors when validating a prediction call.
///
/// Only the validated front door returns these; the kernels themselves have
/// no error channel and assume their preconditions.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The block geometry or one of the buffers does not satisfy the kernel
    /// preconditions.
    #[error("invalid block: {reason}")]
    InvalidBlock {
        #[doc(hidden)]
        reason: &'static str,
    },
    /// A mode argument is outside its documented range.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        #[doc(hidden)]
        reason: &'static str,
    },
}
