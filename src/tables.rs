//! Fixed constant tables shared by the prediction kernels.
//!
//! All values are reproduced from the AV1 reference; none of them depend on
//! bit depth.

/// Blend weights for the smooth prediction modes.
///
/// Indexed by block side length: `&SM_WEIGHTS[len..len * 2]` is the weight
/// run for a side of `len` samples. Weights are Q8 against a unit of 256.
pub(crate) const SM_WEIGHTS: [u8; 128] = [
    // Unused, because the indexing always offsets by the block side, which
    // is at least 2.
    0, 0,
    // bs = 2
    255, 128,
    // bs = 4
    255, 149, 85, 64,
    // bs = 8
    255, 197, 146, 105, 73, 50, 37, 32,
    // bs = 16
    255, 225, 196, 170, 145, 123, 102, 84,
    68, 54, 43, 33, 26, 20, 17, 16,
    // bs = 32
    255, 240, 225, 210, 196, 182, 169, 157,
    145, 133, 122, 111, 101, 92, 83, 74,
    66, 59, 52, 45, 39, 34, 29, 25,
    21, 17, 14, 12, 10, 9, 8, 8,
    // bs = 64
    255, 248, 240, 233, 225, 218, 210, 203,
    196, 189, 182, 176, 169, 163, 156, 150,
    144, 138, 133, 127, 121, 116, 111, 106,
    101, 96, 91, 86, 82, 77, 73, 69,
    65, 61, 57, 54, 50, 47, 44, 41,
    38, 35, 32, 29, 27, 25, 22, 20,
    18, 16, 15, 13, 12, 10, 9, 8,
    7, 6, 6, 5, 5, 4, 4, 4,
];

/// Per-row (or per-column) sampling step for each directional prediction
/// angle, in Q6. Indexed by the angle in degrees; entries that are zero are
/// never addressed by a valid angle. Each row below starts at the angle in
/// its comment and runs until the next one.
pub(crate) const DR_INTRA_DERIVATIVE: [u16; 90] = [
    0, 0, 0, // 0
    1023, 0, 0, // 3
    547, 0, 0, // 6
    372, 0, 0, 0, 0, // 9
    273, 0, 0, // 14
    215, 0, 0, // 17
    178, 0, 0, // 20
    151, 0, 0, // 23
    132, 0, 0, // 26
    116, 0, 0, // 29
    102, 0, 0, 0, // 32
    90, 0, 0, // 36
    80, 0, 0, // 39
    71, 0, 0, // 42
    64, 0, 0, // 45
    57, 0, 0, // 48
    51, 0, 0, // 51
    45, 0, 0, 0, // 54
    40, 0, 0, // 58
    35, 0, 0, // 61
    31, 0, 0, // 64
    27, 0, 0, // 67
    24, 0, 0, // 70
    21, 0, 0, // 73
    19, 0, 0, 0, 0, // 76
    17, 0, 0, // 81
    15, 0, 0, // 84
    13, 0, 0, // 87
];

/// Tap banks for recursive filter intra prediction.
///
/// Five filter shapes; for each, one 7-tap row per output position of a 4x2
/// sub-patch (top row outputs first). Tap order matches the context gather:
/// top-left, the four samples above, then the two samples to the left.
pub(crate) const FILTER_INTRA_TAPS: [[[i8; 7]; 8]; 5] = [
    [
        [-6, 10, 0, 0, 0, 12, 0],
        [-5, 2, 10, 0, 0, 9, 0],
        [-3, 1, 1, 10, 0, 7, 0],
        [-3, 1, 1, 2, 10, 5, 0],
        [-4, 6, 0, 0, 0, 2, 12],
        [-3, 2, 6, 0, 0, 4, 9],
        [-3, 2, 2, 6, 0, 4, 7],
        [-3, 1, 2, 2, 6, 3, 5],
    ],
    [
        [-10, 16, 0, 0, 0, 10, 0],
        [-6, 0, 16, 0, 0, 6, 0],
        [-4, 0, 0, 16, 0, 4, 0],
        [-2, 0, 0, 0, 16, 2, 0],
        [-10, 16, 0, 0, 0, 0, 10],
        [-6, 0, 16, 0, 0, 0, 6],
        [-4, 0, 0, 16, 0, 0, 4],
        [-2, 0, 0, 0, 16, 0, 2],
    ],
    [
        [-8, 8, 0, 0, 0, 16, 0],
        [-8, 0, 8, 0, 0, 16, 0],
        [-8, 0, 0, 8, 0, 16, 0],
        [-8, 0, 0, 0, 8, 16, 0],
        [-4, 4, 0, 0, 0, 0, 16],
        [-4, 0, 4, 0, 0, 0, 16],
        [-4, 0, 0, 4, 0, 0, 16],
        [-4, 0, 0, 0, 4, 0, 16],
    ],
    [
        [-2, 8, 0, 0, 0, 10, 0],
        [-1, 3, 8, 0, 0, 6, 0],
        [-1, 2, 3, 8, 0, 4, 0],
        [0, 1, 2, 3, 8, 2, 0],
        [-1, 4, 0, 0, 0, 3, 10],
        [-1, 3, 4, 0, 0, 4, 6],
        [-1, 2, 3, 4, 0, 4, 4],
        [-1, 2, 2, 3, 4, 3, 3],
    ],
    [
        [-12, 14, 0, 0, 0, 14, 0],
        [-10, 0, 14, 0, 0, 12, 0],
        [-9, 0, 0, 14, 0, 11, 0],
        [-8, 0, 0, 0, 14, 10, 0],
        [-10, 12, 0, 0, 0, 0, 14],
        [-9, 1, 12, 0, 0, 0, 12],
        [-8, 0, 0, 12, 0, 1, 11],
        [-7, 0, 0, 1, 12, 1, 9],
    ],
];
