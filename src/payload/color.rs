//! YCbCr -> RGB reconstruction.
//!
//! Inputs are inverse-transform outputs, centred on zero. The encoder's level
//! shift is undone first, then the configured matrix is applied. Results are
//! left unclamped.

use crate::constants::{COLOR_CHANNELS, MCU_SIZE, SAMPLE_OFFSET};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMatrix {
    /// BT.601 studio swing, the inverse of the onboard encoder's conversion.
    #[default]
    Studio,
    /// JFIF full range.
    FullRange,
}

impl ColorMatrix {
    pub fn to_rgb(self, y: f32, cb: f32, cr: f32) -> [f32; COLOR_CHANNELS] {
        let y = y + SAMPLE_OFFSET;
        // Chroma is already centred once the level shift and the 128 bias cancel.
        match self {
            ColorMatrix::Studio => {
                let luma = 1.164 * (y - 16.0);
                [
                    luma + 1.596 * cr,
                    luma - 0.813 * cr - 0.392 * cb,
                    luma + 2.017 * cb,
                ]
            }
            ColorMatrix::FullRange => [
                y + 1.402 * cr,
                y - 0.344136 * cb - 0.714136 * cr,
                y + 1.772 * cb,
            ],
        }
    }
}

pub fn ycbcr_block_to_rgb(
    y: &[f32; MCU_SIZE],
    cb: &[f32; MCU_SIZE],
    cr: &[f32; MCU_SIZE],
    matrix: ColorMatrix,
) -> [[f32; COLOR_CHANNELS]; MCU_SIZE] {
    std::array::from_fn(|i| matrix.to_rgb(y[i], cb[i], cr[i]))
}

/// Greyscale output: luma with the level shift undone.
pub fn luma_block(y: &[f32; MCU_SIZE]) -> [f32; MCU_SIZE] {
    y.map(|sample| sample + SAMPLE_OFFSET)
}
