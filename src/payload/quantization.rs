//! Dequantization for payload blocks.
//! Matrices are the Annex K quality-50 tables, stored flattened in zigzag order
//! so they line up with coefficients as they come out of the entropy decoder.

use crate::constants::MCU_SIZE;
use crate::payload::Channel;

pub const LUMINANCE_QUANT_TABLE: [u8; MCU_SIZE] = [
     16,  11,  12,  14,  12,  10,  16,  14,
     13,  14,  18,  17,  16,  19,  24,  40,
     26,  24,  22,  22,  24,  49,  35,  37,
     29,  40,  58,  51,  61,  60,  57,  51,
     56,  55,  64,  72,  92,  78,  64,  68,
     87,  69,  55,  56,  80, 109,  81,  87,
     95,  98, 103, 104, 103,  62,  77, 113,
    121, 112, 100, 120,  92, 101, 103,  99,
];

pub const CHROMINANCE_QUANT_TABLE: [u8; MCU_SIZE] = [
    17, 18, 18, 24, 21, 24, 47, 26,
    26, 47, 99, 66, 56, 66, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizationMatrix {
    Luminance,
    Chrominance,
}

impl QuantizationMatrix {
    pub fn for_channel(channel: Channel) -> Self {
        if channel.is_luma() {
            QuantizationMatrix::Luminance
        } else {
            QuantizationMatrix::Chrominance
        }
    }

    pub fn table(self) -> &'static [u8; MCU_SIZE] {
        match self {
            QuantizationMatrix::Luminance => &LUMINANCE_QUANT_TABLE,
            QuantizationMatrix::Chrominance => &CHROMINANCE_QUANT_TABLE,
        }
    }
}

/// Rescales zigzag-ordered coefficients by the matching matrix entries.
pub fn dequantize_block(coefficients: &[i32; MCU_SIZE], matrix: QuantizationMatrix) -> [f32; MCU_SIZE] {
    let table = matrix.table();
    std::array::from_fn(|i| coefficients[i] as f32 * table[i] as f32)
}
