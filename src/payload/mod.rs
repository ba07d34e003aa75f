//! Payload decoding: entropy decoding, coefficient reordering, dequantization,
//! inverse DCT, colour reconstruction, and the MCU loop that drives them.
//!
//! Features:
//! - No chroma subsampling: each MCU carries its own Y, Cb and Cr blocks.
//! - Greyscale sessions carry Y blocks only.
//! - No restart markers, no byte stuffing, single scan.

pub mod assembler;
pub mod color;
pub mod dct;
pub mod entropy;
pub mod frame;
pub mod quantization;
pub mod zigzag;

use std::fmt;

use crate::codes::TableId;

pub use assembler::{AssemblerState, FrameAssembler, McuCoefficients};
pub use color::ColorMatrix;
pub use entropy::{Symbol, SymbolDecoder, decode_magnitude};
pub use frame::{Frame, FrameGeometry, PixelBlock};
pub use zigzag::ZigZagIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Y,
    Cb,
    Cr,
}

impl Channel {
    pub fn dc_table(self) -> TableId {
        match self {
            Channel::Y => TableId::LumDc,
            Channel::Cb | Channel::Cr => TableId::ColDc,
        }
    }

    pub fn ac_table(self) -> TableId {
        match self {
            Channel::Y => TableId::LumAc,
            Channel::Cb | Channel::Cr => TableId::ColAc,
        }
    }

    pub fn is_luma(self) -> bool {
        self == Channel::Y
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Y => "Y",
            Channel::Cb => "Cb",
            Channel::Cr => "Cr",
        })
    }
}
