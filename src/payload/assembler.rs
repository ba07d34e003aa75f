//! The MCU loop.
//!
//! Entropy decoding is strictly sequential: DC predictors chain from one MCU
//! to the next and codeword boundaries are only known after a match. Each MCU
//! is therefore decoded to absolute coefficients first. Reconstruction of the
//! pixels is independent per MCU and runs afterwards, in parallel when the
//! `parallel` feature is enabled.

use std::io::Read;

use log::{debug, trace, warn};

use crate::bit_reader::BitReader;
use crate::codes::CodeTableSet;
use crate::constants::{COLOR_CHANNELS, MCU_SIZE};
use crate::error::{DecodeError, Result};
use crate::options::{ChannelLayout, DecodeOptions};
use crate::payload::color::{luma_block, ycbcr_block_to_rgb};
use crate::payload::dct::idct_8x8;
use crate::payload::entropy::SymbolDecoder;
use crate::payload::frame::{Frame, FrameGeometry, PixelBlock};
use crate::payload::quantization::{QuantizationMatrix, dequantize_block};
use crate::payload::zigzag::unscramble_block;
use crate::payload::{Channel, ColorMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Init,
    DecodingMcu,
    Done,
    Failed,
}

/// Entropy-decoded coefficients of one MCU, in zigzag order with the DC
/// difference already resolved to an absolute value.
#[derive(Debug, Clone, PartialEq)]
pub struct McuCoefficients {
    pub index: usize,
    pub layout: ChannelLayout,
    pub blocks: Vec<[i32; MCU_SIZE]>,
}

impl McuCoefficients {
    pub fn block(&self, channel: Channel) -> Option<&[i32; MCU_SIZE]> {
        let slot = self.layout.channels().iter().position(|&c| c == channel)?;
        self.blocks.get(slot)
    }

    /// Dequantizes, unscrambles, and inverse-transforms every block, then
    /// converts to the output colour space.
    pub fn reconstruct(&self, matrix: ColorMatrix) -> PixelBlock {
        let mut spatial = [[0.0f32; MCU_SIZE]; COLOR_CHANNELS];
        for ((coefficients, &channel), samples) in self
            .blocks
            .iter()
            .zip(self.layout.channels())
            .zip(spatial.iter_mut())
        {
            let dequantized = dequantize_block(coefficients, QuantizationMatrix::for_channel(channel));
            idct_8x8(&unscramble_block(&dequantized), samples);
        }
        let [y, cb, cr] = &spatial;
        match self.layout {
            ChannelLayout::Greyscale => PixelBlock::Grey(luma_block(y)),
            ChannelLayout::Color => PixelBlock::Rgb(ycbcr_block_to_rgb(y, cb, cr, matrix)),
        }
    }
}

/// Drives a [`SymbolDecoder`] over a payload and assembles the decoded frame.
pub struct FrameAssembler<'t, R> {
    tables: &'t CodeTableSet,
    decoder: SymbolDecoder<R>,
    options: DecodeOptions,
    geometry: Option<FrameGeometry>,
    state: AssemblerState,
    predictors: [i32; COLOR_CHANNELS],
    decoded: usize,
}

impl<'t, R: Read> FrameAssembler<'t, R> {
    pub fn new(tables: &'t CodeTableSet, payload: R, options: DecodeOptions) -> Result<Self> {
        let geometry = options.extent.geometry()?;
        Ok(Self {
            tables,
            decoder: SymbolDecoder::new(BitReader::new(payload)),
            options,
            geometry,
            state: AssemblerState::Init,
            predictors: [0; COLOR_CHANNELS],
            decoded: 0,
        })
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn decoded(&self) -> usize {
        self.decoded
    }

    /// Decodes the next MCU, or returns `None` once the configured extent is
    /// reached. Any error leaves the assembler in [`AssemblerState::Failed`].
    pub fn next_mcu(&mut self) -> Result<Option<McuCoefficients>> {
        match self.state {
            AssemblerState::Done => return Ok(None),
            AssemblerState::Failed => {
                return Err(DecodeError::InvalidArgument("assembler has already failed"));
            }
            AssemblerState::Init | AssemblerState::DecodingMcu => {}
        }

        if self.reached_end() {
            if let Err(e) = self.finish() {
                self.state = AssemblerState::Failed;
                return Err(e);
            }
            return Ok(None);
        }

        self.state = AssemblerState::DecodingMcu;
        let index = self.decoded;
        let channels = self.options.layout.channels();
        let mut blocks = Vec::with_capacity(channels.len());
        for (slot, &channel) in channels.iter().enumerate() {
            match self.decode_block(slot, channel) {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    self.state = AssemblerState::Failed;
                    return Err(e.in_mcu(index, channel));
                }
            }
        }
        self.decoded += 1;
        trace!("MCU {index}: DC {:?}", &self.predictors[..channels.len()]);

        Ok(Some(McuCoefficients {
            index,
            layout: self.options.layout,
            blocks,
        }))
    }

    /// Decodes the whole payload into a frame covering the full MCU grid.
    pub fn run(mut self) -> Result<Frame> {
        debug!(
            "decoding payload: {:?}, {:?} layout",
            self.options.extent, self.options.layout
        );
        let mut mcus = Vec::new();
        while let Some(mcu) = self.next_mcu()? {
            mcus.push(mcu);
        }

        let geometry = match self.geometry {
            Some(geometry) => geometry,
            None => FrameGeometry::square(mcus.len())?,
        };
        let blocks = reconstruct_all(&mcus, self.options.color_matrix);
        let frame = Frame::from_blocks(geometry, self.options.layout.channel_count(), &blocks)?;
        debug!(
            "decoded {} MCUs into a {}x{} frame",
            mcus.len(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }

    fn reached_end(&self) -> bool {
        match self.geometry {
            Some(geometry) => self.decoded >= geometry.mcu_count(),
            None => self.decoder.is_empty(),
        }
    }

    fn decode_block(&mut self, slot: usize, channel: Channel) -> Result<[i32; MCU_SIZE]> {
        let difference = self.decoder.read_dc(self.tables.table(channel.dc_table()))?;
        let dc = self.predictors[slot].saturating_add(difference);
        self.predictors[slot] = dc;

        let ac = self.decoder.read_ac(self.tables.table(channel.ac_table()))?;
        let mut block = [0i32; MCU_SIZE];
        block[0] = dc;
        block[1..].copy_from_slice(&ac);
        Ok(block)
    }

    fn finish(&mut self) -> Result<()> {
        self.state = AssemblerState::Done;
        if self.geometry.is_some() {
            let reader = self.decoder.reader_mut();
            let pad = reader.bits_to_byte_boundary();
            reader.read(pad)?;
            if !reader.is_empty() {
                warn!(
                    "payload continues past MCU {}; trailing data ignored",
                    self.decoded
                );
            }
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn reconstruct_all(mcus: &[McuCoefficients], matrix: ColorMatrix) -> Vec<PixelBlock> {
    use rayon::prelude::*;

    mcus.par_iter().map(|mcu| mcu.reconstruct(matrix)).collect()
}

#[cfg(not(feature = "parallel"))]
fn reconstruct_all(mcus: &[McuCoefficients], matrix: ColorMatrix) -> Vec<PixelBlock> {
    mcus.iter().map(|mcu| mcu.reconstruct(matrix)).collect()
}
