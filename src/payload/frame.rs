//! Output raster and MCU tiling.

use crate::constants::{COLOR_CHANNELS, MCU_SIDE_LENGTH, MCU_SIZE};
use crate::error::{DecodeError, Result};

/// Reconstructed samples of one MCU, row-major.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBlock {
    Grey([f32; MCU_SIZE]),
    Rgb([[f32; COLOR_CHANNELS]; MCU_SIZE]),
}

impl PixelBlock {
    pub fn channels(&self) -> usize {
        match self {
            PixelBlock::Grey(_) => 1,
            PixelBlock::Rgb(_) => COLOR_CHANNELS,
        }
    }

    pub fn sample(&self, index: usize, channel: usize) -> f32 {
        match self {
            PixelBlock::Grey(samples) => samples[index],
            PixelBlock::Rgb(pixels) => pixels[index][channel],
        }
    }
}

/// MCU grid of a frame. Constructors guarantee that the full raster, at
/// up to three channels, has an addressable sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    mcus_per_row: usize,
    mcus_per_column: usize,
}

impl FrameGeometry {
    pub fn new(mcus_per_row: usize, mcus_per_column: usize) -> Result<Self> {
        if mcus_per_row == 0 || mcus_per_column == 0 {
            return Err(DecodeError::InvalidArgument("frame grid must be non-empty"));
        }
        let width = mcus_per_row.checked_mul(MCU_SIDE_LENGTH);
        let height = mcus_per_column.checked_mul(MCU_SIDE_LENGTH);
        match (width, height) {
            (Some(width), Some(height)) => sample_count(width, height, COLOR_CHANNELS)?,
            _ => return Err(DecodeError::InvalidArgument("frame dimensions overflow")),
        };
        Ok(Self {
            mcus_per_row,
            mcus_per_column,
        })
    }

    /// Smallest grid covering `width` x `height` pixels.
    pub fn from_dimensions(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidArgument("frame dimensions must be non-zero"));
        }
        Self::new(
            width.div_ceil(MCU_SIDE_LENGTH),
            height.div_ceil(MCU_SIDE_LENGTH),
        )
    }

    /// Square grid holding exactly `mcus` units.
    pub fn square(mcus: usize) -> Result<Self> {
        if mcus == 0 {
            return Err(DecodeError::ShapeMismatch {
                mcus,
                reason: "no MCUs to tile",
            });
        }
        let side = mcus.isqrt();
        if side * side != mcus {
            return Err(DecodeError::ShapeMismatch {
                mcus,
                reason: "MCU count is not a perfect square",
            });
        }
        Self::new(side, side)
    }

    pub fn mcus_per_row(&self) -> usize {
        self.mcus_per_row
    }

    pub fn mcus_per_column(&self) -> usize {
        self.mcus_per_column
    }

    pub fn mcu_count(&self) -> usize {
        self.mcus_per_row * self.mcus_per_column
    }

    pub fn width(&self) -> usize {
        self.mcus_per_row * MCU_SIDE_LENGTH
    }

    pub fn height(&self) -> usize {
        self.mcus_per_column * MCU_SIDE_LENGTH
    }
}

fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or(DecodeError::InvalidArgument("frame dimensions overflow"))
}

/// Interleaved raster of unclamped samples, `height x width x channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<f32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        let len = sample_count(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            samples: vec![0.0; len],
        })
    }

    /// Tiles blocks in row-major MCU order.
    pub fn from_blocks(geometry: FrameGeometry, channels: usize, blocks: &[PixelBlock]) -> Result<Self> {
        if blocks.len() != geometry.mcu_count() {
            return Err(DecodeError::ShapeMismatch {
                mcus: blocks.len(),
                reason: "decoded MCU count does not fill the frame grid",
            });
        }
        let mut frame = Frame::new(geometry.width(), geometry.height(), channels)?;
        for (index, block) in blocks.iter().enumerate() {
            let column = index % geometry.mcus_per_row();
            let row = index / geometry.mcus_per_row();
            frame.place_block(column, row, block)?;
        }
        Ok(frame)
    }

    /// Writes a block at MCU tile (`column`, `row`).
    pub fn place_block(&mut self, column: usize, row: usize, block: &PixelBlock) -> Result<()> {
        if block.channels() != self.channels {
            return Err(DecodeError::InvalidArgument("block channel count differs from the frame"));
        }
        let origin = column
            .checked_mul(MCU_SIDE_LENGTH)
            .zip(row.checked_mul(MCU_SIDE_LENGTH))
            .filter(|&(x0, y0)| {
                x0 < self.width
                    && y0 < self.height
                    && x0 + MCU_SIDE_LENGTH <= self.width
                    && y0 + MCU_SIDE_LENGTH <= self.height
            });
        let Some((x0, y0)) = origin else {
            return Err(DecodeError::InvalidArgument("MCU tile lies outside the frame"));
        };
        for ty in 0..MCU_SIDE_LENGTH {
            for tx in 0..MCU_SIDE_LENGTH {
                let base = self.offset(x0 + tx, y0 + ty);
                for c in 0..self.channels {
                    self.samples[base + c] = block.sample(ty * MCU_SIDE_LENGTH + tx, c);
                }
            }
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Samples of the pixel at column `x`, row `y`, or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = self.offset(x, y);
        self.samples.get(base..base + self.channels)
    }

    /// Keeps the top-left `width` x `height` pixels, dropping MCU padding.
    pub fn crop(&self, width: usize, height: usize) -> Result<Frame> {
        if width > self.width || height > self.height {
            return Err(DecodeError::InvalidArgument("crop exceeds the frame"));
        }
        let row_len = width * self.channels;
        let mut samples = Vec::with_capacity(row_len * height);
        for y in 0..height {
            let start = self.offset(0, y);
            samples.extend_from_slice(&self.samples[start..start + row_len]);
        }
        Ok(Frame {
            width,
            height,
            channels: self.channels,
            samples,
        })
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }
}
