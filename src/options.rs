use crate::error::{DecodeError, Result};
use crate::payload::{Channel, ColorMatrix, FrameGeometry};

/// How the assembler decides where the frame ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameExtent {
    /// Exactly this many MCUs, tiled into a square grid.
    McuCount(usize),
    /// Enough MCUs to cover `width` x `height` pixels.
    Dimensions { width: usize, height: usize },
    /// Keep decoding until the payload runs dry. Trailing padding bits in the
    /// last byte are read as the start of another MCU, so this only works for
    /// payloads that end exactly on a byte boundary.
    UntilExhausted,
}

impl FrameExtent {
    /// Grid fixed up front, or `None` when it depends on the payload length.
    pub fn geometry(self) -> Result<Option<FrameGeometry>> {
        match self {
            FrameExtent::McuCount(0) => Err(DecodeError::InvalidArgument("MCU count must be non-zero")),
            FrameExtent::McuCount(n) => FrameGeometry::square(n).map(Some),
            FrameExtent::Dimensions { width, height } => {
                FrameGeometry::from_dimensions(width, height).map(Some)
            }
            FrameExtent::UntilExhausted => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelLayout {
    #[default]
    Color,
    Greyscale,
}

impl ChannelLayout {
    /// Blocks carried by each MCU, in payload order.
    pub fn channels(self) -> &'static [Channel] {
        match self {
            ChannelLayout::Color => &[Channel::Y, Channel::Cb, Channel::Cr],
            ChannelLayout::Greyscale => &[Channel::Y],
        }
    }

    pub fn channel_count(self) -> usize {
        self.channels().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub extent: FrameExtent,
    pub layout: ChannelLayout,
    pub color_matrix: ColorMatrix,
}

impl DecodeOptions {
    pub fn with_mcu_count(mcus: usize) -> Self {
        Self::with_extent(FrameExtent::McuCount(mcus))
    }

    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self::with_extent(FrameExtent::Dimensions { width, height })
    }

    pub fn until_exhausted() -> Self {
        Self::with_extent(FrameExtent::UntilExhausted)
    }

    pub fn with_extent(extent: FrameExtent) -> Self {
        Self {
            extent,
            layout: ChannelLayout::Color,
            color_matrix: ColorMatrix::default(),
        }
    }

    pub fn greyscale(mut self) -> Self {
        self.layout = ChannelLayout::Greyscale;
        self
    }

    pub fn color_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.color_matrix = matrix;
        self
    }
}
