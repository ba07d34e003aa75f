//! Decoder for the JPEG-derived image payloads produced by the onboard camera encoder.
//!
//! A decode session takes two byte streams:
//! - a codes source carrying the codewords of four Huffman tables
//!   (luminance DC/AC, chrominance DC/AC), and
//! - a compressed payload of back-to-back MCUs with no markers, no restart
//!   intervals and no byte stuffing.
//!
//! The payload is entropy-decoded MCU by MCU, dequantized against the fixed
//! quality-50 matrices, inverse-transformed, colour converted, and tiled into
//! a [`Frame`] of unclamped `f32` samples.
//!
//! ```no_run
//! use satjpeg_rs::{DecodeOptions, decode};
//!
//! let codes = std::fs::File::open("codes.bin")?;
//! let payload = std::fs::File::open("image.bin")?;
//! let frame = decode(codes, payload, &DecodeOptions::with_dimensions(640, 480))?;
//! assert_eq!(frame.channels(), 3);
//! # Ok::<(), satjpeg_rs::DecodeError>(())
//! ```

pub mod bit_reader;
pub mod bit_writer;
pub mod codes;
pub mod constants;
pub mod error;
pub mod options;
pub mod payload;

use std::io::{BufReader, Read};

pub use bit_reader::{BitReader, Bits};
pub use bit_writer::BitWriter;
pub use codes::{CodeTableSet, HuffmanTable, TableId, TableLayout};
pub use error::{DecodeError, Result};
pub use options::{ChannelLayout, DecodeOptions, FrameExtent};
pub use payload::{Channel, ColorMatrix, Frame, FrameAssembler, FrameGeometry};

/// Loads the code tables, then decodes one payload with them.
pub fn decode<C: Read, P: Read>(codes: C, payload: P, options: &DecodeOptions) -> Result<Frame> {
    let tables = CodeTableSet::load(BufReader::new(codes))?;
    decode_with_tables(&tables, payload, options)
}

/// Decodes one payload with tables that are already loaded.
pub fn decode_with_tables<P: Read>(
    tables: &CodeTableSet,
    payload: P,
    options: &DecodeOptions,
) -> Result<Frame> {
    FrameAssembler::new(tables, BufReader::new(payload), *options)?.run()
}
