//! Symbol decoding against a [`HuffmanTable`] and magnitude resolution.

use std::io::Read;

use crate::bit_reader::{BitReader, Bits};
use crate::codes::HuffmanTable;
use crate::constants::AC_SIZE;
use crate::error::{DecodeError, Result};

/// A decoded symbol: high nibble is the zero run, low nibble the magnitude length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub zero_run: u8,
    pub magnitude_length: u8,
}

impl Symbol {
    pub fn is_end_of_block(&self) -> bool {
        self.zero_run == 0 && self.magnitude_length == 0
    }
}

impl From<u8> for Symbol {
    fn from(value: u8) -> Self {
        Self {
            zero_run: value >> 4,
            magnitude_length: value & 0x0f,
        }
    }
}

/// Resolves a magnitude bit string to a signed value.
///
/// A leading one reads as plain binary. A leading zero marks a negative value
/// stored as the complement of its magnitude. The lone string `0` is zero.
pub fn decode_magnitude(bits: Bits) -> Result<i32> {
    match bits.leading_bit() {
        None => Err(DecodeError::EmptyMagnitude),
        Some(true) => Ok(bits.value() as i32),
        Some(false) if bits.len() == 1 => Ok(0),
        Some(false) => {
            let mask = u32::MAX >> (32 - bits.len() as u32);
            Ok(-((!bits.value() & mask) as i32))
        }
    }
}

/// Pulls symbols and coefficient values out of a payload bit stream.
pub struct SymbolDecoder<R> {
    reader: BitReader<R>,
}

impl<R: Read> SymbolDecoder<R> {
    pub fn new(reader: BitReader<R>) -> Self {
        Self { reader }
    }

    /// Accumulates bits until they match a codeword of `table`.
    pub fn read_symbol(&mut self, table: &HuffmanTable) -> Result<Symbol> {
        let mut code = Bits::EMPTY;
        for _ in 0..table.max_length() {
            match self.reader.read_bit()? {
                Some(bit) => code.push(bit),
                None => return Err(DecodeError::StreamExhausted { table: table.id() }),
            }
            if let Some(symbol) = table.lookup(code) {
                return Ok(Symbol::from(symbol));
            }
        }
        Err(DecodeError::UnknownCode {
            table: table.id(),
            bits: code,
        })
    }

    /// Reads one DC difference. DC symbols never carry a zero run and always carry a value.
    pub fn read_dc(&mut self, table: &HuffmanTable) -> Result<i32> {
        let symbol = self.read_symbol(table)?;
        if symbol.zero_run != 0 {
            return Err(DecodeError::ProtocolViolation {
                table: table.id(),
                zero_run: symbol.zero_run,
            });
        }
        if symbol.magnitude_length == 0 {
            return Err(DecodeError::InvalidDcLength { table: table.id() });
        }
        self.read_value(table, symbol.magnitude_length)
    }

    /// Reads the 63 AC coefficients of one block, in zigzag order.
    pub fn read_ac(&mut self, table: &HuffmanTable) -> Result<[i32; AC_SIZE]> {
        let mut coefficients = [0i32; AC_SIZE];
        let mut filled = 0;
        while filled < AC_SIZE {
            let symbol = self.read_symbol(table)?;
            if symbol.is_end_of_block() {
                break;
            }
            let run = symbol.zero_run as usize;
            let remaining = AC_SIZE - filled;
            let needed = if symbol.magnitude_length == 0 { run } else { run + 1 };
            if needed > remaining {
                return Err(DecodeError::CoefficientOverflow {
                    table: table.id(),
                    run: needed,
                    remaining,
                });
            }
            filled += run;
            if symbol.magnitude_length != 0 {
                coefficients[filled] = self.read_value(table, symbol.magnitude_length)?;
                filled += 1;
            }
        }
        Ok(coefficients)
    }

    fn read_value(&mut self, table: &HuffmanTable, length: u8) -> Result<i32> {
        let bits = self.reader.read(length)?;
        if bits.len() != length {
            return Err(DecodeError::StreamExhausted { table: table.id() });
        }
        decode_magnitude(bits)
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    pub fn reader_mut(&mut self) -> &mut BitReader<R> {
        &mut self.reader
    }
}
