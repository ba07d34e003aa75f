//! MSB-first bit packer, the counterpart of [`BitReader`](crate::bit_reader::BitReader).

use crate::bit_reader::Bits;

/// Packs bit strings into bytes with no stuffing and no alignment between writes.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_buffer: u32,
    bits_in_buffer: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bits(&mut self, bits: Bits) {
        for i in (0..bits.len()).rev() {
            self.write_bit((bits.value() >> i) & 1 == 1);
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.bit_buffer = (self.bit_buffer << 1) | bit as u32;
        self.bits_in_buffer += 1;
        if self.bits_in_buffer == 8 {
            self.data.push(self.bit_buffer as u8);
            self.bit_buffer = 0;
            self.bits_in_buffer = 0;
        }
    }

    /// Bits written so far, including the pending partial byte.
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 + self.bits_in_buffer as usize
    }

    /// Pads the last partial byte with ones and returns the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        while self.bits_in_buffer != 0 {
            self.write_bit(true);
        }
        self.data
    }
}
