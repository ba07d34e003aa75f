#![allow(dead_code)]

use satjpeg_rs::{BitWriter, Bits, Channel, ChannelLayout, CodeTableSet, TableId};

/// Magnitude bits as the onboard encoder writes them: positive values in
/// plain binary, negative values as the complement of their magnitude, and
/// zero as the single bit `0`.
pub fn magnitude_bits(value: i32) -> Bits {
    if value == 0 {
        return Bits::new(0, 1);
    }
    let magnitude = value.unsigned_abs();
    let len = (32 - magnitude.leading_zeros()) as u8;
    if value > 0 {
        Bits::new(magnitude, len)
    } else {
        Bits::new(!magnitude, len)
    }
}

/// Builds payloads one MCU at a time from zigzag-ordered coefficient blocks
/// with absolute DC values.
pub struct PayloadWriter<'t> {
    tables: &'t CodeTableSet,
    layout: ChannelLayout,
    writer: BitWriter,
    predictors: [i32; 3],
}

impl<'t> PayloadWriter<'t> {
    pub fn new(tables: &'t CodeTableSet, layout: ChannelLayout) -> Self {
        Self {
            tables,
            layout,
            writer: BitWriter::new(),
            predictors: [0; 3],
        }
    }

    pub fn mcu(&mut self, blocks: &[[i32; 64]]) -> &mut Self {
        assert_eq!(blocks.len(), self.layout.channel_count());
        for (slot, (&channel, block)) in self.layout.channels().iter().zip(blocks).enumerate() {
            self.block(slot, channel, block);
        }
        self
    }

    /// An MCU whose every block is flat at the given DC level.
    pub fn flat_mcu(&mut self, dc: i32) -> &mut Self {
        let mut block = [0; 64];
        block[0] = dc;
        let blocks = vec![block; self.layout.channel_count()];
        self.mcu(&blocks)
    }

    pub fn raw(&mut self, bits: &str) -> &mut Self {
        self.writer.write_bits(Bits::parse(bits).expect("bit string"));
        self
    }

    pub fn bit_len(&self) -> usize {
        self.writer.bit_len()
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }

    fn block(&mut self, slot: usize, channel: Channel, block: &[i32; 64]) {
        let difference = block[0] - self.predictors[slot];
        self.predictors[slot] = block[0];
        let value = magnitude_bits(difference);
        self.symbol(channel.dc_table(), value.len());
        self.writer.write_bits(value);

        let ac_table = channel.ac_table();
        let mut run = 0u8;
        for &coefficient in &block[1..] {
            if coefficient == 0 {
                run += 1;
                continue;
            }
            // A zero-run-only symbol stands for exactly `run` zeros.
            while run > 15 {
                self.symbol(ac_table, 0xf0);
                run -= 15;
            }
            let value = magnitude_bits(coefficient);
            self.symbol(ac_table, (run << 4) | value.len());
            self.writer.write_bits(value);
            run = 0;
        }
        if run > 0 {
            self.symbol(ac_table, 0x00);
        }
    }

    fn symbol(&mut self, table: TableId, symbol: u8) {
        let code = self
            .tables
            .table(table)
            .codeword_for(symbol)
            .unwrap_or_else(|| panic!("{table} has no codeword for 0x{symbol:02x}"));
        self.writer.write_bits(code);
    }
}
