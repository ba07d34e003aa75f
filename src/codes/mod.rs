//! Huffman code tables and the codes source they are loaded from.
//!
//! The codes source carries only codewords. For each of the four tables, in
//! the order of [`TableId::ALL`], it packs `counts[len]` codewords of `len`
//! bits for every length, with no byte alignment between tables. Symbols come
//! from the compiled-in layout, matched to codewords by position. The rest of
//! the final byte must be uniform padding.

pub mod huffman;
pub mod standard_tables;

use std::fmt;
use std::io::{Read, Write};

use log::debug;
use num_enum::IntoPrimitive;

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::constants::{CODE_LENGTH_SLOTS, TABLE_COUNT};
use crate::error::{DecodeError, Result};

pub use huffman::{Codeword, HuffmanTable};
use standard_tables::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(u8)]
pub enum TableId {
    LumDc = 0,
    LumAc = 1,
    ColDc = 2,
    ColAc = 3,
}

impl TableId {
    /// Declaration order, which is also the order tables appear in the codes source.
    pub const ALL: [TableId; TABLE_COUNT] = [
        TableId::LumDc,
        TableId::LumAc,
        TableId::ColDc,
        TableId::ColAc,
    ];

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }

    pub fn is_dc(self) -> bool {
        matches!(self, TableId::LumDc | TableId::ColDc)
    }

    pub fn name(self) -> &'static str {
        match self {
            TableId::LumDc => "LUM_DC",
            TableId::LumAc => "LUM_AC",
            TableId::ColDc => "COL_DC",
            TableId::ColAc => "COL_AC",
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-length codeword counts plus the symbols those codewords stand for.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout<'a> {
    pub counts: &'a [u8; CODE_LENGTH_SLOTS],
    pub symbols: &'a [u8],
}

impl TableLayout<'_> {
    pub fn codeword_count(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn validate(&self, table: TableId) -> Result<()> {
        let malformed = |reason| DecodeError::MalformedCodeTable { table, reason };
        if self.counts[0] != 0 {
            return Err(malformed("zero-length codewords are degenerate"));
        }
        if self.codeword_count() != self.symbols.len() {
            return Err(malformed("symbol list does not match the per-length counts"));
        }
        // Kraft: no length may hand out more codes than the remaining space allows.
        let mut code = 0u32;
        for len in 1..CODE_LENGTH_SLOTS {
            code += self.counts[len] as u32;
            if code > 1 << len {
                return Err(malformed("per-length counts are over-subscribed"));
            }
            code <<= 1;
        }
        Ok(())
    }
}

pub const STANDARD_LAYOUTS: [TableLayout<'static>; TABLE_COUNT] = [
    TableLayout {
        counts: &LUM_DC_COUNTS,
        symbols: &LUM_DC_SYMBOLS,
    },
    TableLayout {
        counts: &LUM_AC_COUNTS,
        symbols: &LUM_AC_SYMBOLS,
    },
    TableLayout {
        counts: &COL_DC_COUNTS,
        symbols: &COL_DC_SYMBOLS,
    },
    TableLayout {
        counts: &COL_AC_COUNTS,
        symbols: &COL_AC_SYMBOLS,
    },
];

/// The four tables of a decode session. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct CodeTableSet {
    tables: [HuffmanTable; TABLE_COUNT],
}

impl CodeTableSet {
    /// Loads codewords for the standard layouts from a codes source.
    pub fn load<R: Read>(source: R) -> Result<Self> {
        Self::load_with_layouts(source, &STANDARD_LAYOUTS)
    }

    pub fn load_with_layouts<R: Read>(
        source: R,
        layouts: &[TableLayout<'_>; TABLE_COUNT],
    ) -> Result<Self> {
        let mut reader = BitReader::new(source);
        let mut tables = Vec::with_capacity(TABLE_COUNT);

        for (&id, layout) in TableId::ALL.iter().zip(layouts.iter()) {
            layout.validate(id)?;
            let mut symbols = layout.symbols.iter();
            let mut entries = Vec::with_capacity(layout.symbols.len());
            for len in 1..CODE_LENGTH_SLOTS {
                for _ in 0..layout.counts[len] {
                    let bits = reader.read(len as u8)?;
                    if bits.len() as usize != len {
                        return Err(DecodeError::MalformedCodeTable {
                            table: id,
                            reason: "codes source ended before the table was complete",
                        });
                    }
                    if let Some(&symbol) = symbols.next() {
                        entries.push(Codeword { bits, symbol });
                    }
                }
            }
            let table = HuffmanTable::from_codewords(id, entries)?;
            debug!(
                "loaded {} codewords for {} (longest {} bits)",
                table.len(),
                id,
                table.max_length()
            );
            tables.push(table);
        }

        check_padding(&mut reader)?;

        let tables: [HuffmanTable; TABLE_COUNT] = tables
            .try_into()
            .map_err(|_| DecodeError::InvalidArgument("expected exactly four tables"))?;
        Ok(Self { tables })
    }

    /// Builds canonical codewords for the given layouts without a codes source.
    pub fn canonical(layouts: &[TableLayout<'_>; TABLE_COUNT]) -> Result<Self> {
        let mut tables = Vec::with_capacity(TABLE_COUNT);
        for (&id, layout) in TableId::ALL.iter().zip(layouts.iter()) {
            tables.push(HuffmanTable::canonical(id, layout)?);
        }
        let tables: [HuffmanTable; TABLE_COUNT] = tables
            .try_into()
            .map_err(|_| DecodeError::InvalidArgument("expected exactly four tables"))?;
        Ok(Self { tables })
    }

    /// Canonical codewords for the compiled-in layouts, as the onboard encoder generates them.
    pub fn standard() -> Self {
        Self {
            tables: std::array::from_fn(|i| {
                HuffmanTable::canonical_unchecked(TableId::ALL[i], &STANDARD_LAYOUTS[i])
            }),
        }
    }

    pub fn table(&self, id: TableId) -> &HuffmanTable {
        &self.tables[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &HuffmanTable> {
        self.tables.iter()
    }

    /// Serializes the codewords as a codes source, padding the final byte with ones.
    pub fn write_codes<W: Write>(&self, mut destination: W) -> Result<()> {
        destination.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for table in &self.tables {
            for entry in table.codewords() {
                writer.write_bits(entry.bits);
            }
        }
        writer.finish()
    }
}

fn check_padding<R: Read>(reader: &mut BitReader<R>) -> Result<()> {
    let table = TableId::ColAc;
    let pad = reader.bits_to_byte_boundary();
    let padding = reader.read(pad)?;
    let all_ones = if pad == 0 { 0 } else { (1u32 << pad) - 1 };
    if padding.len() != pad || (padding.value() != 0 && padding.value() != all_ones) {
        return Err(DecodeError::MalformedCodeTable {
            table,
            reason: "trailing bits are not uniform padding",
        });
    }
    if !reader.read(1)?.is_empty() {
        return Err(DecodeError::MalformedCodeTable {
            table,
            reason: "codes source continues past the last table",
        });
    }
    Ok(())
}
