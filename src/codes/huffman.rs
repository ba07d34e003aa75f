//! Huffman tables keyed by explicit codewords rather than canonical ranges.
//! Codewords arrive over the codes source, so nothing here assumes canonical order.

use crate::bit_reader::Bits;
use crate::codes::{TableId, TableLayout};
use crate::constants::{CODE_LENGTH_SLOTS, MAX_CODE_LENGTH};
use crate::error::{DecodeError, Result};

/// A codeword and the symbol it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    pub bits: Bits,
    pub symbol: u8,
}

#[derive(Debug, Clone)]
pub struct HuffmanTable {
    id: TableId,
    entries: Vec<Codeword>,
    // Per code length, (code value, symbol) pairs sorted by code value.
    by_length: [Vec<(u32, u8)>; CODE_LENGTH_SLOTS],
    max_length: u8,
}

impl HuffmanTable {
    /// Builds a table from transmitted codewords, rejecting empty codewords and
    /// sets that are not prefix-free.
    pub fn from_codewords(id: TableId, entries: Vec<Codeword>) -> Result<Self> {
        if entries
            .iter()
            .any(|e| e.bits.is_empty() || e.bits.len() as usize > MAX_CODE_LENGTH)
        {
            return Err(DecodeError::MalformedCodeTable {
                table: id,
                reason: "codeword length outside 1..=16",
            });
        }
        if !is_prefix_free(&entries) {
            return Err(DecodeError::MalformedCodeTable {
                table: id,
                reason: "codewords are not prefix-free",
            });
        }
        Ok(Self::from_trusted(id, entries))
    }

    /// Assigns canonical codewords to a layout: consecutive codes within a
    /// length, shifted left when moving to the next length.
    pub fn canonical(id: TableId, layout: &TableLayout<'_>) -> Result<Self> {
        layout.validate(id)?;
        Ok(Self::from_trusted(id, canonical_codewords(layout)))
    }

    pub(crate) fn canonical_unchecked(id: TableId, layout: &TableLayout<'_>) -> Self {
        Self::from_trusted(id, canonical_codewords(layout))
    }

    fn from_trusted(id: TableId, entries: Vec<Codeword>) -> Self {
        let mut by_length: [Vec<(u32, u8)>; CODE_LENGTH_SLOTS] = std::array::from_fn(|_| Vec::new());
        let mut max_length = 0;
        for entry in &entries {
            let len = entry.bits.len();
            by_length[len as usize].push((entry.bits.value(), entry.symbol));
            max_length = max_length.max(len);
        }
        for codes in by_length.iter_mut() {
            codes.sort_unstable_by_key(|&(code, _)| code);
        }
        Self {
            id,
            entries,
            by_length,
            max_length,
        }
    }

    /// Returns the symbol whose codeword is exactly `bits`.
    pub fn lookup(&self, bits: Bits) -> Option<u8> {
        let codes = self.by_length.get(bits.len() as usize)?;
        codes
            .binary_search_by_key(&bits.value(), |&(code, _)| code)
            .ok()
            .map(|i| codes[i].1)
    }

    /// Returns the first codeword registered for `symbol`.
    pub fn codeword_for(&self, symbol: u8) -> Option<Bits> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.bits)
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// Codewords in layout order (ascending length, then transmission order).
    pub fn codewords(&self) -> &[Codeword] {
        &self.entries
    }

    pub fn max_length(&self) -> u8 {
        self.max_length
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical_codewords(layout: &TableLayout<'_>) -> Vec<Codeword> {
    let mut entries = Vec::with_capacity(layout.symbols.len());
    let mut symbols = layout.symbols.iter();
    let mut code = 0u32;
    for len in 1..CODE_LENGTH_SLOTS {
        for _ in 0..layout.counts[len] {
            if let Some(&symbol) = symbols.next() {
                entries.push(Codeword {
                    bits: Bits::new(code, len as u8),
                    symbol,
                });
            }
            code += 1;
        }
        code <<= 1;
    }
    entries
}

// A codeword that prefixes another sorts immediately before some codeword it
// prefixes once all are compared as left-aligned bit strings.
fn is_prefix_free(entries: &[Codeword]) -> bool {
    let mut sorted: Vec<Bits> = entries.iter().map(|e| e.bits).collect();
    sorted.sort_unstable_by_key(|b| {
        let aligned = b.value() << (MAX_CODE_LENGTH as u32 - b.len() as u32);
        (aligned, b.len())
    });
    sorted.windows(2).all(|pair| {
        let (short, long) = (pair[0], pair[1]);
        match long.len().checked_sub(short.len()) {
            Some(shift) => long.value() >> shift != short.value(),
            None => true,
        }
    })
}
