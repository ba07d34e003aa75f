//! Bit-granular, MSB-first reader over a byte source.

use std::fmt;
use std::io::{ErrorKind, Read};

use crate::constants::MAX_BITS_PER_READ;
use crate::error::{DecodeError, Result};

/// An ordered run of up to 32 bits, first-read bit most significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bits {
    value: u32,
    len: u8,
}

impl Bits {
    pub const EMPTY: Bits = Bits { value: 0, len: 0 };

    pub fn new(value: u32, len: u8) -> Self {
        debug_assert!(len <= MAX_BITS_PER_READ);
        let value = if len == 0 {
            0
        } else {
            value & (u32::MAX >> (32 - len as u32))
        };
        Self { value, len }
    }

    /// Parses a string of `0`/`1` characters; anything else yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() > MAX_BITS_PER_READ as usize {
            return None;
        }
        let mut bits = Bits::EMPTY;
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return None,
            }
        }
        Some(bits)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn leading_bit(&self) -> Option<bool> {
        if self.len == 0 {
            None
        } else {
            Some((self.value >> (self.len - 1)) & 1 == 1)
        }
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(self.len < MAX_BITS_PER_READ);
        self.value = (self.value << 1) | bit as u32;
        self.len += 1;
    }

    /// Appends `other` after `self`; `None` if the result would exceed 32 bits.
    pub fn concat(self, other: Bits) -> Option<Bits> {
        let len = self.len.checked_add(other.len)?;
        if len > MAX_BITS_PER_READ {
            return None;
        }
        let joined = ((self.value as u64) << other.len) | other.value as u64;
        Some(Bits {
            value: joined as u32,
            len,
        })
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return write!(f, "<empty>");
        }
        write!(f, "{:0width$b}", self.value, width = self.len as usize)
    }
}

/// Reads bits most-significant-first from any [`Read`] source.
///
/// One byte of lookahead is kept once the buffered bits run out, so the end
/// of the source is noticed as soon as the last bit has been consumed. A read
/// that runs past the end returns the bits that were available and marks the
/// reader empty; treating that as truncation is up to the caller.
pub struct BitReader<R> {
    source: R,
    bit_buf: u64,
    bits_in_buf: u8,
    exhausted: bool,
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            bit_buf: 0,
            bits_in_buf: 0,
            exhausted: false,
            total_bits_read: 0,
        }
    }

    /// Reads the next `count` bits. The result is shorter than `count` only
    /// when the source ran dry, in which case [`is_empty`](Self::is_empty)
    /// reports true afterwards.
    pub fn read(&mut self, count: u8) -> Result<Bits> {
        if count > MAX_BITS_PER_READ {
            return Err(DecodeError::InvalidArgument(
                "at most 32 bits can be read at once",
            ));
        }
        while self.bits_in_buf < count && !self.exhausted {
            self.fetch_byte()?;
        }

        let take = count.min(self.bits_in_buf);
        let bits = if take == 0 {
            Bits::EMPTY
        } else {
            let shift = self.bits_in_buf - take;
            let value = (self.bit_buf >> shift) & ((1u64 << take) - 1);
            self.bits_in_buf = shift;
            self.bit_buf &= (1u64 << shift) - 1;
            Bits::new(value as u32, take)
        };
        self.total_bits_read += take as u64;

        if self.bits_in_buf == 0 && !self.exhausted {
            self.fetch_byte()?;
        }
        Ok(bits)
    }

    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        let bits = self.read(1)?;
        Ok(bits.leading_bit())
    }

    /// True once a fetch found the source drained and no buffered bits remain.
    pub fn is_empty(&self) -> bool {
        self.exhausted && self.bits_in_buf == 0
    }

    pub fn total_bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Bits left before the read position lands on a byte boundary.
    pub fn bits_to_byte_boundary(&self) -> u8 {
        ((8 - self.total_bits_read % 8) % 8) as u8
    }

    fn fetch_byte(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(_) => {
                    self.bit_buf = (self.bit_buf << 8) | byte[0] as u64;
                    self.bits_in_buf += 8;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Bits {
        Bits::parse(s).unwrap()
    }

    #[test]
    fn reads_msb_first_across_bytes() {
        let mut reader = BitReader::new(&[0x0b, 0x8d, 0x9c, 0xa6][..]);
        assert_eq!(reader.read(4).unwrap(), bits("0000"));
        assert_eq!(reader.read(2).unwrap(), bits("10"));
        assert_eq!(reader.read(5).unwrap(), bits("11100"));
        assert_eq!(reader.read(1).unwrap(), bits("0"));
        assert_eq!(reader.read(20).unwrap(), bits("11011001110010100110"));
        assert!(reader.is_empty());
    }

    #[test]
    fn short_read_marks_empty() {
        let mut reader = BitReader::new(&[0xff][..]);
        assert!(!reader.is_empty());
        let got = reader.read(12).unwrap();
        assert_eq!(got, bits("11111111"));
        assert!(reader.is_empty());
        assert_eq!(reader.read(1).unwrap(), Bits::EMPTY);
    }

    #[test]
    fn empty_reported_exactly_at_end() {
        let mut reader = BitReader::new(&[0xa5][..]);
        reader.read(7).unwrap();
        assert!(!reader.is_empty());
        reader.read(1).unwrap();
        assert!(reader.is_empty());
    }

    #[test]
    fn rejects_oversized_reads() {
        let mut reader = BitReader::new(&[0u8; 8][..]);
        assert!(matches!(
            reader.read(33),
            Err(DecodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn byte_boundary_tracking() {
        let mut reader = BitReader::new(&[0u8; 2][..]);
        assert_eq!(reader.bits_to_byte_boundary(), 0);
        reader.read(3).unwrap();
        assert_eq!(reader.bits_to_byte_boundary(), 5);
        reader.read(5).unwrap();
        assert_eq!(reader.bits_to_byte_boundary(), 0);
        assert_eq!(reader.total_bits_read(), 8);
    }

    #[test]
    fn split_reads_match_single_read() {
        arbtest::arbtest(|u| {
            let len = u.int_in_range(0..=4usize)?;
            let mut data = vec![0u8; len];
            for byte in data.iter_mut() {
                *byte = u.arbitrary()?;
            }
            let total = (len * 8) as u8;

            let mut whole = BitReader::new(&data[..]);
            let expected = whole.read(total).unwrap();
            assert!(whole.is_empty());

            let mut pieces = BitReader::new(&data[..]);
            let mut joined = Bits::EMPTY;
            let mut consumed = 0u8;
            while consumed < total {
                let step = u.int_in_range(1..=total - consumed)?;
                let part = pieces.read(step).unwrap();
                assert_eq!(part.len(), step);
                consumed += step;
                assert_eq!(pieces.is_empty(), consumed == total);
                joined = joined.concat(part).unwrap();
            }
            assert_eq!(joined, expected);
            Ok(())
        });
    }

    #[test]
    fn display_and_parse_agree() {
        assert_eq!(bits("0100101").to_string(), "0100101");
        assert_eq!(Bits::EMPTY.to_string(), "<empty>");
        assert!(Bits::parse("012").is_none());
    }
}
