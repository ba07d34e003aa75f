use thiserror::Error;

use crate::bit_reader::Bits;
use crate::codes::TableId;
use crate::payload::Channel;

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    // Input validation failures
    #[error("Payload ended mid-MCU while reading from {table}")]
    StreamExhausted { table: TableId },
    #[error("Malformed code table {table}: {reason}")]
    MalformedCodeTable { table: TableId, reason: &'static str },
    #[error("No codeword in {table} matches bits {bits}")]
    UnknownCode { table: TableId, bits: Bits },
    #[error("DC symbol from {table} carries zero run {zero_run}")]
    ProtocolViolation { table: TableId, zero_run: u8 },
    #[error("DC symbol from {table} has zero magnitude length")]
    InvalidDcLength { table: TableId },
    #[error("Cannot resolve a value from an empty magnitude")]
    EmptyMagnitude,
    #[error("AC run of {run} from {table} exceeds the {remaining} remaining coefficient slots")]
    CoefficientOverflow {
        table: TableId,
        run: usize,
        remaining: usize,
    },
    #[error("{mcus} MCUs cannot be tiled into a frame: {reason}")]
    ShapeMismatch { mcus: usize, reason: &'static str },

    #[error("MCU {index}, {channel} channel: {source}")]
    Mcu {
        index: usize,
        channel: Channel,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Strips MCU context and returns the underlying failure.
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::Mcu { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_mcu(self, index: usize, channel: Channel) -> Self {
        DecodeError::Mcu {
            index,
            channel,
            source: Box::new(self),
        }
    }
}
