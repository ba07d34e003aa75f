pub const MCU_SIDE_LENGTH: usize = 8;
pub const MCU_SIZE: usize = MCU_SIDE_LENGTH * MCU_SIDE_LENGTH;

// Every block carries one DC coefficient followed by the AC coefficients.
pub const AC_SIZE: usize = MCU_SIZE - 1;

// Codewords are at most 16 bits; count arrays are indexed by code length, so slot 0 is unused.
pub const MAX_CODE_LENGTH: usize = 16;
pub const CODE_LENGTH_SLOTS: usize = MAX_CODE_LENGTH + 1;

pub const TABLE_COUNT: usize = 4;

pub const COLOR_CHANNELS: usize = 3;

// Level shift the encoder subtracts before the forward transform.
pub const SAMPLE_OFFSET: f32 = 128.0;

// Widest request a single BitReader::read call accepts.
pub const MAX_BITS_PER_READ: u8 = 32;
