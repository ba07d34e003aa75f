//! Zigzag ordering of square coefficient grids.

use crate::constants::MCU_SIZE;
use crate::error::{DecodeError, Result};

/// Zigzag position -> row-major raster index for an 8x8 block.
pub const ZIGZAG_ORDER: [usize; MCU_SIZE] = [
    0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Places a zigzag-ordered 8x8 block into row-major order.
pub fn unscramble_block<T: Copy + Default>(linear: &[T; MCU_SIZE]) -> [T; MCU_SIZE] {
    let mut raster = [T::default(); MCU_SIZE];
    for (k, &value) in linear.iter().enumerate() {
        raster[ZIGZAG_ORDER[k]] = value;
    }
    raster
}

/// Zigzag permutation for a grid of any side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigZagIndex {
    side: usize,
    order: Vec<usize>,
    inverse: Vec<usize>,
}

impl ZigZagIndex {
    /// Walks anti-diagonals from the top-left corner. Even diagonals run
    /// bottom-left to top-right, odd ones the other way.
    pub fn new(side: usize) -> Self {
        let len = side * side;
        let mut order = Vec::with_capacity(len);
        for diagonal in 0..(2 * side).saturating_sub(1) {
            let first_row = diagonal.saturating_sub(side - 1);
            let last_row = diagonal.min(side - 1);
            let rows: Box<dyn Iterator<Item = usize>> = if diagonal % 2 == 0 {
                Box::new((first_row..=last_row).rev())
            } else {
                Box::new(first_row..=last_row)
            };
            for row in rows {
                order.push(row * side + (diagonal - row));
            }
        }
        let mut inverse = vec![0; len];
        for (k, &raster) in order.iter().enumerate() {
            inverse[raster] = k;
        }
        Self {
            side,
            order,
            inverse,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Row-major raster index of zigzag position `k`.
    pub fn raster_index(&self, k: usize) -> usize {
        self.order[k]
    }

    pub fn position(&self, k: usize) -> (usize, usize) {
        let raster = self.order[k];
        (raster / self.side, raster % self.side)
    }

    /// Zigzag position of a row-major raster index.
    pub fn zigzag_index(&self, raster: usize) -> usize {
        self.inverse[raster]
    }

    /// Linearizes a row-major grid into zigzag order.
    pub fn scramble<T: Copy>(&self, raster: &[T]) -> Result<Vec<T>> {
        self.check_len(raster.len())?;
        Ok(self.order.iter().map(|&i| raster[i]).collect())
    }

    /// Places zigzag-ordered values into a row-major grid.
    pub fn unscramble<T: Copy>(&self, linear: &[T]) -> Result<Vec<T>> {
        self.check_len(linear.len())?;
        Ok(self.inverse.iter().map(|&k| linear[k]).collect())
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.len() {
            return Err(DecodeError::InvalidArgument(
                "grid size does not match the zigzag index",
            ));
        }
        Ok(())
    }
}
