//! Orthonormal 8x8 inverse DCT.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

use crate::constants::{MCU_SIDE_LENGTH, MCU_SIZE};

type CosineTable = [[f32; MCU_SIDE_LENGTH]; MCU_SIDE_LENGTH];

// basis[x][u] = 0.5 * c(u) * cos((2x + 1)u * pi / 16), c(0) = 1/sqrt(2), c(u) = 1 otherwise.
fn basis() -> &'static CosineTable {
    static BASIS: OnceLock<CosineTable> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut table = [[0.0f32; MCU_SIDE_LENGTH]; MCU_SIDE_LENGTH];
        for (x, row) in table.iter_mut().enumerate() {
            for (u, entry) in row.iter_mut().enumerate() {
                let cu = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                *entry = 0.5 * cu * (((2 * x + 1) * u) as f32 * PI / 16.0).cos();
            }
        }
        table
    })
}

/// Transforms row-major frequency coefficients into row-major samples.
/// Output is unclamped.
pub fn idct_8x8(input: &[f32; MCU_SIZE], output: &mut [f32; MCU_SIZE]) {
    let basis = basis();
    let mut columns = [0.0f32; MCU_SIZE];

    // Vertical pass: columns[x][v] = sum_u basis[x][u] * input[u][v]
    for x in 0..MCU_SIDE_LENGTH {
        for v in 0..MCU_SIDE_LENGTH {
            let mut sum = 0.0f32;
            for u in 0..MCU_SIDE_LENGTH {
                sum += basis[x][u] * input[u * MCU_SIDE_LENGTH + v];
            }
            columns[x * MCU_SIDE_LENGTH + v] = sum;
        }
    }

    // Horizontal pass: output[x][y] = sum_v basis[y][v] * columns[x][v]
    for x in 0..MCU_SIDE_LENGTH {
        for y in 0..MCU_SIDE_LENGTH {
            let mut sum = 0.0f32;
            for v in 0..MCU_SIDE_LENGTH {
                sum += basis[y][v] * columns[x * MCU_SIDE_LENGTH + v];
            }
            output[x * MCU_SIDE_LENGTH + y] = sum;
        }
    }
}
