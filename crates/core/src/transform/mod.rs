//! Iterative radix-2 decimation-in-time Fourier transform.
//!
//! The functions here are pure: twiddle factors are derived on every call and
//! nothing is cached between calls. Only power-of-two lengths are supported.

use std::f32::consts::PI;

use realfft::num_complex::Complex32;

use crate::{AnalysisError, Result};

/// Computes the full discrete Fourier transform of a real-valued block.
///
/// The output holds `samples.len()` complex bins. For real input the result
/// is conjugate-symmetric, so only the first half carries independent
/// information.
pub fn fft(samples: &[f32]) -> Result<Vec<Complex32>> {
    let mut buffer: Vec<Complex32> = samples
        .iter()
        .map(|&sample| Complex32::new(sample, 0.0))
        .collect();
    fft_in_place(&mut buffer)?;
    Ok(buffer)
}

/// Transforms `buffer` in place. Fails if its length is not a power of two.
pub fn fft_in_place(buffer: &mut [Complex32]) -> Result<()> {
    let len = buffer.len();
    if !len.is_power_of_two() {
        return Err(AnalysisError::invalid(format!(
            "transform length {len} is not a power of two"
        )));
    }

    bit_reverse_permute(buffer);

    let stages = len.trailing_zeros();
    for stage in 1..=stages {
        let span = 1usize << stage;
        let half = span / 2;
        let step = -2.0 * PI / span as f32;

        for start in (0..len).step_by(span) {
            for k in 0..half {
                let twiddle = Complex32::from_polar(1.0, step * k as f32);
                let even = buffer[start + k];
                let odd = buffer[start + k + half] * twiddle;
                buffer[start + k] = even + odd;
                buffer[start + k + half] = even - odd;
            }
        }
    }

    Ok(())
}

/// Reorders `buffer` so that element `i` moves to the bit-reversed index of
/// `i`. The length must be a power of two.
pub fn bit_reverse_permute<T>(buffer: &mut [T]) {
    let len = buffer.len();
    if len <= 2 {
        return;
    }

    let shift = usize::BITS - len.trailing_zeros();
    for index in 0..len {
        let reversed = index.reverse_bits() >> shift;
        if index < reversed {
            buffer.swap(index, reversed);
        }
    }
}
