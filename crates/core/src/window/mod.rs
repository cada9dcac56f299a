//! Hann window used to taper sample blocks before the transform.

use std::f32::consts::PI;

use crate::{AnalysisError, Result};

/// Returns `len` Hann coefficients, `0.5 * (1 - cos(2πi / (len - 1)))`.
///
/// A single-sample window is `[1.0]` so that it never silences its input.
pub fn hann(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }

    let denominator = (len - 1) as f32;
    (0..len)
        .map(|index| 0.5 * (1.0 - (2.0 * PI * index as f32 / denominator).cos()))
        .collect()
}

/// Multiplies `samples` by `window` element by element.
pub fn apply(samples: &[f32], window: &[f32]) -> Result<Vec<f32>> {
    if samples.len() != window.len() {
        return Err(AnalysisError::invalid(format!(
            "window has {} coefficients but the block has {} samples",
            window.len(),
            samples.len()
        )));
    }

    Ok(samples
        .iter()
        .zip(window)
        .map(|(sample, coefficient)| sample * coefficient)
        .collect())
}
