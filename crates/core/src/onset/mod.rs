use crate::config::OnsetConfig;

const ENERGY_EPSILON: f32 = 1e-6;

/// Loudness-ratio onset detector.
///
/// The only state kept between calls is the RMS energy of the last block, so
/// the caller can feed it back as `prev_energy` on the next call.
#[derive(Debug, Clone)]
pub struct OnsetDetector {
    current_energy: f32,
    threshold: f32,
}

impl Default for OnsetDetector {
    fn default() -> Self {
        Self::from_config(&OnsetConfig::default())
    }
}

impl OnsetDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &OnsetConfig) -> Self {
        Self::with_threshold(config.threshold)
    }

    /// Creates a detector firing once the loudness ratio exceeds `threshold`.
    /// Thresholds that are not finite and positive fall back to 1.5.
    pub fn with_threshold(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold
        } else {
            tracing::warn!(threshold, "invalid onset threshold, using 1.5");
            OnsetConfig::default().threshold
        };

        Self {
            current_energy: 0.0,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the onset strength in `[0, 1]` of `samples` relative to the
    /// previous block's RMS energy. A non-positive `prev_energy` always yields
    /// 0.
    pub fn detect(&mut self, samples: &[f32], prev_energy: f32) -> f32 {
        self.current_energy = rms(samples);

        if prev_energy.is_nan() || prev_energy <= 0.0 {
            return 0.0;
        }

        let ratio = self.current_energy / (prev_energy + ENERGY_EPSILON);
        if ratio > self.threshold {
            ((ratio - self.threshold) / self.threshold).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// RMS energy of the block passed to the most recent [`detect`] call.
    ///
    /// [`detect`]: OnsetDetector::detect
    pub fn current_energy(&self) -> f32 {
        self.current_energy
    }
}

/// Root mean square of `samples`, or 0 for an empty block.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: f32 = samples.iter().map(|sample| sample * sample).sum();
    (sum / samples.len() as f32).sqrt()
}
