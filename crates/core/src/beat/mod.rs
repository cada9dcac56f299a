use serde::{Deserialize, Serialize};

use crate::{
    config::BeatConfig,
    spectrum::{self, FrequencyBand, Spectrum},
};

const MAX_BEAT_TIMES: usize = 32;
/// Number of energy samples the detector averages over.
pub const HISTORY_CAPACITY: usize = 200;

/// A detected beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatEvent {
    /// Confidence in `(0, 1]`.
    pub strength: f32,
    /// Dominant frequency of the spectrum that triggered the beat.
    pub frequency: f32,
    pub timestamp_ms: f64,
    pub band: FrequencyBand,
}

/// One entry of the rolling energy history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    pub timestamp_ms: f64,
    pub energy: f32,
}

/// Fixed-capacity FIFO of [`EnergySample`]s. Storage is allocated once and
/// reused through a write cursor; once full, every push overwrites the oldest
/// entry.
#[derive(Debug, Clone)]
pub struct EnergyHistory {
    entries: Vec<EnergySample>,
    capacity: usize,
    cursor: usize,
}

impl Default for EnergyHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl EnergyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    pub fn push(&mut self, sample: EnergySample) {
        if self.entries.len() < self.capacity {
            self.entries.push(sample);
        } else {
            self.entries[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Iterates from the oldest to the newest entry.
    pub fn iter(&self) -> impl Iterator<Item = &EnergySample> + '_ {
        let split = if self.entries.len() < self.capacity {
            0
        } else {
            self.cursor
        };
        self.entries[split..].iter().chain(self.entries[..split].iter())
    }

    /// Mean energy over all entries, or 0 when empty. Accumulates in `f64`
    /// so a steady input averages back to exactly its own value.
    pub fn mean_energy(&self) -> f32 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .entries
            .iter()
            .map(|sample| f64::from(sample.energy))
            .sum();
        (sum / self.entries.len() as f64) as f32
    }
}

/// Adaptive-threshold beat detector over successive spectra.
///
/// The energy of the configured frequency range is compared against the mean
/// of a rolling history. A beat fires when the current energy exceeds
/// `mean * (1 + sensitivity)` and the debounce interval has passed since the
/// previous beat.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    sensitivity: f32,
    min_frequency: f32,
    max_frequency: f32,
    debounce_ms: f64,
    history: EnergyHistory,
    clock_ms: f64,
    last_beat_ms: Option<f64>,
    last_flux: f32,
    beat_times: Vec<f64>,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::from_config(&BeatConfig::default())
    }
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BeatConfig) -> Self {
        let mut detector = Self {
            sensitivity: 1.0,
            min_frequency: 0.0,
            max_frequency: 0.0,
            debounce_ms: config.debounce_ms.max(0.0),
            history: EnergyHistory::new(),
            clock_ms: 0.0,
            last_beat_ms: None,
            last_flux: 0.0,
            beat_times: Vec::with_capacity(MAX_BEAT_TIMES),
        };
        detector.set_sensitivity(config.sensitivity);
        detector.set_frequency_range(config.min_frequency, config.max_frequency);
        detector
    }

    /// Sets the threshold multiplier. Lower values make detection more
    /// sensitive; negative or non-finite values are treated as 0.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            tracing::warn!(sensitivity, "invalid beat sensitivity, using 0");
            self.sensitivity = 0.0;
        } else {
            self.sensitivity = sensitivity;
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Sets the frequency range whose energy drives detection. Reversed
    /// bounds are swapped.
    pub fn set_frequency_range(&mut self, min_hz: f32, max_hz: f32) {
        if min_hz > max_hz {
            self.min_frequency = max_hz;
            self.max_frequency = min_hz;
        } else {
            self.min_frequency = min_hz;
            self.max_frequency = max_hz;
        }
    }

    pub fn frequency_range(&self) -> (f32, f32) {
        (self.min_frequency, self.max_frequency)
    }

    /// Clears the energy history, the frame clock and the last-beat marker.
    pub fn reset(&mut self) {
        self.history.clear();
        self.clock_ms = 0.0;
        self.last_beat_ms = None;
        self.last_flux = 0.0;
        self.beat_times.clear();
    }

    /// Runs detection for `current`, advancing the internal frame clock by
    /// the nominal duration of one transform block.
    pub fn detect(&mut self, current: &Spectrum, previous: &Spectrum) -> Option<BeatEvent> {
        let frame_ms = current.transform_size as f64 * 1000.0 / current.sample_rate.max(1) as f64;
        self.clock_ms += frame_ms;
        let timestamp = self.clock_ms;
        self.detect_at(current, previous, timestamp)
    }

    /// Runs detection for `current` at a caller-supplied timestamp. Timestamps
    /// are expected to be monotonic.
    pub fn detect_at(
        &mut self,
        current: &Spectrum,
        previous: &Spectrum,
        timestamp_ms: f64,
    ) -> Option<BeatEvent> {
        self.last_flux = spectral_flux(&current.magnitudes, &previous.magnitudes);

        let energy = self.band_energy(current);
        self.history.push(EnergySample {
            timestamp_ms,
            energy,
        });

        let average = self.history.mean_energy();
        let threshold = average * (1.0 + self.sensitivity);
        let debounced = self
            .last_beat_ms
            .map(|last| timestamp_ms - last >= self.debounce_ms)
            .unwrap_or(true);

        if energy <= threshold || !debounced {
            return None;
        }

        let margin = threshold - average;
        let strength = if margin > f32::EPSILON {
            ((energy - average) / margin).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.last_beat_ms = Some(timestamp_ms);
        self.beat_times.push(timestamp_ms);
        if self.beat_times.len() > MAX_BEAT_TIMES {
            let overflow = self.beat_times.len() - MAX_BEAT_TIMES;
            self.beat_times.drain(0..overflow);
        }

        let event = BeatEvent {
            strength,
            frequency: current.peak_frequency,
            timestamp_ms,
            band: self.source_band(),
        };
        tracing::debug!(
            strength = event.strength,
            frequency = event.frequency,
            timestamp_ms,
            "beat detected"
        );
        Some(event)
    }

    /// History entries at or after `last beat - window_ms`. Before the first
    /// beat the marker is 0.
    pub fn recent_beats(&self, window_ms: f64) -> Vec<EnergySample> {
        let cutoff = self.last_beat_ms.unwrap_or(0.0) - window_ms;
        self.history
            .iter()
            .filter(|sample| sample.timestamp_ms >= cutoff)
            .copied()
            .collect()
    }

    /// Spectral flux computed by the most recent detection call.
    pub fn last_flux(&self) -> f32 {
        self.last_flux
    }

    pub fn last_beat_ms(&self) -> Option<f64> {
        self.last_beat_ms
    }

    pub fn history(&self) -> &EnergyHistory {
        &self.history
    }

    /// Tempo derived from the mean interval between recent beats.
    pub fn tempo_bpm(&self) -> Option<f32> {
        let intervals: Vec<f64> = self
            .beat_times
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|interval| *interval > f64::EPSILON)
            .collect();

        if intervals.is_empty() {
            return None;
        }

        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        Some((60_000.0 / mean) as f32)
    }

    fn band_energy(&self, spectrum: &Spectrum) -> f32 {
        let min_bin = spectrum::frequency_to_bin(
            self.min_frequency,
            spectrum.transform_size,
            spectrum.sample_rate,
        );
        let max_bin = spectrum::frequency_to_bin(
            self.max_frequency,
            spectrum.transform_size,
            spectrum.sample_rate,
        );
        spectrum::mean_over_bins(&spectrum.magnitudes, min_bin, max_bin)
    }

    fn source_band(&self) -> FrequencyBand {
        let centre = (self.min_frequency + self.max_frequency) * 0.5;
        FrequencyBand::containing(centre).unwrap_or(FrequencyBand::Bass)
    }
}

/// Root mean square of the positive bin-wise increase from `previous` to
/// `current`. Returns 0 for empty or mismatched sequences.
pub fn spectral_flux(current: &[f32], previous: &[f32]) -> f32 {
    if current.is_empty() || current.len() != previous.len() {
        return 0.0;
    }

    let sum: f32 = current
        .iter()
        .zip(previous)
        .map(|(now, before)| {
            let rise = (now - before).max(0.0);
            rise * rise
        })
        .sum();

    (sum / current.len() as f32).sqrt()
}
