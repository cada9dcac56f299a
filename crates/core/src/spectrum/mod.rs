use std::fmt;

use realfft::num_complex::Complex32;
use serde::{Deserialize, Serialize};

use crate::{config::AnalyzerConfig, transform, window, AnalysisError, Result};

/// Number of fixed perceptual bands tracked per spectrum.
pub const BAND_COUNT: usize = 7;

/// Offset that avoids taking the logarithm of zero. It also sets the floor of
/// the dynamic range: `20 * log10(1e-6)` is -120 dB.
const LOG_EPSILON: f32 = 1e-6;
/// Dynamic range in decibels mapped onto `[0, 1]`.
const DYNAMIC_RANGE_DB: f32 = 120.0;
/// Largest transform the analyser will allocate. Larger requests, including
/// ones whose next power of two does not fit in `usize`, are capped here.
pub const MAX_TRANSFORM_SIZE: usize = 1 << 20;

/// Fixed perceptual frequency ranges used for band aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyBand {
    SubBass,
    Bass,
    LowMid,
    Mid,
    HighMid,
    Presence,
    Brilliance,
}

impl FrequencyBand {
    /// All bands ordered from lowest to highest.
    pub const ALL: [FrequencyBand; BAND_COUNT] = [
        FrequencyBand::SubBass,
        FrequencyBand::Bass,
        FrequencyBand::LowMid,
        FrequencyBand::Mid,
        FrequencyBand::HighMid,
        FrequencyBand::Presence,
        FrequencyBand::Brilliance,
    ];

    /// Returns the `(min_hz, max_hz)` range covered by the band.
    pub fn range(self) -> (f32, f32) {
        match self {
            FrequencyBand::SubBass => (20.0, 60.0),
            FrequencyBand::Bass => (60.0, 250.0),
            FrequencyBand::LowMid => (250.0, 500.0),
            FrequencyBand::Mid => (500.0, 2000.0),
            FrequencyBand::HighMid => (2000.0, 4000.0),
            FrequencyBand::Presence => (4000.0, 6000.0),
            FrequencyBand::Brilliance => (6000.0, 20000.0),
        }
    }

    /// Position of the band inside [`FrequencyBand::ALL`] and inside
    /// [`Spectrum::band_levels`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FrequencyBand::SubBass => "sub-bass",
            FrequencyBand::Bass => "bass",
            FrequencyBand::LowMid => "low-mid",
            FrequencyBand::Mid => "mid",
            FrequencyBand::HighMid => "high-mid",
            FrequencyBand::Presence => "presence",
            FrequencyBand::Brilliance => "brilliance",
        }
    }

    /// Returns the band whose range contains `hz`. Ranges are half-open except
    /// for the top of [`FrequencyBand::Brilliance`].
    pub fn containing(hz: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|band| {
            let (min, max) = band.range();
            hz >= min && (hz < max || (*band == FrequencyBand::Brilliance && hz <= max))
        })
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequency-domain snapshot of one sample block.
///
/// Magnitudes cover the bins below Nyquist only and are log-scaled into
/// `[0, 1]`. Band levels are the mean magnitude of each [`FrequencyBand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub magnitudes: Vec<f32>,
    pub band_levels: [f32; BAND_COUNT],
    pub peak_frequency: f32,
    pub peak_magnitude: f32,
    pub sample_rate: u32,
    pub transform_size: usize,
}

impl Spectrum {
    /// An all-zero spectrum, used as the "previous" frame before any block
    /// has been analysed.
    pub fn silent(transform_size: usize, sample_rate: u32) -> Self {
        Self {
            magnitudes: vec![0.0; transform_size / 2],
            band_levels: [0.0; BAND_COUNT],
            peak_frequency: 0.0,
            peak_magnitude: 0.0,
            sample_rate,
            transform_size,
        }
    }

    pub fn band_level(&self, band: FrequencyBand) -> f32 {
        self.band_levels[band.index()]
    }
}

/// Turns fixed-size sample blocks into [`Spectrum`] snapshots.
///
/// The analyser owns its window coefficients and a scratch buffer for the
/// transform. Results depend only on the submitted samples and the window
/// flag.
pub struct SpectrumAnalyzer {
    transform_size: usize,
    sample_rate: u32,
    window: Vec<f32>,
    scratch: Vec<Complex32>,
}

impl SpectrumAnalyzer {
    /// Creates an analyser. A transform size that is not a power of two is
    /// rounded up to the next one, and sizes above [`MAX_TRANSFORM_SIZE`] are
    /// capped to it.
    pub fn new(transform_size: usize, sample_rate: u32) -> Self {
        let rounded = match transform_size
            .max(2)
            .checked_next_power_of_two()
            .filter(|&size| size <= MAX_TRANSFORM_SIZE)
        {
            Some(size) => size,
            None => {
                tracing::warn!(
                    requested = transform_size,
                    capped = MAX_TRANSFORM_SIZE,
                    "transform size is too large, capping"
                );
                MAX_TRANSFORM_SIZE
            }
        };
        if rounded != transform_size && transform_size <= MAX_TRANSFORM_SIZE {
            tracing::warn!(
                requested = transform_size,
                rounded,
                "transform size is not a power of two, rounding up"
            );
        }

        let sample_rate = if sample_rate == 0 {
            tracing::warn!("sample rate of 0 Hz is unusable, falling back to 1 Hz");
            1
        } else {
            sample_rate
        };

        tracing::debug!(
            transform_size = rounded,
            sample_rate,
            "spectrum analyser created"
        );

        Self {
            transform_size: rounded,
            sample_rate,
            window: window::hann(rounded),
            scratch: vec![Complex32::new(0.0, 0.0); rounded],
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.transform_size, config.sample_rate)
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Width of one bin in Hz.
    pub fn frequency_resolution(&self) -> f32 {
        self.sample_rate as f32 / self.transform_size as f32
    }

    pub fn nyquist_frequency(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    pub fn bin_to_frequency(&self, bin: usize) -> f32 {
        bin_to_frequency(bin, self.transform_size, self.sample_rate)
    }

    pub fn frequency_to_bin(&self, frequency: f32) -> usize {
        frequency_to_bin(frequency, self.transform_size, self.sample_rate)
    }

    /// Inclusive bin range of `band`, with the upper bound clamped below
    /// Nyquist. The range is empty (`min > max`) when the band starts above
    /// Nyquist.
    pub fn band_bin_range(&self, band: FrequencyBand) -> (usize, usize) {
        band_bin_range(band, self.transform_size, self.sample_rate)
    }

    /// Analyses one mono block of exactly `transform_size` samples.
    pub fn analyze(&mut self, samples: &[f32], use_window: bool) -> Result<Spectrum> {
        self.check_len(samples.len(), self.transform_size)?;
        let magnitudes = self.compute_magnitudes(samples, use_window)?;
        Ok(self.build_spectrum(magnitudes))
    }

    /// Analyses an interleaved stereo block of exactly `2 * transform_size`
    /// samples. Magnitudes of both channels are averaged bin by bin; peak and
    /// band levels are then derived from the averaged sequence.
    pub fn analyze_stereo(&mut self, interleaved: &[f32], use_window: bool) -> Result<Spectrum> {
        self.check_len(interleaved.len(), self.transform_size * 2)?;

        let (left, right): (Vec<f32>, Vec<f32>) = interleaved
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();

        let left = self.compute_magnitudes(&left, use_window)?;
        let right = self.compute_magnitudes(&right, use_window)?;
        let averaged = left
            .iter()
            .zip(&right)
            .map(|(l, r)| (l + r) * 0.5)
            .collect();

        Ok(self.build_spectrum(averaged))
    }

    /// Windowed magnitude sequence only, without peak or band aggregation.
    pub fn magnitudes(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        self.check_len(samples.len(), self.transform_size)?;
        self.compute_magnitudes(samples, true)
    }

    /// Mean magnitude of each of the seven bands of `spectrum`.
    pub fn band_levels(&self, spectrum: &Spectrum) -> [f32; BAND_COUNT] {
        band_levels(
            &spectrum.magnitudes,
            spectrum.transform_size,
            spectrum.sample_rate,
        )
    }

    fn check_len(&self, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(AnalysisError::SampleCountMismatch { expected, actual });
        }
        Ok(())
    }

    fn compute_magnitudes(&mut self, samples: &[f32], use_window: bool) -> Result<Vec<f32>> {
        if use_window {
            for ((slot, sample), coefficient) in
                self.scratch.iter_mut().zip(samples).zip(&self.window)
            {
                *slot = Complex32::new(sample * coefficient, 0.0);
            }
        } else {
            for (slot, sample) in self.scratch.iter_mut().zip(samples) {
                *slot = Complex32::new(*sample, 0.0);
            }
        }

        transform::fft_in_place(&mut self.scratch)?;

        let half = self.transform_size / 2;
        let scale = half as f32;
        Ok(self.scratch[..half]
            .iter()
            .map(|bin| log_scale(bin.norm() / scale))
            .collect())
    }

    fn build_spectrum(&self, magnitudes: Vec<f32>) -> Spectrum {
        let (peak_bin, peak_magnitude) = find_peak(&magnitudes);
        let band_levels = band_levels(&magnitudes, self.transform_size, self.sample_rate);

        Spectrum {
            magnitudes,
            band_levels,
            peak_frequency: self.bin_to_frequency(peak_bin),
            peak_magnitude,
            sample_rate: self.sample_rate,
            transform_size: self.transform_size,
        }
    }
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("transform_size", &self.transform_size)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

pub fn bin_to_frequency(bin: usize, transform_size: usize, sample_rate: u32) -> f32 {
    bin as f32 * sample_rate as f32 / transform_size as f32
}

/// Bin containing `frequency`, rounded down. Negative frequencies map to 0.
pub fn frequency_to_bin(frequency: f32, transform_size: usize, sample_rate: u32) -> usize {
    (frequency * transform_size as f32 / sample_rate.max(1) as f32).floor() as usize
}

fn band_bin_range(band: FrequencyBand, transform_size: usize, sample_rate: u32) -> (usize, usize) {
    let (min_hz, max_hz) = band.range();
    let last_bin = (transform_size / 2).saturating_sub(1);
    (
        frequency_to_bin(min_hz, transform_size, sample_rate),
        frequency_to_bin(max_hz, transform_size, sample_rate).min(last_bin),
    )
}

/// Mean of `magnitudes` over the inclusive bin range, or 0 when the range is
/// empty.
pub(crate) fn mean_over_bins(magnitudes: &[f32], min_bin: usize, max_bin: usize) -> f32 {
    let max_bin = max_bin.min(magnitudes.len().saturating_sub(1));
    if magnitudes.is_empty() || min_bin > max_bin {
        return 0.0;
    }

    let bins = &magnitudes[min_bin..=max_bin];
    let mean = bins.iter().sum::<f32>() / bins.len() as f32;
    mean.clamp(0.0, 1.0)
}

fn band_levels(magnitudes: &[f32], transform_size: usize, sample_rate: u32) -> [f32; BAND_COUNT] {
    let mut levels = [0.0; BAND_COUNT];
    for band in FrequencyBand::ALL {
        let (min_bin, max_bin) = band_bin_range(band, transform_size, sample_rate);
        levels[band.index()] = mean_over_bins(magnitudes, min_bin, max_bin);
    }
    levels
}

/// Maps a normalised linear magnitude onto `[0, 1]` across a 120 dB range.
fn log_scale(magnitude: f32) -> f32 {
    if magnitude <= 0.0 || !magnitude.is_finite() {
        return 0.0;
    }

    let decibels = 20.0 * (magnitude + LOG_EPSILON).log10();
    ((decibels + DYNAMIC_RANGE_DB) / DYNAMIC_RANGE_DB).clamp(0.0, 1.0)
}

/// Index and value of the largest magnitude. Ties resolve to the lowest bin.
fn find_peak(magnitudes: &[f32]) -> (usize, f32) {
    magnitudes
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0.0), |(best_bin, best), (bin, value)| {
            if value > best {
                (bin, value)
            } else {
                (best_bin, best)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        f32::consts::PI,
        io,
        sync::{Arc, Mutex},
    };

    fn sine(frequency: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn peak_bin(spectrum: &Spectrum) -> usize {
        find_peak(&spectrum.magnitudes).0
    }

    #[test]
    fn rounds_transform_size_up_once() {
        let analyzer = SpectrumAnalyzer::new(1000, 44_100);
        assert_eq!(analyzer.transform_size(), 1024);

        let analyzer = SpectrumAnalyzer::new(2048, 48_000);
        assert_eq!(analyzer.transform_size(), 2048);
    }

    #[test]
    fn oversized_transform_requests_are_capped() {
        for requested in [(1 << 63) + 1, usize::MAX, MAX_TRANSFORM_SIZE + 1] {
            let analyzer = SpectrumAnalyzer::new(requested, 44_100);
            assert_eq!(analyzer.transform_size(), MAX_TRANSFORM_SIZE);
            assert!(analyzer.transform_size().is_power_of_two());
        }
        assert_eq!(
            SpectrumAnalyzer::new(MAX_TRANSFORM_SIZE, 44_100).transform_size(),
            MAX_TRANSFORM_SIZE
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_warnings<F: FnOnce()>(f: F) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        log.text()
    }

    #[test]
    fn rounding_is_logged_once_at_construction() {
        let output = with_captured_warnings(|| {
            let mut analyzer = SpectrumAnalyzer::new(1000, 44_100);
            let samples = vec![0.0; analyzer.transform_size()];
            analyzer.analyze(&samples, true).unwrap();
            analyzer.analyze(&samples, false).unwrap();
        });

        assert_eq!(output.matches("rounding up").count(), 1, "{output}");
        assert!(output.contains("requested=1000"), "{output}");
        assert!(output.contains("rounded=1024"), "{output}");

        let output = with_captured_warnings(|| {
            SpectrumAnalyzer::new(1024, 44_100);
        });
        assert!(output.is_empty(), "{output}");
    }

    #[test]
    fn one_kilohertz_sine_peaks_in_bin_23() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
        let samples = sine(1000.0, 44_100, 1024, 1.0);

        let spectrum = analyzer.analyze(&samples, true).unwrap();

        assert_eq!(spectrum.magnitudes.len(), 512);
        assert_eq!(peak_bin(&spectrum), 23);
        assert_eq!(spectrum.peak_frequency, analyzer.bin_to_frequency(23));
        assert!((analyzer.bin_to_frequency(23) - 990.527).abs() < 0.01);
        assert!((spectrum.peak_frequency - 1000.0).abs() <= analyzer.frequency_resolution());

        let max = spectrum.magnitudes.iter().copied().fold(0.0, f32::max);
        assert_eq!(spectrum.peak_magnitude, max);
    }

    #[test]
    fn sine_peak_within_one_bin_without_window() {
        let mut analyzer = SpectrumAnalyzer::new(2048, 48_000);
        let samples = sine(3_100.0, 48_000, 2048, 0.5);

        let spectrum = analyzer.analyze(&samples, false).unwrap();

        assert!((spectrum.peak_frequency - 3_100.0).abs() <= analyzer.frequency_resolution());
        assert!(spectrum.peak_magnitude > 0.0);
    }

    #[test]
    fn constant_input_concentrates_in_dc_bin() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
        let spectrum = analyzer.analyze(&vec![1.0; 1024], false).unwrap();

        assert_eq!(spectrum.peak_frequency, 0.0);
        assert_eq!(spectrum.magnitudes[0], 1.0);
        assert!(spectrum.magnitudes[1..].iter().all(|&m| m < 0.1));
    }

    #[test]
    fn analysis_is_repeatable() {
        let mut analyzer = SpectrumAnalyzer::new(512, 44_100);
        let samples: Vec<f32> = (0..512).map(|i| ((i * 31 % 17) as f32 - 8.0) / 8.0).collect();

        let first = analyzer.analyze(&samples, true).unwrap();
        let second = analyzer.analyze(&samples, true).unwrap();
        assert_eq!(first, second);

        let unwindowed = analyzer.analyze(&samples, false).unwrap();
        let again = analyzer.analyze(&samples, false).unwrap();
        assert_eq!(unwindowed, again);
    }

    #[test]
    fn window_reduces_leakage() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
        // 1033.6 Hz sits half way between bins 23 and 24.
        let samples = sine(23.5 * 44_100.0 / 1024.0, 44_100, 1024, 1.0);

        let plain = analyzer.analyze(&samples, false).unwrap();
        let windowed = analyzer.analyze(&samples, true).unwrap();

        let far: f32 = plain.magnitudes[40..80].iter().sum();
        let far_windowed: f32 = windowed.magnitudes[40..80].iter().sum();
        assert!(far_windowed < far * 0.8, "{far_windowed} vs {far}");
    }

    #[test]
    fn outputs_stay_in_unit_range() {
        let mut analyzer = SpectrumAnalyzer::new(256, 8_000);
        let loud: Vec<f32> = (0..256)
            .map(|i| 50.0 + if i % 4 == 0 { 20.0 } else { -5.0 })
            .collect();
        let spectrum = analyzer.analyze(&loud, false).unwrap();

        for value in spectrum.magnitudes.iter().chain(spectrum.band_levels.iter()) {
            assert!((0.0..=1.0).contains(value));
        }
        assert!((0.0..=1.0).contains(&spectrum.peak_magnitude));
    }

    #[test]
    fn mismatched_block_is_rejected() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
        let err = analyzer.analyze(&[0.0; 1000], true).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SampleCountMismatch {
                expected: 1024,
                actual: 1000
            }
        ));

        let err = analyzer.analyze_stereo(&[0.0; 1024], true).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SampleCountMismatch { expected: 2048, .. }
        ));

        assert!(analyzer.magnitudes(&[0.0; 2048]).is_err());
    }

    #[test]
    fn stereo_averages_channels_before_peak_picking() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
        let left = sine(1000.0, 44_100, 1024, 1.0);
        let right = sine(5000.0, 44_100, 1024, 0.25);
        let interleaved: Vec<f32> = left
            .iter()
            .zip(&right)
            .flat_map(|(l, r)| [*l, *r])
            .collect();

        let left_spectrum = analyzer.analyze(&left, true).unwrap();
        let right_spectrum = analyzer.analyze(&right, true).unwrap();
        let stereo = analyzer.analyze_stereo(&interleaved, true).unwrap();

        assert_eq!(stereo.magnitudes.len(), 512);
        for i in 0..512 {
            let expected = (left_spectrum.magnitudes[i] + right_spectrum.magnitudes[i]) * 0.5;
            assert!((stereo.magnitudes[i] - expected).abs() < 1e-6);
        }
        assert_eq!(peak_bin(&stereo), 23);
        assert_eq!(stereo.band_levels, analyzer.band_levels(&stereo));
    }

    #[test]
    fn band_levels_has_seven_entries_and_follows_content() {
        let mut analyzer = SpectrumAnalyzer::new(2048, 44_100);
        let spectrum = analyzer
            .analyze(&sine(120.0, 44_100, 2048, 1.0), true)
            .unwrap();

        let levels = analyzer.band_levels(&spectrum);
        assert_eq!(levels.len(), BAND_COUNT);
        assert_eq!(levels, spectrum.band_levels);
        assert!(spectrum.band_level(FrequencyBand::Bass) > spectrum.band_level(FrequencyBand::Brilliance));
    }

    #[test]
    fn bands_are_contiguous_in_bins() {
        let analyzer = SpectrumAnalyzer::new(1024, 44_100);
        assert_eq!(analyzer.band_bin_range(FrequencyBand::SubBass).0, 0);

        for pair in FrequencyBand::ALL.windows(2) {
            let (_, lower_max) = analyzer.band_bin_range(pair[0]);
            let (upper_min, _) = analyzer.band_bin_range(pair[1]);
            assert!(upper_min <= lower_max + 1, "gap between {} and {}", pair[0], pair[1]);
        }

        let (_, top) = analyzer.band_bin_range(FrequencyBand::Brilliance);
        assert_eq!(top, analyzer.frequency_to_bin(20_000.0));
    }

    #[test]
    fn bands_above_nyquist_are_empty() {
        let mut analyzer = SpectrumAnalyzer::new(256, 8_000);
        let (min, max) = analyzer.band_bin_range(FrequencyBand::Brilliance);
        assert!(min > max);

        let spectrum = analyzer.analyze(&vec![0.3; 256], false).unwrap();
        assert_eq!(spectrum.band_level(FrequencyBand::Brilliance), 0.0);
        assert_eq!(spectrum.band_levels.len(), BAND_COUNT);
    }

    #[test]
    fn frequency_conversions() {
        let analyzer = SpectrumAnalyzer::new(1024, 44_100);
        assert_eq!(analyzer.frequency_to_bin(1000.0), 23);
        assert_eq!(analyzer.frequency_to_bin(-5.0), 0);
        assert_eq!(analyzer.bin_to_frequency(0), 0.0);
        assert!((analyzer.nyquist_frequency() - 22_050.0).abs() < f32::EPSILON);
        assert!((analyzer.frequency_resolution() - 43.066).abs() < 0.01);
    }

    #[test]
    fn band_lookup_by_frequency() {
        assert_eq!(FrequencyBand::containing(155.0), Some(FrequencyBand::Bass));
        assert_eq!(FrequencyBand::containing(60.0), Some(FrequencyBand::Bass));
        assert_eq!(FrequencyBand::containing(20_000.0), Some(FrequencyBand::Brilliance));
        assert_eq!(FrequencyBand::containing(10.0), None);
        assert_eq!(FrequencyBand::Presence.index(), 5);
        assert_eq!(FrequencyBand::LowMid.to_string(), "low-mid");
    }

    #[test]
    fn silent_spectrum_has_expected_shape() {
        let silent = Spectrum::silent(1024, 44_100);
        assert_eq!(silent.magnitudes.len(), 512);
        assert!(silent.magnitudes.iter().all(|&m| m == 0.0));
    }
}
