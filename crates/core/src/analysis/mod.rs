use serde::{Deserialize, Serialize};

use crate::{
    beat::{BeatDetector, BeatEvent},
    config::AppConfig,
    onset::OnsetDetector,
    spectrum::{Spectrum, SpectrumAnalyzer, BAND_COUNT},
    Result,
};

/// Summary of the analysis metadata accumulated so far.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisSummary {
    pub sample_rate: u32,
    pub transform_size: usize,
    pub frames: usize,
    pub beats: usize,
    pub tempo_bpm: Option<f32>,
    pub duration_seconds: f32,
}

/// Features extracted from one sample block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFrame {
    /// Start of the block, in milliseconds since the first block.
    pub time_ms: f64,
    pub rms: f32,
    pub onset_strength: f32,
    pub spectral_flux: f32,
    pub band_levels: [f32; BAND_COUNT],
    pub peak_frequency: f32,
    pub peak_magnitude: f32,
    pub beat: Option<BeatEvent>,
}

/// Runs the full per-block pipeline: spectrum, beat detection against the
/// previous spectrum, and onset detection against the previous loudness.
///
/// Every block must hold exactly `transform_size` samples (twice that for
/// interleaved stereo). The engine is not synchronised; wrap it yourself if
/// it has to be shared between threads.
///
/// Frames are kept for later lookup. Set `AnalyzerConfig::max_frames` to
/// bound memory on long streams; the oldest frames are dropped first.
#[derive(Debug)]
pub struct AnalysisEngine {
    use_window: bool,
    analyzer: SpectrumAnalyzer,
    beats: BeatDetector,
    onsets: OnsetDetector,
    previous: Spectrum,
    previous_energy: f32,
    summary: AnalysisSummary,
    frames: Vec<AnalysisFrame>,
    max_frames: Option<usize>,
}

impl AnalysisEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&AppConfig::default())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let analyzer = SpectrumAnalyzer::from_config(&config.analyzer);
        let previous = Spectrum::silent(analyzer.transform_size(), analyzer.sample_rate());
        let summary = AnalysisSummary {
            sample_rate: analyzer.sample_rate(),
            transform_size: analyzer.transform_size(),
            ..Default::default()
        };

        Self {
            use_window: config.analyzer.use_window,
            analyzer,
            beats: BeatDetector::from_config(&config.beat),
            onsets: OnsetDetector::from_config(&config.onset),
            previous,
            previous_energy: 0.0,
            summary,
            frames: Vec::new(),
            max_frames: config.analyzer.max_frames,
        }
    }

    /// Number of mono samples expected per block.
    pub fn block_size(&self) -> usize {
        self.analyzer.transform_size()
    }

    pub fn sample_rate(&self) -> u32 {
        self.analyzer.sample_rate()
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    pub fn beat_detector(&self) -> &BeatDetector {
        &self.beats
    }

    /// Returns metadata collected so far about the analysed stream.
    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    /// Clears the accumulated state while preserving configuration.
    pub fn reset(&mut self) {
        self.beats.reset();
        self.previous = Spectrum::silent(self.analyzer.transform_size(), self.analyzer.sample_rate());
        self.previous_energy = 0.0;
        self.summary = AnalysisSummary {
            sample_rate: self.analyzer.sample_rate(),
            transform_size: self.analyzer.transform_size(),
            ..Default::default()
        };
        self.frames.clear();
    }

    /// Analyses one mono block.
    pub fn process_block(&mut self, samples: &[f32]) -> Result<AnalysisFrame> {
        let spectrum = self.analyzer.analyze(samples, self.use_window)?;
        Ok(self.finish_frame(spectrum, samples))
    }

    /// Analyses one interleaved stereo block.
    pub fn process_stereo_block(&mut self, interleaved: &[f32]) -> Result<AnalysisFrame> {
        let spectrum = self.analyzer.analyze_stereo(interleaved, self.use_window)?;
        Ok(self.finish_frame(spectrum, interleaved))
    }

    /// Most recently analysed block.
    pub fn latest_frame(&self) -> Option<&AnalysisFrame> {
        self.frames.last()
    }

    /// Retained frames in block order.
    pub fn frames(&self) -> &[AnalysisFrame] {
        &self.frames
    }

    /// Features of the block playing at `time_ms`: the last retained frame
    /// that starts at or before it. Earlier times, and times before the
    /// oldest retained frame, get an empty frame stamped with `time_ms`.
    pub fn sample_at(&self, time_ms: f64) -> AnalysisFrame {
        let started = self.frames.partition_point(|frame| frame.time_ms <= time_ms);
        match started.checked_sub(1) {
            Some(index) => self.frames[index].clone(),
            None => AnalysisFrame {
                time_ms,
                ..Default::default()
            },
        }
    }

    fn frame_duration_ms(&self) -> f64 {
        self.analyzer.transform_size() as f64 * 1000.0 / self.analyzer.sample_rate() as f64
    }

    fn finish_frame(&mut self, spectrum: Spectrum, samples: &[f32]) -> AnalysisFrame {
        let frame_ms = self.frame_duration_ms();
        let time_ms = self.summary.frames as f64 * frame_ms;

        let beat = self.beats.detect_at(&spectrum, &self.previous, time_ms);
        let onset_strength = self.onsets.detect(samples, self.previous_energy);
        let rms = self.onsets.current_energy();
        self.previous_energy = rms;

        let frame = AnalysisFrame {
            time_ms,
            rms,
            onset_strength,
            spectral_flux: self.beats.last_flux(),
            band_levels: spectrum.band_levels,
            peak_frequency: spectrum.peak_frequency,
            peak_magnitude: spectrum.peak_magnitude,
            beat,
        };

        self.summary.frames += 1;
        if frame.beat.is_some() {
            self.summary.beats += 1;
        }
        self.summary.tempo_bpm = self.beats.tempo_bpm();
        self.summary.duration_seconds = ((time_ms + frame_ms) / 1000.0) as f32;

        self.previous = spectrum;
        self.frames.push(frame.clone());
        if let Some(limit) = self.max_frames {
            if self.frames.len() > limit {
                let excess = self.frames.len() - limit;
                self.frames.drain(..excess);
            }
        }
        frame
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
