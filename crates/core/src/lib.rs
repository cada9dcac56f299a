//! Core library for the Beatscope audio analyser.
//!
//! Turns fixed-size blocks of PCM samples into log-scaled magnitude spectra
//! with per-band energy levels, and derives beat and onset events from
//! successive blocks. Everything here is synchronous and free of I/O; callers
//! supply decoded sample blocks and consume the resulting snapshots.

pub mod analysis;
pub mod beat;
pub mod config;
pub mod error;
pub mod onset;
pub mod spectrum;
pub mod transform;
pub mod window;

pub use analysis::{AnalysisEngine, AnalysisFrame, AnalysisSummary};
pub use beat::{BeatDetector, BeatEvent, EnergyHistory, EnergySample};
pub use config::{AnalyzerConfig, AppConfig, BeatConfig, OnsetConfig};
pub use error::{AnalysisError, Result};
pub use onset::OnsetDetector;
pub use spectrum::{FrequencyBand, Spectrum, SpectrumAnalyzer, BAND_COUNT};
