use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the analyser. Every section falls
/// back to its defaults, so partial documents are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analyzer: AnalyzerConfig,
    pub beat: BeatConfig,
    pub onset: OnsetConfig,
}

impl AppConfig {
    /// Parses a JSON configuration document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }
}

/// Configuration of the spectrum analyser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Requested transform size. Rounded up to a power of two when the
    /// analyser is built.
    pub transform_size: usize,
    pub sample_rate: u32,
    /// Apply the Hann window before the transform.
    pub use_window: bool,
    /// Number of recent frames kept by the analysis engine. `None` keeps
    /// every frame.
    pub max_frames: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            transform_size: 2048,
            sample_rate: 44_100,
            use_window: true,
            max_frames: None,
        }
    }
}

/// Configuration of the beat detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatConfig {
    /// Threshold multiplier over the rolling average. Lower is more sensitive.
    pub sensitivity: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Minimum spacing between two accepted beats.
    pub debounce_ms: f64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            min_frequency: 60.0,
            max_frequency: 250.0,
            debounce_ms: 100.0,
        }
    }
}

/// Configuration of the onset detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    /// Loudness ratio above which a block counts as an onset.
    pub threshold: f32,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self { threshold: 1.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisError;

    #[test]
    fn partial_documents_keep_defaults() {
        let config =
            AppConfig::from_json_str(r#"{ "analyzer": { "transform_size": 1024 } }"#).unwrap();

        assert_eq!(config.analyzer.transform_size, 1024);
        assert_eq!(config.analyzer.sample_rate, 44_100);
        assert!(config.analyzer.use_window);
        assert_eq!(config.beat, BeatConfig::default());
        assert_eq!(config.onset.threshold, 1.5);
    }

    #[test]
    fn empty_document_is_default() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            AppConfig::from_json_str(r#"{ "beat": { "history_capacity": 18446744073709551615 } }"#)
                .unwrap();
        assert_eq!(config.beat, BeatConfig::default());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let err = AppConfig::from_json_str("{ analyzer: ").unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let err = AppConfig::load("/definitely/not/here/beatscope.json").unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
