use std::{
    collections::BTreeMap,
    f32::consts::PI,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use beatscope_core::{
    AnalysisEngine, AnalysisError, AnalysisFrame, AnalysisSummary, AppConfig, BeatEvent,
    FrequencyBand, SpectrumAnalyzer,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() -> beatscope_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            output,
            frames,
        } => run_analyze(&input, config.as_deref(), output.as_deref(), frames),
        Commands::Tone {
            frequency,
            sample_rate,
            size,
            no_window,
        } => run_tone(frequency, sample_rate, size, !no_window),
    }
}

fn run_analyze(
    input: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    include_frames: bool,
) -> beatscope_core::Result<()> {
    let mut config = match config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let audio = read_wav(input)?;
    tracing::info!(
        ?input,
        sample_rate = audio.sample_rate,
        samples = audio.samples.len(),
        "decoded input"
    );
    config.analyzer.sample_rate = audio.sample_rate;

    let mut engine = AnalysisEngine::from_config(&config);
    for block in into_blocks(&audio.samples, engine.block_size()) {
        engine.process_block(&block)?;
    }

    let beats: Vec<BeatEvent> = engine
        .frames()
        .iter()
        .filter_map(|frame| frame.beat.clone())
        .collect();
    tracing::info!(
        frames = engine.summary().frames,
        beats = beats.len(),
        tempo_bpm = engine.summary().tempo_bpm,
        "analysis finished"
    );

    let report = AnalysisReport {
        input: input.display().to_string(),
        summary: engine.summary().clone(),
        beats,
        frames: include_frames.then(|| engine.frames().to_vec()),
    };
    write_json(&report, output)
}

fn run_tone(
    frequency: f32,
    sample_rate: u32,
    size: usize,
    use_window: bool,
) -> beatscope_core::Result<()> {
    let mut analyzer = SpectrumAnalyzer::new(size, sample_rate);
    let samples = sine(frequency, analyzer.sample_rate(), analyzer.transform_size());
    let spectrum = analyzer.analyze(&samples, use_window)?;

    let report = ToneReport {
        frequency,
        transform_size: analyzer.transform_size(),
        frequency_resolution: analyzer.frequency_resolution(),
        peak_bin: analyzer.frequency_to_bin(spectrum.peak_frequency),
        peak_frequency: spectrum.peak_frequency,
        peak_magnitude: spectrum.peak_magnitude,
        band_levels: FrequencyBand::ALL
            .into_iter()
            .map(|band| (band.name(), spectrum.band_level(band)))
            .collect(),
    };
    write_json(&report, None)
}

struct DecodedAudio {
    sample_rate: u32,
    samples: Vec<f32>,
}

/// Decodes a WAV file and mixes all channels down to mono.
fn read_wav(path: &Path) -> beatscope_core::Result<DecodedAudio> {
    let reader = hound::WavReader::open(path).map_err(decode_error)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(decode_error)?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(decode_error)?
        }
    };

    Ok(DecodedAudio {
        sample_rate: spec.sample_rate,
        samples: mix_to_mono(&interleaved, spec.channels),
    })
}

fn decode_error(err: hound::Error) -> AnalysisError {
    AnalysisError::msg(format!("failed to decode WAV input: {err}"))
}

fn mix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = usize::from(channels.max(1));
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Cuts `samples` into blocks of `block_size`, zero-padding the last one.
fn into_blocks(samples: &[f32], block_size: usize) -> impl Iterator<Item = Vec<f32>> + '_ {
    samples.chunks(block_size).map(move |chunk| {
        let mut block = chunk.to_vec();
        block.resize(block_size, 0.0);
        block
    })
}

fn sine(frequency: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> beatscope_core::Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            tracing::info!(?path, "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Serialize)]
struct AnalysisReport {
    input: String,
    summary: AnalysisSummary,
    beats: Vec<BeatEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<AnalysisFrame>>,
}

#[derive(Serialize)]
struct ToneReport {
    frequency: f32,
    transform_size: usize,
    frequency_resolution: f32,
    peak_bin: usize,
    peak_frequency: f32,
    peak_magnitude: f32,
    band_levels: BTreeMap<&'static str, f32>,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Spectrum, beat and onset analysis for audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a WAV file and emit a JSON report of beats and features.
    Analyze {
        /// Path to the WAV file that should be analysed.
        input: PathBuf,
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include every per-block frame in the report.
        #[arg(long)]
        frames: bool,
    },
    /// Analyse a synthetic sine block and print its spectrum summary.
    Tone {
        #[arg(short, long, default_value_t = 1000.0)]
        frequency: f32,
        #[arg(short, long, default_value_t = 44_100)]
        sample_rate: u32,
        /// Transform size, rounded up to a power of two.
        #[arg(long, default_value_t = 1024)]
        size: usize,
        /// Skip the Hann window.
        #[arg(long)]
        no_window: bool,
    },
}
