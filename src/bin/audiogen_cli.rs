use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use audiogen_core::{AppConfig, AudioProcessor, PcmBuffer, QuantizationPolicy, SymphoniaDecoder};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "audiogen_cli",
    about = "Decode, analyse and re-encode reference audio for generation requests"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the WAV quantisation policy
    #[arg(long, global = true, value_enum)]
    quantization: Option<QuantizationArg>,
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print duration, sample rate, channel count and length as JSON
    Info { input: PathBuf },
    /// Print acoustic features as JSON
    Features {
        input: PathBuf,
        /// Run timbre preprocessing before analysis
        #[arg(long)]
        timbre: bool,
    },
    /// Decode any supported file and write it back as 16-bit PCM WAV
    Convert {
        input: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print the WAV encoding of a file as base64
    Base64 { input: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QuantizationArg {
    Truncate,
    Round,
}

impl From<QuantizationArg> for QuantizationPolicy {
    fn from(arg: QuantizationArg) -> Self {
        match arg {
            QuantizationArg::Truncate => QuantizationPolicy::Truncate,
            QuantizationArg::Round => QuantizationPolicy::Round,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    let input = cli.command.input().to_path_buf();
    let mut processor = AudioProcessor::from_config(decoder_for(&input), &config)
        .context("invalid analysis configuration")?;
    if let Some(policy) = cli.quantization {
        processor = processor.with_quantization(policy.into());
    }

    match cli.command {
        Commands::Info { .. } => run_info(&processor, &input),
        Commands::Features { timbre, .. } => run_features(&processor, &input, timbre),
        Commands::Convert { output, .. } => run_convert(&processor, &input, &output),
        Commands::Base64 { .. } => run_base64(&processor, &input),
    }
}

impl Commands {
    fn input(&self) -> &Path {
        match self {
            Commands::Info { input }
            | Commands::Features { input, .. }
            | Commands::Convert { input, .. }
            | Commands::Base64 { input } => input,
        }
    }
}

/// Symphonia decoder hinted with the input's file extension
fn decoder_for(input: &Path) -> SymphoniaDecoder {
    match input.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => SymphoniaDecoder::new().with_extension_hint(ext),
        None => SymphoniaDecoder::new(),
    }
}

fn load(processor: &AudioProcessor, input: &Path) -> Result<PcmBuffer> {
    processor
        .load_file(input)
        .with_context(|| format!("loading {}", input.display()))
}

fn run_info(processor: &AudioProcessor, input: &Path) -> Result<()> {
    let pcm = load(processor, input)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&processor.audio_info(&pcm))?
    );
    Ok(())
}

fn run_features(processor: &AudioProcessor, input: &Path, timbre: bool) -> Result<()> {
    let mut pcm = load(processor, input)?;
    if timbre {
        pcm = processor.preprocess_for_timbre(&pcm);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&processor.extract_features(&pcm))?
    );
    Ok(())
}

fn run_convert(processor: &AudioProcessor, input: &Path, output: &Path) -> Result<()> {
    let pcm = load(processor, input)?;
    processor
        .to_playable(&pcm)
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn run_base64(processor: &AudioProcessor, input: &Path) -> Result<()> {
    let pcm = load(processor, input)?;
    println!("{}", processor.to_base64(&pcm));
    Ok(())
}
