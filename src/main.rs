// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srtgen::app_config::{self, Config};
use srtgen::app_controller::Controller;
use srtgen::subtitle::FormatMode;
use srtgen::{BatchResult, CancellationFlag};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert transcription documents (JSON) into SRT subtitles
    Convert(ConvertArgs),

    /// Transcribe audio files into transcription documents
    Transcribe(TranscribeArgs),

    /// Transcribe audio files, then convert the results into subtitles
    Run(RunArgs),

    /// Generate shell completions for srtgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that converts transcripts
#[derive(Args, Debug, Clone)]
struct ConversionOptions {
    /// Reject records with missing timestamps instead of annotating them
    #[arg(long)]
    strict: bool,

    /// Number of the first subtitle block
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    index_base: Option<u8>,

    /// Number of files converted in parallel
    #[arg(short, long)]
    jobs: Option<usize>,
}

/// Options shared by every command that runs the recognizer
#[derive(Args, Debug, Clone)]
struct TranscriberOptions {
    /// Recognizer program to run for each audio file
    #[arg(long)]
    command: Option<String>,

    /// Model identifier passed to the recognizer
    #[arg(short, long, env = "PT_MODEL_TINY")]
    model: Option<String>,

    /// Per-file timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Directory containing transcription documents
    #[arg(short, long, env = "JSON_OUTPUT")]
    input: PathBuf,

    /// Directory receiving subtitle files
    #[arg(short, long, env = "SRT_OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    conversion: ConversionOptions,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Directory containing audio files
    #[arg(short, long, env = "AUDIO_LOCATION")]
    audio: PathBuf,

    /// Directory receiving transcription documents
    #[arg(short, long, env = "JSON_OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    transcriber: TranscriberOptions,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Directory containing audio files
    #[arg(short, long, env = "AUDIO_LOCATION")]
    audio: PathBuf,

    /// Directory receiving transcription documents
    #[arg(short, long, env = "JSON_OUTPUT")]
    transcripts: PathBuf,

    /// Directory receiving subtitle files
    #[arg(short, long, env = "SRT_OUTPUT")]
    subtitles: PathBuf,

    #[command(flatten)]
    transcriber: TranscriberOptions,

    #[command(flatten)]
    conversion: ConversionOptions,
}

/// srtgen - speech transcripts to SRT subtitles
///
/// Converts timestamped speech-recognition output into SRT caption files,
/// one directory at a time, and can drive an external recognizer first.
#[derive(Parser, Debug)]
#[command(name = "srtgen")]
#[command(version)]
#[command(about = "Speech transcripts to SRT subtitles")]
#[command(long_about = "srtgen converts timestamped speech-recognition output into SRT subtitle files.

EXAMPLES:
    srtgen convert -i json/ -o srt/               # Convert every *.json document
    srtgen convert -i json/ -o srt/ --strict      # Fail files with missing timestamps
    srtgen transcribe -a audio/ -o json/ --command whisper-json
    srtgen run -a audio/ -t json/ -s srt/         # Transcribe, then convert
    srtgen completions bash > srtgen.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in srtgen.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Directories may also be given through the
    AUDIO_LOCATION, JSON_OUTPUT and SRT_OUTPUT environment variables.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "srtgen.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtgen", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current file");
            signal_flag.cancel();
        }
    });

    match cli.command {
        Commands::Convert(args) => {
            apply_conversion_options(&mut config, &args.conversion);
            let controller = Controller::with_config(config)?;
            let result = controller.convert(&args.input, &args.output).await?;
            finish(&[&result])
        }
        Commands::Transcribe(args) => {
            apply_transcriber_options(&mut config, &args.transcriber);
            let controller = Controller::with_config(config)?;
            let result = controller.transcribe(&args.audio, &args.output, &cancel).await?;
            finish(&[&result])
        }
        Commands::Run(args) => {
            apply_transcriber_options(&mut config, &args.transcriber);
            apply_conversion_options(&mut config, &args.conversion);
            let controller = Controller::with_config(config)?;
            let (transcribed, converted) = controller
                .run_pipeline(&args.audio, &args.transcripts, &args.subtitles, &cancel)
                .await?;
            finish(&[&transcribed, &converted])
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration file, creating a default one when it is missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::from_file(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config)
        .context("Failed to serialize default config to JSON")?;
    std::fs::write(config_path, config_json)
        .context(format!("Failed to write default config to file: {}", config_path))?;
    Ok(config)
}

fn apply_conversion_options(config: &mut Config, options: &ConversionOptions) {
    if options.strict {
        config.conversion.mode = FormatMode::Strict;
    }
    if let Some(index_base) = options.index_base {
        config.conversion.index_base = index_base as usize;
    }
    if let Some(jobs) = options.jobs {
        config.conversion.jobs = jobs;
    }
}

fn apply_transcriber_options(config: &mut Config, options: &TranscriberOptions) {
    if let Some(command) = &options.command {
        config.transcription.command = command.clone();
    }
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(timeout) = options.timeout {
        config.transcription.timeout_secs = timeout;
    }
}

// Non-zero exit when any stage left failed files behind
fn finish(results: &[&BatchResult]) -> Result<()> {
    let failed: usize = results.iter().map(|r| r.failed.len()).sum();
    if failed > 0 {
        return Err(anyhow!("{} file(s) failed, see the log above", failed));
    }
    info!("Done");
    Ok(())
}
