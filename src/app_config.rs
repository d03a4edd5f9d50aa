use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use crate::subtitle::FormatMode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Transcript to subtitle conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// External transcriber settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Conversion settings, applied uniformly to every file of a run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionConfig {
    // @field: Suffix identifying transcription documents
    #[serde(default = "default_input_suffix")]
    pub input_suffix: String,

    // @field: Extension of written subtitle files
    #[serde(default = "default_subtitle_extension")]
    pub subtitle_extension: String,

    // @field: Number of the first caption (0 or 1)
    #[serde(default = "default_index_base")]
    pub index_base: usize,

    // @field: Handling of invalid timestamps
    #[serde(default)]
    pub mode: FormatMode,

    // @field: Files converted in parallel, 1 means sequential
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input_suffix: default_input_suffix(),
            subtitle_extension: default_subtitle_extension(),
            index_base: default_index_base(),
            mode: FormatMode::default(),
            jobs: default_jobs(),
        }
    }
}

/// External speech recognizer settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptionConfig {
    /// Program to run for each audio file
    #[serde(default)]
    pub command: String,

    /// Arguments; `{input}` and `{model}` are substituted
    #[serde(default = "default_transcriber_args")]
    pub args: Vec<String>,

    /// Model identifier handed to the program
    #[serde(default = "default_model")]
    pub model: String,

    /// Suffix identifying audio files
    #[serde(default = "default_audio_suffix")]
    pub audio_suffix: String,

    /// Per-file timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: default_transcriber_args(),
            model: default_model(),
            audio_suffix: default_audio_suffix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_suffix() -> String {
    ".json".to_string()
}

fn default_subtitle_extension() -> String {
    "srt".to_string()
}

fn default_index_base() -> usize {
    1
}

fn default_jobs() -> usize {
    1
}

fn default_transcriber_args() -> Vec<String> {
    vec!["--model".to_string(), "{model}".to_string(), "{input}".to_string()]
}

fn default_model() -> String {
    "tiny".to_string()
}

fn default_audio_suffix() -> String {
    ".wav".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {}: {}", path.display(), e))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let conversion = &self.conversion;
        if conversion.index_base > 1 {
            return Err(anyhow!("Index base must be 0 or 1, got {}", conversion.index_base));
        }
        if conversion.input_suffix.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Input suffix must not be empty"));
        }
        if conversion.subtitle_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Subtitle extension must not be empty"));
        }
        if conversion.jobs == 0 {
            return Err(anyhow!("Number of jobs must be at least 1"));
        }

        Ok(())
    }

    /// Additional checks needed before audio files are transcribed
    pub fn validate_transcription(&self) -> Result<()> {
        let transcription = &self.transcription;
        if transcription.command.trim().is_empty() {
            return Err(anyhow!("A transcription command is required to transcribe audio"));
        }
        if !transcription.args.iter().any(|a| a.contains("{input}")) {
            return Err(anyhow!("Transcriber arguments must contain an {{input}} placeholder"));
        }
        if transcription.audio_suffix.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Audio suffix must not be empty"));
        }
        if transcription.timeout_secs == 0 {
            return Err(anyhow!("Transcription timeout must be greater than zero"));
        }

        Ok(())
    }
}
