/*!
 * Speech transcription stage.
 *
 * Audio files are handed to a `Transcriber`, and each result is stored as a
 * transcription document next to the others, ready for conversion:
 * - `Transcriber`: the recognizer seam, implemented by `CommandTranscriber`
 *   for an external command and by fixtures in tests
 * - `TranscriptionStage`: the directory loop with per-file timeout and
 *   cancellation between files
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::TranscriptionConfig;
use crate::batch::BatchResult;
use crate::errors::{ConversionError, TranscriptionError};
use crate::file_utils::FileManager;
use crate::transcript::{self, TranscriptChunk};

/// Common trait for speech recognizers
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe one audio file into ordered, timestamped chunks
    async fn transcribe(&self, audio: &Path) -> Result<Vec<TranscriptChunk>, TranscriptionError>;

    /// Human readable name for logs
    fn name(&self) -> String;
}

/// Runs an external recognizer and reads a transcription document from its stdout
#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    // @field: Executable
    program: String,

    // @field: Argument template
    args: Vec<String>,

    // @field: Model identifier substituted for {model}
    model: String,
}

impl CommandTranscriber {
    pub fn new(program: impl Into<String>, args: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone(), config.model.clone())
    }

    /// Arguments for one audio file, placeholders substituted
    pub fn build_args(&self, audio: &Path) -> Vec<String> {
        let input = audio.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{model}", &self.model))
            .collect()
    }

    // Keep the tail of stderr, where recognizers put the actual error
    fn filter_stderr(stderr: &str) -> String {
        let lines: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let start = lines.len().saturating_sub(5);
        lines[start..].join(" | ")
    }
}

#[async_trait]
impl Transcriber for CommandTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<TranscriptChunk>, TranscriptionError> {
        let output = Command::new(&self.program)
            .args(self.build_args(audio))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TranscriptionError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: Self::filter_stderr(&stderr),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let records = transcript::parse_document(&stdout).map_err(TranscriptionError::InvalidOutput)?;

        Ok(records
            .into_iter()
            .map(|r| TranscriptChunk::new(r.start, r.end, r.text))
            .collect())
    }

    fn name(&self) -> String {
        format!("{} ({})", self.program, self.model)
    }
}

/// Shared flag checked between files
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Transcribes a directory of audio files into transcription documents
#[derive(Debug, Clone)]
pub struct TranscriptionStage {
    // @field: Suffix identifying audio files
    audio_suffix: String,

    // @field: Upper bound for one transcriber call
    timeout: Duration,
}

impl TranscriptionStage {
    pub fn new(audio_suffix: impl Into<String>, timeout: Duration) -> Self {
        Self {
            audio_suffix: audio_suffix.into(),
            timeout,
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(config.audio_suffix.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Transcribe every audio file in `audio_dir` into `transcript_dir`
    pub async fn run(
        &self,
        transcriber: &dyn Transcriber,
        audio_dir: &Path,
        transcript_dir: &Path,
        cancel: &CancellationFlag,
    ) -> Result<BatchResult, ConversionError> {
        self.run_with_progress(transcriber, audio_dir, transcript_dir, cancel, |_, _, _| {})
            .await
    }

    /// Same as `run`, calling `progress(completed, total, file)` after each file
    pub async fn run_with_progress<F>(
        &self,
        transcriber: &dyn Transcriber,
        audio_dir: &Path,
        transcript_dir: &Path,
        cancel: &CancellationFlag,
        mut progress: F,
    ) -> Result<BatchResult, ConversionError>
    where
        F: FnMut(usize, usize, &Path) + Send,
    {
        let files = FileManager::find_files(audio_dir, &self.audio_suffix).map_err(|e| {
            ConversionError::Discovery {
                path: audio_dir.to_path_buf(),
                message: format!("{:#}", e),
            }
        })?;
        let total = files.len();

        let mut result = BatchResult::default();
        for (i, file) in files.into_iter().enumerate() {
            let outcome = if cancel.is_cancelled() {
                Err(TranscriptionError::Cancelled)
            } else {
                self.transcribe_file(transcriber, &file, transcript_dir).await
            };
            if let Err(e) = &outcome {
                if !matches!(e, TranscriptionError::Cancelled) {
                    warn!("Transcription failed for {}: {}", file.display(), e);
                }
            }
            progress(i + 1, total, &file);
            result = result.with_outcome(file, outcome);
        }

        Ok(result)
    }

    /// Transcribe one file and write its document; returns the document path
    pub async fn transcribe_file(
        &self,
        transcriber: &dyn Transcriber,
        audio: &Path,
        transcript_dir: &Path,
    ) -> Result<PathBuf, TranscriptionError> {
        debug!("Transcribing {} with {}", audio.display(), transcriber.name());

        let chunks = tokio::time::timeout(self.timeout, transcriber.transcribe(audio))
            .await
            .map_err(|_| TranscriptionError::Timeout(self.timeout.as_secs()))??;

        let path = FileManager::generate_output_path(audio, transcript_dir, "json");
        write_document(&path, &chunks)?;

        debug!("Wrote {} chunks to {}", chunks.len(), path.display());
        Ok(path)
    }
}

/// Atomically write chunks as a pretty-printed transcription document
pub fn write_document(path: &Path, chunks: &[TranscriptChunk]) -> Result<(), TranscriptionError> {
    let write_error = |message: String| TranscriptionError::Write {
        path: path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(chunks).map_err(|e| write_error(e.to_string()))?;
    FileManager::write_atomic(path, json.as_bytes()).map_err(|e| write_error(e.to_string()))
}
