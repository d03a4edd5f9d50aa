use anyhow::{Result, Context, anyhow};
use log::{error, warn, info};
use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::batch::{BatchOrchestrator, BatchResult};
use crate::file_utils::FileManager;
use crate::transcription::{CancellationFlag, CommandTranscriber, Transcriber, TranscriptionStage};

// @module: Application controller for transcript and subtitle processing

// @const: Name of the per-run issues log written into the output directory
pub const ISSUES_LOG_NAME: &str = "srtgen.issues.log";

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert every transcription document in `input_dir` to subtitles in `output_dir`
    pub async fn convert(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchResult> {
        let start_time = std::time::Instant::now();
        Self::prepare_dirs(input_dir, output_dir)?;

        let orchestrator = BatchOrchestrator::new(self.config.conversion.clone());
        let jobs = self.config.conversion.jobs;

        let result = if jobs > 1 {
            info!("Converting transcripts with {} workers", jobs);
            orchestrator.run_concurrent(input_dir, output_dir, jobs).await?
        } else {
            let progress_bar = Self::progress_bar(0, "files");
            let pb = progress_bar.clone();
            let (input, output) = (input_dir.to_path_buf(), output_dir.to_path_buf());
            let result = tokio::task::spawn_blocking(move || {
                orchestrator.run_with_progress(&input, &output, move |completed, total, file| {
                    pb.set_length(total as u64);
                    pb.set_position(completed as u64);
                    pb.set_message(Self::display_name(file));
                })
            })
            .await
            .context("Conversion worker panicked")??;
            progress_bar.finish_and_clear();
            result
        };

        self.report("Conversion", &result, output_dir, start_time.elapsed());
        Ok(result)
    }

    /// Transcribe every audio file in `audio_dir` with the configured command
    pub async fn transcribe(&self, audio_dir: &Path, transcript_dir: &Path, cancel: &CancellationFlag) -> Result<BatchResult> {
        self.config.validate_transcription().context("Configuration validation failed")?;
        let transcriber = CommandTranscriber::from_config(&self.config.transcription);
        self.transcribe_with(&transcriber, audio_dir, transcript_dir, cancel).await
    }

    /// Transcribe with an explicit recognizer
    pub async fn transcribe_with(
        &self,
        transcriber: &dyn Transcriber,
        audio_dir: &Path,
        transcript_dir: &Path,
        cancel: &CancellationFlag,
    ) -> Result<BatchResult> {
        let start_time = std::time::Instant::now();
        Self::prepare_dirs(audio_dir, transcript_dir)?;

        info!("Transcribing with {}", transcriber.name());
        let stage = TranscriptionStage::from_config(&self.config.transcription);

        let progress_bar = Self::progress_bar(0, "files");
        let pb = progress_bar.clone();
        let result = stage
            .run_with_progress(transcriber, audio_dir, transcript_dir, cancel, move |completed, total, file| {
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
                pb.set_message(Self::display_name(file));
            })
            .await?;
        progress_bar.finish_and_clear();

        self.report("Transcription", &result, transcript_dir, start_time.elapsed());
        Ok(result)
    }

    /// Full pipeline: audio to transcripts, then transcripts to subtitles
    pub async fn run_pipeline(
        &self,
        audio_dir: &Path,
        transcript_dir: &Path,
        subtitle_dir: &Path,
        cancel: &CancellationFlag,
    ) -> Result<(BatchResult, BatchResult)> {
        let transcribed = self.transcribe(audio_dir, transcript_dir, cancel).await?;
        if cancel.is_cancelled() {
            warn!("Cancelled, skipping subtitle conversion");
            return Ok((transcribed, BatchResult::default()));
        }
        let converted = self.convert(transcript_dir, subtitle_dir).await?;
        Ok((transcribed, converted))
    }

    // Input must exist; output is created when missing
    fn prepare_dirs(input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }
        FileManager::ensure_dir(output_dir)?;
        if !FileManager::dir_exists(output_dir) {
            return Err(anyhow!("Output path is not a directory: {:?}", output_dir));
        }
        Ok(())
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}", unit))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    fn display_name(file: &Path) -> String {
        file.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Log the result of a stage and record failures in the issues log
    fn report(&self, stage: &str, result: &BatchResult, log_dir: &Path, elapsed: std::time::Duration) {
        for (file, reason) in &result.failed {
            error!("{} failed for {}: {}", stage, Self::display_name(file), reason);
        }

        let summary = format!("{} completed: {} ({})", stage, result.summary(), Self::format_duration(elapsed));
        if result.total() == 0 {
            warn!("{}: no input files found", stage);
        } else {
            info!("{}", summary);
        }

        if result.is_success() {
            return;
        }

        let log_file_path = log_dir.join(ISSUES_LOG_NAME);
        let mut content = summary;
        for (file, reason) in &result.failed {
            content.push_str(&format!("\n  {}: {}", file.display(), reason));
        }
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &content) {
            warn!("Failed to write issues log: {}", e);
        } else {
            info!("Issues written to {}", log_file_path.display());
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
