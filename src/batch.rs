/*!
 * Batch conversion of transcription documents into subtitle files.
 *
 * Every discovered document is processed independently: a failure while
 * reading, formatting or writing one file is recorded against that file and
 * the run moves on to the next one. Nothing is logged here; the caller
 * reports the returned `BatchResult`.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::app_config::ConversionConfig;
use crate::errors::{ConversionError, FileError};
use crate::file_utils::FileManager;
use crate::subtitle::SubtitleDocument;
use crate::transcript;
use crate::writer::SubtitleFileWriter;

/// Outcome of one batch run, partitioning every discovered file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Files processed successfully
    pub succeeded: BTreeSet<PathBuf>,
    /// Failed files with the reason
    pub failed: BTreeMap<PathBuf, String>,
}

impl BatchResult {
    /// Fold one file outcome into the result
    pub fn with_outcome<T, E: Display>(mut self, file: PathBuf, outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(_) => {
                self.succeeded.insert(file);
            }
            Err(e) => {
                self.failed.insert(file, e.to_string());
            }
        }
        self
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary suitable for logs
    pub fn summary(&self) -> String {
        format!(
            "{} files: {} succeeded, {} failed",
            self.total(),
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

/// Drives extraction, conversion, formatting and writing for a directory
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    // @field: Conversion settings for the whole run
    config: ConversionConfig,

    // @field: Output writer
    writer: SubtitleFileWriter,
}

impl BatchOrchestrator {
    pub fn new(config: ConversionConfig) -> Self {
        let writer = SubtitleFileWriter::new(&config.subtitle_extension);
        Self { config, writer }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// List candidate documents directly inside `input_dir`
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>, ConversionError> {
        FileManager::find_files(input_dir, &self.config.input_suffix).map_err(|e| {
            ConversionError::Discovery {
                path: input_dir.to_path_buf(),
                message: format!("{:#}", e),
            }
        })
    }

    /// Convert a single document; the output is only written when every
    /// stage before it succeeded.
    pub fn convert_file(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, FileError> {
        let records = transcript::extract(source)?;
        let document = SubtitleDocument::from_records(&records, self.config.index_base, self.config.mode);
        let blocks = document.into_blocks().map_err(FileError::Records)?;
        Ok(self.writer.write(source, output_dir, &blocks)?)
    }

    /// Convert every document in `input_dir` into `output_dir`, one at a time
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchResult, ConversionError> {
        self.run_with_progress(input_dir, output_dir, |_, _, _| {})
    }

    /// Same as `run`, calling `progress(completed, total, file)` after each file
    pub fn run_with_progress<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        mut progress: F,
    ) -> Result<BatchResult, ConversionError>
    where
        F: FnMut(usize, usize, &Path),
    {
        let files = self.discover(input_dir)?;
        let total = files.len();

        Ok(files
            .into_iter()
            .enumerate()
            .fold(BatchResult::default(), |result, (i, file)| {
                let outcome = self.convert_file(&file, output_dir);
                progress(i + 1, total, &file);
                result.with_outcome(file, outcome)
            }))
    }

    /// Convert documents on up to `jobs` blocking workers.
    ///
    /// Workers share no state; each sends exactly one outcome to a single
    /// collector which owns the `BatchResult`.
    pub async fn run_concurrent(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        jobs: usize,
    ) -> Result<BatchResult, ConversionError> {
        let files = self.discover(input_dir)?;
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<(PathBuf, Result<PathBuf, String>)>();

        let mut handles = Vec::with_capacity(files.len());
        for file in files {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ConversionError::Worker(e.to_string()))?;
            let orchestrator = self.clone();
            let output_dir = output_dir.to_path_buf();
            let tx = tx.clone();
            let task_file = file.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let outcome = orchestrator
                    .convert_file(&task_file, &output_dir)
                    .map_err(|e| e.to_string());
                // The receiver outlives every worker
                let _ = tx.send((task_file, outcome));
                drop(permit);
            });
            handles.push((file, handle));
        }
        drop(tx);

        let mut result = BatchResult::default();
        while let Some((file, outcome)) = rx.recv().await {
            result = result.with_outcome(file, outcome);
        }

        // A worker that panicked never reported; account for its file here
        for (file, handle) in handles {
            if let Err(e) = handle.await {
                if !result.succeeded.contains(&file) && !result.failed.contains_key(&file) {
                    result = result.with_outcome::<(), _>(file, Err(format!("worker failed: {}", e)));
                }
            }
        }

        Ok(result)
    }
}
