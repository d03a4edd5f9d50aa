/*!
 * Error types for the srtgen application.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 * Every per-file error ends up as a reason string in a `BatchResult`;
 * only `AppError` is meant to reach the binary.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a transcription document
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The document could not be read from disk
    #[error("Failed to read transcript {path}: {source}")]
    Read {
        /// Document path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid structured data, or has an unexpected shape
    #[error("Failed to parse transcript {path}: {message}")]
    Parse {
        /// Document path
        path: PathBuf,
        /// What was wrong with the document
        message: String,
    },
}

/// Which side of a record's time range is affected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSide {
    Start,
    End,
}

impl std::fmt::Display for TimestampSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}

/// Record-level errors raised while formatting subtitle blocks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Start or end timestamp is null, absent, or not a usable offset
    #[error("record {position}: missing or invalid {side} timestamp")]
    MissingTimestamp {
        /// Zero-based position of the record in its document
        position: usize,
        /// Which timestamp was missing
        side: TimestampSide,
    },

    /// Start lies after end
    #[error("record {position}: start {start}s is after end {end}s")]
    ReversedRange {
        /// Zero-based position of the record in its document
        position: usize,
        start: f64,
        end: f64,
    },
}

/// Errors that can occur while writing a subtitle file
#[derive(Error, Debug)]
#[error("Failed to write subtitle file {path}: {source}")]
pub struct WriteError {
    /// Target path of the subtitle file
    pub path: PathBuf,
    /// Underlying I/O error
    #[source]
    pub source: std::io::Error,
}

/// Everything that can make a single input file fail
#[derive(Error, Debug)]
pub enum FileError {
    /// Error reading or parsing the transcription document
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// Strict mode rejected one or more records
    #[error("{} invalid record(s): {}", .0.len(), join_record_errors(.0))]
    Records(Vec<RecordError>),

    /// Error writing the subtitle file
    #[error(transparent)]
    Write(#[from] WriteError),
}

fn join_record_errors(errors: &[RecordError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that stop a conversion run before any file is processed
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The input directory could not be listed
    #[error("Failed to list input directory {path}: {message}")]
    Discovery {
        path: PathBuf,
        message: String,
    },

    /// A worker task died before reporting its file
    #[error("Conversion worker failed: {0}")]
    Worker(String),
}

/// Errors that can occur while transcribing an audio file
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The transcription command could not be started
    #[error("Failed to start transcriber `{program}`: {message}")]
    Spawn {
        program: String,
        message: String,
    },

    /// The transcription command exited with an error
    #[error("Transcriber exited with status {status}: {stderr}")]
    Failed {
        /// Exit code, -1 when killed by a signal
        status: i32,
        /// Filtered standard error output
        stderr: String,
    },

    /// The transcription took longer than the configured timeout
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// The transcriber produced output that is not a transcription document
    #[error("Transcriber produced invalid output: {0}")]
    InvalidOutput(String),

    /// Writing the transcription document failed
    #[error("Failed to write transcript {path}: {message}")]
    Write {
        path: PathBuf,
        message: String,
    },

    /// The run was cancelled before this file was processed
    #[error("cancelled")]
    Cancelled,
}
